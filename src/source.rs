// src/source.rs
//! Source table: which pages to probe and how to find a price on each.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::CheckError;

/// `NT$` followed by digits with optional commas (international booking sites).
pub const TWD_PATTERN: &str = r"NT\$?\s?[\d,]+";
/// Digits with optional commas followed by `円` (Japan-domestic sites).
pub const YEN_PATTERN: &str = r"[\d,]+円";

/// Price pattern as written in config: `"twd"`, `"yen"` or a raw regex.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PricePattern {
    Twd,
    Yen,
    Custom(String),
}

impl From<String> for PricePattern {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "twd" | "nt$" => PricePattern::Twd,
            "yen" | "円" => PricePattern::Yen,
            _ => PricePattern::Custom(s),
        }
    }
}

impl PricePattern {
    pub fn as_regex_str(&self) -> &str {
        match self {
            PricePattern::Twd => TWD_PATTERN,
            PricePattern::Yen => YEN_PATTERN,
            PricePattern::Custom(s) => s,
        }
    }

    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(self.as_regex_str())
    }
}

/// Raw `[[sources]]` entry before the pattern is compiled.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub key: String,
    pub name: String,
    pub url: String,
    pub pattern: PricePattern,
}

/// One probe target with a compiled pattern.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Field name in the "unavailable" report (`agoda`, `jalan`, ...).
    pub key: String,
    /// Display name used as `platform` in the "available" report.
    pub name: String,
    pub url: String,
    pub pattern: Regex,
}

impl SourceConfig {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        pattern: Regex,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            url: url.into(),
            pattern,
        }
    }
}

impl TryFrom<SourceSpec> for SourceConfig {
    type Error = CheckError;

    fn try_from(spec: SourceSpec) -> Result<Self, Self::Error> {
        let pattern = spec.pattern.compile().map_err(|e| CheckError::InvalidPattern {
            key: spec.key.clone(),
            reason: e.to_string(),
        })?;
        Ok(SourceConfig::new(spec.key, spec.name, spec.url, pattern))
    }
}

/// Ordered, validated list of sources. Order is the tie-break order.
#[derive(Debug, Clone)]
pub struct SourceSet {
    sources: Vec<SourceConfig>,
}

impl SourceSet {
    /// Rejects an empty list and duplicate keys.
    pub fn new(sources: Vec<SourceConfig>) -> Result<Self, CheckError> {
        if sources.is_empty() {
            return Err(CheckError::EmptySources);
        }
        let mut seen = HashSet::new();
        for s in &sources {
            if !seen.insert(s.key.as_str()) {
                return Err(CheckError::DuplicateKey(s.key.clone()));
            }
        }
        Ok(Self { sources })
    }

    pub fn from_specs(specs: Vec<SourceSpec>) -> Result<Self, CheckError> {
        let compiled = specs
            .into_iter()
            .map(SourceConfig::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(compiled)
    }

    pub fn as_slice(&self) -> &[SourceConfig] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// The seven production sources for remm Roppongi, 2025-12-05 .. 2025-12-10.
pub fn default_specs() -> Vec<SourceSpec> {
    let spec = |key: &str, name: &str, url: &str, pattern: PricePattern| SourceSpec {
        key: key.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        pattern,
    };
    vec![
        spec(
            "agoda",
            "Agoda",
            "https://www.agoda.com/zh-tw/remm-roppongi/hotel/tokyo-jp.html?checkIn=2025-12-05&checkOut=2025-12-10&rooms=1&adults=2",
            PricePattern::Twd,
        ),
        spec(
            "booking",
            "Booking",
            "https://www.booking.com/hotel/jp/remm-roppongi.zh-tw.html?checkin=2025-12-05&checkout=2025-12-10&group_adults=2&no_rooms=1",
            PricePattern::Twd,
        ),
        spec(
            "expedia",
            "Expedia",
            "https://www.expedia.com.tw/Tokyo-Hotels-Remm-Roppongi.h18727673.Hotel-Information?chkin=2025-12-05&chkout=2025-12-10",
            PricePattern::Twd,
        ),
        spec(
            "hotels",
            "Hotels.com",
            "https://zh.hotels.com/ho622433/remm-roppongi-dong-jing-ri-ben/?q-check-in=2025-12-05&q-check-out=2025-12-10",
            PricePattern::Twd,
        ),
        spec("official", "remm官網", "https://www.remm.jp/roppongi/", PricePattern::Yen),
        spec("jalan", "Jalan", "https://www.jalan.net/yad345766/", PricePattern::Yen),
        spec(
            "japanican",
            "Japanican",
            "https://www.japanican.com/hotel/detail/4017A20/",
            PricePattern::Yen,
        ),
    ]
}

/// Built-in table, compiled.
pub fn default_sources() -> Result<SourceSet, CheckError> {
    SourceSet::from_specs(default_specs())
}
