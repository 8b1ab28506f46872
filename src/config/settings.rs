// src/config/settings.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::{PriceChecker, DEFAULT_CURRENCY_PREFIX, DEFAULT_THRESHOLD};
use crate::fetch::{
    HttpFetcher, PageFetcher, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::source::{default_specs, SourceSet, SourceSpec};
use crate::timefmt::{ReportClock, TimeFormat, DEFAULT_UTC_OFFSET_HOURS};

pub const ENV_CONFIG_PATH: &str = "ROOM_WATCH_CONFIG_PATH";
pub const ENV_THRESHOLD: &str = "ROOM_WATCH_THRESHOLD";
pub const DEFAULT_CONFIG_PATH: &str = "config/room_watch.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prices strictly below this count as available.
    pub threshold: u64,
    pub currency_prefix: String,
    pub probe_timeout_secs: u64,
    pub utc_offset_hours: i32,
    /// `"zh-TW"` or a strftime pattern.
    pub time_format: TimeFormat,
    pub user_agent: String,
    pub accept_language: String,
    /// Replaces the built-in table when present.
    pub sources: Option<Vec<SourceSpec>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            probe_timeout_secs: DEFAULT_TIMEOUT_SECS,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            time_format: TimeFormat::ZhTw,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            sources: None,
        }
    }
}

impl Settings {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Lookup order:
    /// 1) $ROOM_WATCH_CONFIG_PATH (must exist)
    /// 2) config/room_watch.toml
    /// 3) built-in defaults
    ///
    /// `ROOM_WATCH_THRESHOLD` is applied on top.
    pub fn load_default() -> Result<Self> {
        let mut settings = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Self::default()
            }
        };
        if let Some(t) = parse_threshold_env(std::env::var(ENV_THRESHOLD).ok()) {
            settings.threshold = t;
        }
        Ok(settings)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.max(1))
    }

    pub fn clock(&self) -> ReportClock {
        ReportClock::new(self.utc_offset_hours, self.time_format.clone())
    }

    pub fn source_set(&self) -> Result<SourceSet> {
        let specs = self.sources.clone().unwrap_or_else(default_specs);
        SourceSet::from_specs(specs).context("building source table")
    }

    /// Checker backed by the real HTTP client.
    pub fn build_checker(&self) -> Result<PriceChecker> {
        let fetcher = HttpFetcher::new(self.probe_timeout(), &self.user_agent, &self.accept_language)?;
        self.build_checker_with(Arc::new(fetcher))
    }

    pub fn build_checker_with(&self, fetcher: Arc<dyn PageFetcher>) -> Result<PriceChecker> {
        Ok(PriceChecker::new(fetcher, self.source_set()?)
            .with_threshold(self.threshold)
            .with_currency_prefix(self.currency_prefix.clone())
            .with_probe_timeout(self.probe_timeout())
            .with_clock(self.clock()))
    }
}

// Unparsable values are ignored.
fn parse_threshold_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}
