// src/timefmt.rs
//! Report timestamp rendering in a fixed offset (default: Taipei, UTC+8).

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Deserialize;

pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TimeFormat {
    /// `2025/12/5 下午3:04:05`
    #[default]
    ZhTw,
    /// Any chrono strftime pattern.
    Strftime(String),
}

impl From<String> for TimeFormat {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("zh-tw") {
            TimeFormat::ZhTw
        } else {
            TimeFormat::Strftime(s)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportClock {
    offset: FixedOffset,
    format: TimeFormat,
}

impl Default for ReportClock {
    fn default() -> Self {
        Self::new(DEFAULT_UTC_OFFSET_HOURS, TimeFormat::ZhTw)
    }
}

impl ReportClock {
    /// Offsets outside ±23h fall back to UTC.
    pub fn new(utc_offset_hours: i32, format: TimeFormat) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset"));
        Self { offset, format }
    }

    pub fn format(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        match &self.format {
            TimeFormat::ZhTw => {
                let (pm, hour12) = local.hour12();
                format!(
                    "{} {}{}:{:02}:{:02}",
                    local.format("%Y/%-m/%-d"),
                    if pm { "下午" } else { "上午" },
                    hour12,
                    local.minute(),
                    local.second()
                )
            }
            TimeFormat::Strftime(pattern) => {
                // An invalid specifier makes chrono's Display fail; don't let it panic.
                use std::fmt::Write as _;
                let mut out = String::new();
                match write!(out, "{}", local.format(pattern)) {
                    Ok(()) => out,
                    Err(_) => local.to_rfc3339(),
                }
            }
        }
    }
}
