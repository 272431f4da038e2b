use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const MS_IN_DAY: u64 = 86_400_000;

/// Bar widths accepted from exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum BarInterval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FourHours,
    OneDay,
}

impl BarInterval {
    pub fn as_millis(&self) -> u64 {
        const MINUTE: u64 = 60_000;
        match self {
            BarInterval::OneMinute => MINUTE,
            BarInterval::FiveMinutes => 5 * MINUTE,
            BarInterval::FifteenMinutes => 15 * MINUTE,
            BarInterval::ThirtyMinutes => 30 * MINUTE,
            BarInterval::OneHour => 60 * MINUTE,
            BarInterval::TwoHours => 120 * MINUTE,
            BarInterval::FourHours => 240 * MINUTE,
            BarInterval::OneDay => MS_IN_DAY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BarInterval::OneMinute => "1m",
            BarInterval::FiveMinutes => "5m",
            BarInterval::FifteenMinutes => "15m",
            BarInterval::ThirtyMinutes => "30m",
            BarInterval::OneHour => "1h",
            BarInterval::TwoHours => "2h",
            BarInterval::FourHours => "4h",
            BarInterval::OneDay => "1d",
        }
    }
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarInterval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(BarInterval::OneMinute),
            "5m" => Ok(BarInterval::FiveMinutes),
            "15m" => Ok(BarInterval::FifteenMinutes),
            "30m" => Ok(BarInterval::ThirtyMinutes),
            "1h" | "60m" => Ok(BarInterval::OneHour),
            "2h" => Ok(BarInterval::TwoHours),
            "4h" => Ok(BarInterval::FourHours),
            "1d" | "24h" => Ok(BarInterval::OneDay),
            other => Err(ConfigError::UnknownInterval(other.to_string())),
        }
    }
}

impl TryFrom<String> for BarInterval {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Number of bars of `interval` that cover `days` of history. Never less than one.
pub fn bars_for_lookback(days: u32, interval: BarInterval) -> usize {
    let total_ms = u64::from(days) * MS_IN_DAY;
    (total_ms / interval.as_millis()).max(1) as usize
}
