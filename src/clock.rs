//! Time math for a single zone. Everything here is a pure function of a zone
//! and an instant, so callers decide what "now" is.

use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt::{self, Display, Formatter};

/// 12- or 24-hour clock
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn toggle(self) -> Self {
        match self {
            Self::TwelveHour => Self::TwentyFourHour,
            Self::TwentyFourHour => Self::TwelveHour,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TwelveHour => "12h",
            Self::TwentyFourHour => "24h",
        }
    }
}

/// Format the wall clock in a zone, with or without seconds
pub fn format_time(
    zone: Tz,
    instant: DateTime<Utc>,
    format: TimeFormat,
    seconds: bool,
) -> String {
    // https://docs.rs/chrono/latest/chrono/format/strftime/index.html
    let pattern = match (format, seconds) {
        (TimeFormat::TwelveHour, false) => "%I:%M %p",
        (TimeFormat::TwelveHour, true) => "%I:%M:%S %p",
        (TimeFormat::TwentyFourHour, false) => "%H:%M",
        (TimeFormat::TwentyFourHour, true) => "%H:%M:%S",
    };
    instant.with_timezone(&zone).format(pattern).to_string()
}

/// Label a zone's offset from UTC at the given instant, e.g. `UTC+3` or
/// `UTC+5:30`. If the zone's abbreviation is already GMT-based, that's used
/// as-is (with GMT swapped for UTC).
pub fn utc_offset(zone: Tz, instant: DateTime<Utc>) -> String {
    let local = instant.with_timezone(&zone);
    let abbreviation = local.format("%Z").to_string();
    if abbreviation.starts_with("GMT") {
        return abbreviation.replacen("GMT", "UTC", 1);
    }

    // Difference between the two wall clocks
    let minutes = (local.naive_local() - instant.naive_utc()).num_minutes();
    let sign = if minutes < 0 { '-' } else { '+' };
    let (hours, minutes) = (minutes.abs() / 60, minutes.abs() % 60);
    if minutes == 0 {
        format!("UTC{sign}{hours}")
    } else {
        format!("UTC{sign}{hours}:{minutes:02}")
    }
}

/// Local date of the host machine, e.g. `Monday, Jan 15, 2024`
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%A, %b %-d, %Y")
        .to_string()
}

/// Coarse part of the day, based on a zone's local hour
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Period {
    /// 06:00-11:59
    Morning,
    /// 12:00-17:59
    Day,
    /// 18:00-21:59
    Evening,
    /// 22:00-05:59
    Night,
}

impl Period {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Day,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    /// Period in a zone at the given instant
    pub fn at(zone: Tz, instant: DateTime<Utc>) -> Self {
        Self::from_hour(instant.with_timezone(&zone).hour())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Day => "Day",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Morning => "🌅",
            Self::Day => "☀️",
            Self::Evening => "🌆",
            Self::Night => "🌙",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
