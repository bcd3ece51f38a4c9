//! Immutable settings snapshot consulted by the tracker and the statistics.
//!
//! Settings are loaded once per run and handed to consumers at construction.
//! Optional values stay `None` when they are not configured; consumers decide
//! what an unconfigured value means for them.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::time::format_duration;

/// Behaviour flags and work targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub behavior: Behavior,
    pub work: Work,
}

/// Flags controlling automatic tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    /// Round start and stop times to quarter hours.
    pub round_to_quarter: bool,
    /// Allow `start`/`stop` on Saturdays and Sundays.
    pub auto_track_weekends: bool,
    /// Allow `start`/`stop` on days recorded as holidays.
    pub auto_track_holidays: bool,
}

/// Work targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Work {
    /// Target working hours per day.
    #[serde(with = "optional_duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// Pause applied to days longer than six hours without an explicit pause.
    #[serde(with = "optional_duration", skip_serializing_if = "Option::is_none")]
    pub pause_time: Option<Duration>,
    /// Vacation days available per year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacation_days: Option<u32>,
}

/// A single setting value as returned by [`Settings::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Duration(Duration),
    Integer(i64),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Duration(value) => write!(f, "{}", format_duration(*value)),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl Settings {
    /// Every `(section, key)` pair [`Settings::read`] knows about.
    pub const KEYS: [(&'static str, &'static str); 6] = [
        ("behavior", "round_to_quarter"),
        ("behavior", "auto_track_weekends"),
        ("behavior", "auto_track_holidays"),
        ("work", "duration"),
        ("work", "pause_time"),
        ("work", "vacation_days"),
    ];

    /// Looks up a setting by section and key.
    ///
    /// Returns `None` for unknown keys and for values that are not configured.
    pub fn read(&self, section: &str, key: &str) -> Option<SettingValue> {
        match (section, key) {
            ("behavior", "round_to_quarter") => {
                Some(SettingValue::Bool(self.behavior.round_to_quarter))
            }
            ("behavior", "auto_track_weekends") => {
                Some(SettingValue::Bool(self.behavior.auto_track_weekends))
            }
            ("behavior", "auto_track_holidays") => {
                Some(SettingValue::Bool(self.behavior.auto_track_holidays))
            }
            ("work", "duration") => self.work.duration.map(SettingValue::Duration),
            ("work", "pause_time") => self.work.pause_time.map(SettingValue::Duration),
            ("work", "vacation_days") => self
                .work
                .vacation_days
                .map(|days| SettingValue::Integer(i64::from(days))),
            _ => None,
        }
    }
}

mod optional_duration {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::time::{format_duration, parse_duration};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_str(&format_duration(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|value| parse_duration(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
