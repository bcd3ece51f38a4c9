//! Absence kinds and the rules attached to each of them.
//!
//! Counting, crediting and overwrite protection are all read from
//! [`AbsenceKind::rules`], so adding a kind means extending one table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Classification of a day record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AbsenceKind {
    /// An ordinary worked day.
    #[default]
    Workday,
    Vacation,
    Flexday,
    Sickness,
    /// Public holiday.
    Holiday,
}

/// How a day contributes to the worked hours of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credit {
    /// The recorded duration counts.
    Worked,
    /// The configured target daily hours are credited.
    TargetHours,
    /// Nothing is credited.
    Nothing,
}

/// Per-kind behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsenceRules {
    /// Single-letter abbreviation used on the command line and in reports.
    pub abbreviation: char,
    /// Code persisted in the record store.
    pub code: u8,
    pub credit: Credit,
    /// A weekday of this kind is removed from the target working days.
    pub reduces_target: bool,
    /// Automatic tracking and absence notification never overwrite it.
    pub protected: bool,
}

impl AbsenceKind {
    pub const ALL: [Self; 5] = [
        Self::Workday,
        Self::Vacation,
        Self::Flexday,
        Self::Sickness,
        Self::Holiday,
    ];

    #[must_use]
    pub const fn rules(self) -> AbsenceRules {
        match self {
            Self::Workday => AbsenceRules {
                abbreviation: 'W',
                code: 0,
                credit: Credit::Worked,
                reduces_target: false,
                protected: false,
            },
            Self::Vacation => AbsenceRules {
                abbreviation: 'V',
                code: 1,
                credit: Credit::TargetHours,
                reduces_target: false,
                protected: false,
            },
            Self::Flexday => AbsenceRules {
                abbreviation: 'F',
                code: 2,
                credit: Credit::Nothing,
                reduces_target: false,
                protected: false,
            },
            Self::Sickness => AbsenceRules {
                abbreviation: 'S',
                code: 3,
                credit: Credit::TargetHours,
                reduces_target: false,
                protected: false,
            },
            Self::Holiday => AbsenceRules {
                abbreviation: 'H',
                code: 4,
                credit: Credit::Nothing,
                reduces_target: true,
                protected: true,
            },
        }
    }

    #[must_use]
    pub const fn abbreviation(self) -> char {
        self.rules().abbreviation
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self.rules().code
    }

    #[must_use]
    pub const fn is_protected(self) -> bool {
        self.rules().protected
    }

    /// Looks up a kind by its persisted code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workday => "workday",
            Self::Vacation => "vacation",
            Self::Flexday => "flexday",
            Self::Sickness => "sickness",
            Self::Holiday => "holiday",
        }
    }
}

impl fmt::Display for AbsenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accepts the abbreviation (case-insensitive) or the full name.
impl FromStr for AbsenceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| {
                wanted == kind.as_str()
                    || wanted.chars().eq(kind.abbreviation().to_lowercase())
            })
            .ok_or_else(|| ValidationError::UnknownAbsence(s.to_string()))
    }
}

impl Serialize for AbsenceKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for AbsenceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown absence code: {code}")))
    }
}
