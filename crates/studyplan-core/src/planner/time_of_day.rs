//! Wall-clock `HH:MM` parsing.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Hour and minute of a day. Only constructed through [`TimeOfDay::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// Parse `H:MM` or `HH:MM`, e.g. `"09:00"` or `"22:30"`.
    pub fn parse(value: &str) -> Result<Self, FormatError> {
        let trimmed = value.trim();
        let (hour, minute) = trimmed
            .split_once(':')
            .filter(|(_, rest)| !rest.contains(':'))
            .ok_or_else(|| FormatError::Malformed {
                value: value.to_string(),
            })?;

        let hour = parse_component(hour, value)?;
        let minute = parse_component(minute, value)?;

        if hour > 23 {
            return Err(FormatError::HourOutOfRange { hour });
        }
        if minute > 59 {
            return Err(FormatError::MinuteOutOfRange { minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn minutes_from_midnight(&self) -> i64 {
        i64::from(self.hour * 60 + self.minute)
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::MIN + chrono::Duration::minutes(self.minutes_from_midnight())
    }
}

fn parse_component(component: &str, value: &str) -> Result<u32, FormatError> {
    if component.is_empty() || !component.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::NonNumeric {
            value: value.to_string(),
        });
    }
    // Digits only, so overflow is the sole failure; saturate and let the
    // range check report it.
    Ok(component.parse().unwrap_or(u32::MAX))
}

impl FromStr for TimeOfDay {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
