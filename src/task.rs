// Task data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task identifier: creation timestamp in milliseconds, bumped on collision
pub type TaskId = i64;

/// A single to-do entry
///
/// Serialized as `{id, text, time: "HH:MM", completed, createdAt}` with
/// `createdAt` as an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub time: TaskTime,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: TaskId, text: impl Into<String>, time: TaskTime, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            time,
            completed: false,
            created_at,
        }
    }
}

/// Time of day a task is scheduled for (24-hour clock)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskTime {
    hour: u8,
    minute: u8,
}

impl TaskTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, InvalidTime> {
        if hour > 23 || minute > 59 {
            return Err(InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for TaskTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Rejected time-of-day string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time {0:?} (expected HH:MM)")]
pub struct InvalidTime(pub String);

impl FromStr for TaskTime {
    type Err = InvalidTime;

    /// Accepts `H:MM` or `HH:MM`, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || InvalidTime(s.to_string());

        let (hour, minute) = trimmed.split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        if !hour.chars().chain(minute.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TaskTime {
    type Error = InvalidTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskTime> for String {
    fn from(time: TaskTime) -> Self {
        time.to_string()
    }
}

/// Current timestamp in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
