//! Session ID generation and parsing.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

const ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A session identifier derived from the session's start time.
///
/// Format: `YYYYMMDD_HHMMSS` in local time. Second resolution, so two
/// sessions started within the same second share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId {
    started_at: NaiveDateTime,
}

impl SessionId {
    /// Create an id for a session starting now.
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    /// Create an id for a session that started at `started_at`.
    ///
    /// Sub-second precision is dropped.
    pub fn from_datetime(started_at: NaiveDateTime) -> Self {
        let started_at = started_at.with_nanosecond(0).unwrap_or(started_at);
        Self { started_at }
    }

    /// Get the session start time.
    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Parse a session ID from a string.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, ID_FORMAT)
            .ok()
            .map(Self::from_datetime)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.started_at.format(ID_FORMAT))
    }
}

// Stored as its string form
impl Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SessionId::parse(&s).ok_or_else(|| serde::de::Error::custom("Invalid session ID format"))
    }
}
