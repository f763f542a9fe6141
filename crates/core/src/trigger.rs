// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger kinds and their construction
//!
//! Timestamps are local wall-clock values in the scheduler's start-boundary
//! format (`YYYY-mm-ddTHH:MM:SS`).

use crate::clock::Clock;
use crate::error::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Format of trigger boundaries, both on input and towards the service
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Start offset used when no time is given
pub const DEFAULT_START_DELAY: Duration = Duration::from_secs(2 * 60);

/// Requested trigger kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Daily,
    Once,
    Logon,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Daily => "daily",
            TriggerKind::Once => "once",
            TriggerKind::Logon => "logon",
        }
    }
}

impl FromStr for TriggerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(TriggerKind::Daily),
            "once" => Ok(TriggerKind::Once),
            "logon" => Ok(TriggerKind::Logon),
            _ => Err(ValidationError::UnsupportedTriggerKind(s.to_string())),
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trigger attached to a task definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerSpec {
    /// Recurs every day starting at the boundary
    Daily {
        #[serde(with = "boundary")]
        start_boundary: NaiveDateTime,
    },
    /// Fires a single time
    Once {
        #[serde(with = "boundary")]
        run_at: NaiveDateTime,
    },
    /// Fires at each interactive logon
    Logon,
}

impl TriggerSpec {
    pub fn kind(&self) -> TriggerKind {
        match self {
            TriggerSpec::Daily { .. } => TriggerKind::Daily,
            TriggerSpec::Once { .. } => TriggerKind::Once,
            TriggerSpec::Logon => TriggerKind::Logon,
        }
    }

    /// Boundary timestamp, if this kind carries one
    pub fn boundary(&self) -> Option<NaiveDateTime> {
        match self {
            TriggerSpec::Daily { start_boundary } => Some(*start_boundary),
            TriggerSpec::Once { run_at } => Some(*run_at),
            TriggerSpec::Logon => None,
        }
    }

    /// Recurrence interval in days, if any
    pub fn days_interval(&self) -> Option<u16> {
        match self {
            TriggerSpec::Daily { .. } => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSpec::Daily { start_boundary } => {
                write!(f, "daily from {}", start_boundary.format(TIME_FORMAT))
            }
            TriggerSpec::Once { run_at } => write!(f, "once at {}", run_at.format(TIME_FORMAT)),
            TriggerSpec::Logon => f.write_str("at logon"),
        }
    }
}

/// Parse a boundary timestamp
pub fn parse_time(input: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(input.trim(), TIME_FORMAT)
        .map_err(|_| ValidationError::InvalidTimeFormat(input.to_string()))
}

/// Builds triggers, filling in the default start time from a clock
#[derive(Debug, Clone)]
pub struct TriggerFactory<C: Clock> {
    clock: C,
    default_delay: Duration,
}

impl<C: Clock> TriggerFactory<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            default_delay: DEFAULT_START_DELAY,
        }
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Create a trigger from raw input.
    ///
    /// The timestamp is checked even for `logon`, which then ignores it.
    pub fn create(&self, kind: &str, when: Option<&str>) -> Result<TriggerSpec, ValidationError> {
        let kind: TriggerKind = kind.parse()?;
        let when = when.map(parse_time).transpose()?;
        Ok(self.build(kind, when))
    }

    /// Create a trigger from already-parsed input
    pub fn build(&self, kind: TriggerKind, when: Option<NaiveDateTime>) -> TriggerSpec {
        match kind {
            TriggerKind::Daily => TriggerSpec::Daily {
                start_boundary: when.unwrap_or_else(|| self.default_start()),
            },
            TriggerKind::Once => TriggerSpec::Once {
                run_at: when.unwrap_or_else(|| self.default_start()),
            },
            TriggerKind::Logon => TriggerSpec::Logon,
        }
    }

    fn default_start(&self) -> NaiveDateTime {
        let delay = chrono::Duration::from_std(self.default_delay)
            .unwrap_or_else(|_| chrono::Duration::minutes(2));
        self.clock.now() + delay
    }
}

mod boundary {
    use super::TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
