//! Policies for date-time text that carries no timezone offset.

use serde::{Deserialize, Serialize};

/// How to resolve a date-time that has no `Z` or `±HH:MM` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnspecifiedOffsetPolicy {
    /// Interpret the wall-clock time in the system's local time zone
    AssumeLocal,
    /// Interpret the wall-clock time as UTC
    #[default]
    AssumeUtc,
    /// Refuse to produce an instant
    Error,
}
