//! Stint log records.

use serde::{Deserialize, Deserializer, Serialize};

/// One completed interval of tracked work.
///
/// Records are immutable once appended. The log is an ordered, append-only
/// sequence; insertion order is irrelevant to queries, which reorder by
/// `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StintRecord {
    /// What was worked on.
    pub task: String,

    /// When the stint began, in epoch seconds.
    pub start: i64,

    /// How long it lasted, in seconds.
    #[serde(deserialize_with = "non_negative_seconds")]
    pub duration: i64,

    /// Free-form details captured when the stint was logged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Treat redeemed right after this stint, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_picked: Option<String>,
}

/// Rejects negative durations so a malformed log fails at the load
/// boundary instead of skewing every aggregate downstream.
fn non_negative_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 0 {
        return Err(serde::de::Error::custom(format!(
            "duration must be non-negative, got {value}"
        )));
    }
    Ok(value)
}
