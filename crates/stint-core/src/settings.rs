//! Tracker configuration: the task catalog and reward rules.

use serde::{Deserialize, Serialize};

use crate::duration::{self, FormatError};
use crate::treat::{HighScoreInterval, TreatRule};

/// Persistent configuration, loaded whole and re-persisted after mutation
/// (rule removal when a treat fires, task additions during a stint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Known tasks offered during stint selection.
    #[serde(default)]
    pub tasks: Vec<String>,

    /// Minimum duration before a stint counts, as a duration string.
    pub min_stint_time: String,

    /// Local time of day at which a running stint ends automatically,
    /// in the duration grammar (e.g. `22:30:00`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_stint_at: Option<String>,

    /// Rules compared against all-time cumulative duration.
    #[serde(default)]
    pub total_time_treats: Vec<TreatRule>,

    /// Sliding windows tracked for records and interval rewards.
    #[serde(default)]
    pub high_score_intervals: Vec<HighScoreInterval>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            min_stint_time: "15:00".to_string(),
            end_stint_at: None,
            total_time_treats: Vec::new(),
            high_score_intervals: Vec::new(),
        }
    }
}

impl Settings {
    /// Parses `min_stint_time` into seconds.
    pub fn min_stint_seconds(&self) -> Result<i64, FormatError> {
        duration::parse(&self.min_stint_time)
    }

    /// Parses `end_stint_at` into seconds past local midnight.
    pub fn end_stint_at_seconds(&self) -> Result<Option<i64>, FormatError> {
        self.end_stint_at.as_deref().map(duration::parse).transpose()
    }

    /// Checks every embedded duration string, so malformed configuration
    /// fails at the load boundary instead of mid-operation.
    pub fn validate(&self) -> Result<(), FormatError> {
        self.min_stint_seconds()?;
        self.end_stint_at_seconds()?;
        let interval_rules = self
            .high_score_intervals
            .iter()
            .flat_map(|interval| interval.treats.iter());
        for rule in self.total_time_treats.iter().chain(interval_rules) {
            if let Some(grace) = &rule.treat.grace_period {
                duration::parse(grace)?;
            }
        }
        Ok(())
    }
}
