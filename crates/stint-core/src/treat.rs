//! Treat rules, the earned-treat bank, and the reward state machine.
//!
//! A rule fires at most once in its lifetime: the evaluation that fires it
//! also removes it from the active rule set, so it cannot mint a second
//! bank entry even if the underlying metric later recedes and re-crosses
//! the threshold.

use serde::{Deserialize, Serialize};

use crate::duration::{self, FormatError};
use crate::record::StintRecord;
use crate::settings::Settings;
use crate::stats::total_duration;
use crate::week::WeekBucket;
use crate::window::{WindowStats, daily_series, running_window_stats, weekly_series};

/// A configured reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treat {
    /// What the reward is.
    pub description: String,

    /// How long the treat stays redeemable once earned, as a duration
    /// string. Absent means it never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<String>,
}

/// A reward threshold, in hours, against one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatRule {
    pub hours: f64,
    pub treat: Treat,
}

impl TreatRule {
    #[allow(clippy::cast_precision_loss)]
    fn fires_at(&self, metric_seconds: i64) -> bool {
        metric_seconds as f64 >= self.hours * 3600.0
    }
}

/// The tracked unit of a high-score window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
    Day,
    Week,
}

impl WindowUnit {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// A configured `(unit, amount)` sliding window and its interval rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreInterval {
    pub unit: WindowUnit,
    pub amount: u32,
    #[serde(default)]
    pub treats: Vec<TreatRule>,
}

impl HighScoreInterval {
    /// Window statistics for this interval over the given buckets.
    pub fn stats(&self, buckets: &[WeekBucket]) -> WindowStats {
        let series = match self.unit {
            WindowUnit::Day => daily_series(buckets),
            WindowUnit::Week => weekly_series(buckets),
        };
        running_window_stats(&series, self.amount as usize)
    }
}

/// An earned, not-yet-redeemed treat.
///
/// Entries with identical descriptions are independent instances; there is
/// no de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatBankEntry {
    pub description: String,

    /// Epoch seconds at which the entry stops being redeemable; absent
    /// means it never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Evaluates every active rule against one metrics snapshot.
///
/// Fired rules are removed from `settings` and their bank entries returned
/// for the caller to append and persist together with the rule set.
/// Nothing is mutated until every firing rule's grace period has parsed,
/// so a bad one cannot leave the rule set and bank half-updated.
pub fn evaluate(
    settings: &mut Settings,
    records: &[StintRecord],
    buckets: &[WeekBucket],
    now: i64,
) -> Result<Vec<TreatBankEntry>, FormatError> {
    let total = total_duration(records);
    let interval_currents: Vec<i64> = settings
        .high_score_intervals
        .iter()
        .map(|interval| interval.stats(buckets).current)
        .collect();

    let mut earned = Vec::new();
    for rule in &settings.total_time_treats {
        if rule.fires_at(total) {
            earned.push(mint(rule, now)?);
        }
    }
    for (interval, current) in settings.high_score_intervals.iter().zip(&interval_currents) {
        for rule in &interval.treats {
            if rule.fires_at(*current) {
                earned.push(mint(rule, now)?);
            }
        }
    }

    settings.total_time_treats.retain(|rule| !rule.fires_at(total));
    for (interval, current) in settings
        .high_score_intervals
        .iter_mut()
        .zip(&interval_currents)
    {
        interval.treats.retain(|rule| !rule.fires_at(*current));
    }

    if !earned.is_empty() {
        tracing::debug!(count = earned.len(), "treat rules fired");
    }
    Ok(earned)
}

fn mint(rule: &TreatRule, now: i64) -> Result<TreatBankEntry, FormatError> {
    let expires_at = rule
        .treat
        .grace_period
        .as_deref()
        .map(duration::parse)
        .transpose()?
        .map(|grace| now + grace);
    Ok(TreatBankEntry {
        description: rule.treat.description.clone(),
        expires_at,
    })
}

/// Removes entries past their expiry. Returns the purged entries so the
/// caller can report them before offering redemption.
pub fn purge_expired(bank: &mut Vec<TreatBankEntry>, now: i64) -> Vec<TreatBankEntry> {
    let mut purged = Vec::new();
    bank.retain(|entry| match entry.expires_at {
        Some(expires_at) if expires_at <= now => {
            purged.push(entry.clone());
            false
        }
        _ => true,
    });
    purged
}

/// Orders the bank soonest-expiring first; entries that never expire sort
/// last.
pub fn sort_by_expiry(bank: &mut [TreatBankEntry]) {
    bank.sort_by_key(|entry| entry.expires_at.unwrap_or(i64::MAX));
}
