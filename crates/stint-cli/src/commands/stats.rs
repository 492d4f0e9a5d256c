//! Stats command: weekly breakdowns, high scores, weekday averages.
//!
//! This module implements `stint stats` with its optional sections
//! (--weeks, --averages) and output formats (human-readable, JSON).

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use stint_core::stats::{display_weekday, total_duration, weekday_averages};
use stint_core::{Settings, StintRecord, WeekBucket, bucket_weeks, duration};
use stint_store::Store;

use super::util::{local_timezone, now_epoch};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Everything one stats invocation renders.
#[derive(Debug)]
pub struct StatsData {
    pub generated_at: i64,
    pub timezone: String,
    pub total_seconds: i64,
    /// Oldest first; the last bucket is the current week.
    pub buckets: Vec<WeekBucket>,
    pub high_scores: Vec<HighScoreEntry>,
    pub averages: Option<[i64; 7]>,
    pub recent_weeks: Option<usize>,
}

/// One configured high-score window with its metrics.
#[derive(Debug, Clone, Serialize)]
pub struct HighScoreEntry {
    pub unit: &'static str,
    pub amount: u32,
    pub record: i64,
    pub current: i64,
}

impl HighScoreEntry {
    fn label(&self) -> String {
        let plural = if self.amount == 1 { "" } else { "s" };
        format!("{} {}{plural}", self.amount, self.unit)
    }
}

// ========== Data Gathering ==========

/// Computes the report data from a log snapshot.
pub fn gather(
    records: &[StintRecord],
    settings: &Settings,
    recent_weeks: Option<usize>,
    with_averages: bool,
    now: i64,
) -> StatsData {
    let buckets = bucket_weeks(records, None, now);

    let high_scores = settings
        .high_score_intervals
        .iter()
        .map(|interval| {
            let stats = interval.stats(&buckets);
            HighScoreEntry {
                unit: interval.unit.label(),
                amount: interval.amount,
                record: stats.record,
                current: stats.current,
            }
        })
        .collect();

    let averages = with_averages.then(|| weekday_averages(&buckets));

    StatsData {
        generated_at: now,
        timezone: local_timezone(),
        total_seconds: total_duration(records),
        buckets,
        high_scores,
        averages,
        recent_weeks,
    }
}

// ========== Progress Bar ==========

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: i64, max: i64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Report Rendering ==========

/// "Week of Jan 13" label for a bucket start.
fn week_label(start: i64) -> String {
    let date = DateTime::<Utc>::from_timestamp(start, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
        .date_naive();
    date.format("%b %-d").to_string()
}

fn render_week(out: &mut String, title: &str, bucket: &WeekBucket, now: i64, mark_last: bool) {
    writeln!(out, "{title}:").unwrap();
    let max_daily = bucket.daily_totals.iter().copied().max().unwrap_or(0);
    let last = bucket.daily_totals.len().saturating_sub(1);

    for (i, &seconds) in bucket.daily_totals.iter().enumerate() {
        let name = WEEKDAYS
            .get(display_weekday(bucket, i, now))
            .copied()
            .unwrap_or("???");
        let marker = if mark_last && i == last { "  <- today" } else { "" };
        writeln!(
            out,
            "{name}  -  {:<10} {}{marker}",
            duration::format(seconds),
            progress_bar(seconds, max_daily)
        )
        .unwrap();
    }
    writeln!(out, "{title} total: {}", duration::format(bucket.total)).unwrap();
}

/// Formats the human-readable stats output.
pub fn format_stats(data: &StatsData) -> String {
    let mut out = String::new();

    if data.buckets.is_empty() {
        writeln!(out, "No stints recorded.").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Hint: Run 'stint start' to begin one.").unwrap();
        return out;
    }

    if data.buckets.len() > 1 {
        let last_week = &data.buckets[data.buckets.len() - 2];
        render_week(&mut out, "Last week", last_week, data.generated_at, false);
        writeln!(out).unwrap();
    }
    if let Some(this_week) = data.buckets.last() {
        render_week(&mut out, "This week", this_week, data.generated_at, true);
    }

    if !data.high_scores.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "High scores:").unwrap();
        for entry in &data.high_scores {
            writeln!(
                out,
                "{:<10}record {:<10}current {}",
                entry.label(),
                duration::format(entry.record),
                duration::format(entry.current)
            )
            .unwrap();
        }
    }

    if let Some(averages) = &data.averages {
        writeln!(out).unwrap();
        writeln!(out, "Weekday averages:").unwrap();
        for (name, &seconds) in WEEKDAYS.iter().zip(averages.iter()) {
            writeln!(out, "{name}  -  {}", duration::format(seconds)).unwrap();
        }
    }

    if let Some(count) = data.recent_weeks {
        writeln!(out).unwrap();
        writeln!(out, "Recent weeks:").unwrap();
        for bucket in data.buckets.iter().rev().take(count) {
            writeln!(
                out,
                "Week of {:<8}  -  {}",
                week_label(bucket.start),
                duration::format(bucket.total)
            )
            .unwrap();
        }
    }

    writeln!(out).unwrap();
    writeln!(out, "All-time total: {}", duration::format(data.total_seconds)).unwrap();
    out
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
struct JsonStats<'a> {
    generated_at: i64,
    timezone: &'a str,
    total_seconds: i64,
    weeks: Vec<JsonWeek>,
    high_scores: &'a [HighScoreEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    weekday_averages: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
struct JsonWeek {
    start: i64,
    daily_totals: Vec<i64>,
    total: i64,
    is_first: bool,
    is_last: bool,
}

/// Formats the stats data as JSON.
pub fn format_stats_json(data: &StatsData) -> Result<String> {
    let weeks = data
        .buckets
        .iter()
        .map(|bucket| JsonWeek {
            start: bucket.start,
            daily_totals: bucket.daily_totals.clone(),
            total: bucket.total,
            is_first: bucket.is_first,
            is_last: bucket.is_last,
        })
        .collect();

    let report = JsonStats {
        generated_at: data.generated_at,
        timezone: &data.timezone,
        total_seconds: data.total_seconds,
        weeks,
        high_scores: &data.high_scores,
        weekday_averages: data.averages.map(|a| a.to_vec()),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the stats command.
pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    weeks: Option<usize>,
    averages: bool,
    json: bool,
) -> Result<()> {
    let records = store.load_log()?;
    let settings = store.load_settings()?;
    let data = gather(&records, &settings, weeks, averages, now_epoch());

    if json {
        writeln!(writer, "{}", format_stats_json(&data)?)?;
    } else {
        write!(writer, "{}", format_stats(&data))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn bucket(
        start: i64,
        daily_totals: Vec<i64>,
        is_first: bool,
        is_last: bool,
    ) -> WeekBucket {
        let total = daily_totals.iter().sum();
        WeekBucket {
            start,
            daily_totals,
            total,
            is_first,
            is_last,
        }
    }

    fn data(buckets: Vec<WeekBucket>, high_scores: Vec<HighScoreEntry>) -> StatsData {
        let total_seconds = buckets.iter().map(|b| b.total).sum();
        StatsData {
            generated_at: 0,
            timezone: "UTC".to_string(),
            total_seconds,
            buckets,
            high_scores,
            averages: None,
            recent_weeks: None,
        }
    }

    // ========== Progress Bar Tests ==========

    #[test]
    fn test_progress_bar_full() {
        assert_eq!(progress_bar(100, 100), "██████████");
    }

    #[test]
    fn test_progress_bar_partial() {
        assert_eq!(progress_bar(50, 100), "█████░░░░░");
        assert_eq!(progress_bar(25, 100), "███░░░░░░░");
    }

    #[test]
    fn test_progress_bar_minimum_block() {
        assert_eq!(progress_bar(1, 100), "█░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_zero_value() {
        assert_eq!(progress_bar(0, 100), "░░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_zero_max() {
        assert_eq!(progress_bar(0, 0), "░░░░░░░░░░");
    }

    // ========== Rendering Tests ==========

    #[test]
    fn test_stats_empty_log() {
        let output = format_stats(&data(vec![], vec![]));
        assert_snapshot!(output, @r"
        No stints recorded.

        Hint: Run 'stint start' to begin one.
        ");
    }

    #[test]
    fn test_stats_two_weeks_with_high_scores() {
        let stats = data(
            vec![
                bucket(0, vec![1800, 3600], true, false),
                bucket(604_800, vec![3600, 0, 900], false, true),
            ],
            vec![HighScoreEntry {
                unit: "day",
                amount: 3,
                record: 5400,
                current: 4500,
            }],
        );
        let output = format_stats(&stats);
        assert_snapshot!(output, @r"
        Last week:
        Sat  -  30:00      █████░░░░░
        Sun  -  1:00:00    ██████████
        Last week total: 1:30:00

        This week:
        Mon  -  1:00:00    ██████████
        Tue  -  0          ░░░░░░░░░░
        Wed  -  15:00      ███░░░░░░░  <- today
        This week total: 1:15:00

        High scores:
        3 days    record 1:30:00   current 1:15:00

        All-time total: 2:45:00
        ");
    }

    #[test]
    fn test_single_week_marks_today_on_last_entry() {
        let stats = data(vec![bucket(0, vec![600], true, true)], vec![]);
        let output = format_stats(&stats);
        assert!(output.contains("<- today"));
        assert!(!output.contains("Last week"));
        // A single trimmed entry of a first week is its Sunday.
        assert!(output.contains("Sun  -  10:00"));
    }

    #[test]
    fn test_averages_section_lists_all_weekdays() {
        let mut stats = data(vec![bucket(0, vec![0; 7], true, true)], vec![]);
        stats.averages = Some([60, 0, 0, 0, 0, 0, 120]);
        let output = format_stats(&stats);
        assert!(output.contains("Weekday averages:"));
        assert!(output.contains("Mon  -  1:00"));
        assert!(output.contains("Sun  -  2:00"));
    }

    #[test]
    fn test_recent_weeks_section_is_newest_first() {
        let week = chrono::TimeZone::with_ymd_and_hms(&Local, 2025, 1, 13, 0, 0, 0)
            .single()
            .unwrap()
            .timestamp();
        let mut stats = data(
            vec![
                bucket(week - 604_800, vec![0; 7], true, false),
                bucket(week, vec![3600, 0, 0], false, true),
            ],
            vec![],
        );
        stats.recent_weeks = Some(2);
        let output = format_stats(&stats);
        let jan13 = output.find("Jan 13").expect("newest week listed");
        let jan6 = output.find("Jan 6").expect("older week listed");
        assert!(jan13 < jan6, "newest week should come first");
    }

    #[test]
    fn test_json_output_shape() {
        let stats = data(vec![bucket(0, vec![100, 200], true, true)], vec![]);
        let json = format_stats_json(&stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_seconds"], 300);
        assert_eq!(value["weeks"][0]["daily_totals"][1], 200);
        assert_eq!(value["weeks"][0]["is_first"], true);
        assert!(value.get("weekday_averages").is_none());
    }

    #[test]
    fn test_gather_computes_high_scores_from_intervals() {
        use stint_core::{HighScoreInterval, WindowUnit};

        let now = chrono::TimeZone::with_ymd_and_hms(&Local, 2025, 1, 15, 12, 0, 0)
            .single()
            .unwrap()
            .timestamp();
        let monday_nine = chrono::TimeZone::with_ymd_and_hms(&Local, 2025, 1, 13, 9, 0, 0)
            .single()
            .unwrap()
            .timestamp();
        let records = [StintRecord {
            task: "test".to_string(),
            start: monday_nine,
            duration: 3600,
            notes: None,
            treat_picked: None,
        }];
        let settings = Settings {
            high_score_intervals: vec![HighScoreInterval {
                unit: WindowUnit::Day,
                amount: 3,
                treats: vec![],
            }],
            ..Settings::default()
        };

        let data = gather(&records, &settings, None, true, now);
        assert_eq!(data.total_seconds, 3600);
        assert_eq!(data.high_scores.len(), 1);
        // Mon + Tue + Wed is the only 3-day window so far.
        assert_eq!(data.high_scores[0].record, 3600);
        assert_eq!(data.high_scores[0].current, 3600);
        // First-week entries are right-aligned, so the three days land on
        // Fri..Sun and the active one averages into the Friday slot.
        assert_eq!(data.averages.unwrap()[4], 3600);
    }
}
