//! Date and date-range lookups over the stint log.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use stint_core::duration::DAY;
use stint_core::stats::display_weekday;
use stint_core::week::date_start;
use stint_core::{StintRecord, WeekBucket, bucket_weeks, duration};
use stint_store::Store;

use super::util::{now_epoch, parse_date};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Inclusive instant window for a date span.
fn date_window(from: NaiveDate, to: NaiveDate) -> (i64, i64) {
    let start = date_start(from);
    let end = date_start(to) + DAY - 1;
    (start, end.max(start))
}

fn local_time(instant: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp(instant, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// Formats the record listing and per-week breakdown for a window.
pub fn format_lookup(
    records: &[StintRecord],
    window: (i64, i64),
    heading: &str,
    now: i64,
) -> String {
    use std::fmt::Write as _;

    let mut selected: Vec<&StintRecord> = records
        .iter()
        .filter(|r| r.start >= window.0 && r.start <= window.1)
        .collect();
    selected.sort_by_key(|r| r.start);

    let mut out = String::new();
    if selected.is_empty() {
        writeln!(out, "No stints recorded {heading}.").unwrap();
        return out;
    }

    writeln!(out, "Stints {heading}:").unwrap();
    for record in &selected {
        let when = local_time(record.start).format("%Y-%m-%d %H:%M");
        write!(
            out,
            "  {when}  {:<20} {}",
            record.task,
            duration::format(record.duration)
        )
        .unwrap();
        if let Some(notes) = &record.notes {
            write!(out, "  ({notes})").unwrap();
        }
        writeln!(out).unwrap();
    }

    for bucket in bucket_weeks(records, Some(window), now) {
        writeln!(out).unwrap();
        let label = local_time(bucket.start).date_naive().format("%b %-d, %Y");
        writeln!(out, "Week of {label}:").unwrap();
        for (i, &seconds) in bucket.daily_totals.iter().enumerate() {
            let name = WEEKDAYS
                .get(display_weekday(&bucket, i, now))
                .copied()
                .unwrap_or("???");
            writeln!(out, "  {name}  -  {}", duration::format(seconds)).unwrap();
        }
        writeln!(out, "  Total: {}", duration::format(bucket.total)).unwrap();
    }

    let range_total: i64 = selected.iter().map(|r| r.duration).sum();
    writeln!(out).unwrap();
    writeln!(out, "Range total: {}", duration::format(range_total)).unwrap();
    out
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
struct JsonLookup<'a> {
    from: String,
    to: String,
    stints: Vec<&'a StintRecord>,
    weeks: Vec<JsonWeek>,
    total_seconds: i64,
}

#[derive(Debug, Serialize)]
struct JsonWeek {
    start: i64,
    daily_totals: Vec<i64>,
    total: i64,
}

fn format_lookup_json(
    records: &[StintRecord],
    window: (i64, i64),
    from: NaiveDate,
    to: NaiveDate,
    now: i64,
) -> Result<String> {
    let mut stints: Vec<&StintRecord> = records
        .iter()
        .filter(|r| r.start >= window.0 && r.start <= window.1)
        .collect();
    stints.sort_by_key(|r| r.start);
    let total_seconds = stints.iter().map(|r| r.duration).sum();

    let weeks = bucket_weeks(records, Some(window), now)
        .into_iter()
        .map(|bucket: WeekBucket| JsonWeek {
            start: bucket.start,
            daily_totals: bucket.daily_totals,
            total: bucket.total,
        })
        .collect();

    let lookup = JsonLookup {
        from: from.format("%Y-%m-%d").to_string(),
        to: to.format("%Y-%m-%d").to_string(),
        stints,
        weeks,
        total_seconds,
    };
    Ok(serde_json::to_string_pretty(&lookup)?)
}

// ========== Public Interface ==========

/// Runs the log lookup command. A malformed date aborts only this
/// operation.
pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    date: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let (from, to) = match (date, from, to) {
        (Some(date), None, None) => {
            let day = parse_date(date)?;
            (day, day)
        }
        (None, Some(from), Some(to)) => {
            let from = parse_date(from)?;
            let to = parse_date(to)?;
            if to < from {
                bail!("range end {to} is before range start {from}");
            }
            (from, to)
        }
        _ => bail!("pass either --date or both --from and --to"),
    };

    let records = store.load_log()?;
    let window = date_window(from, to);
    let now = now_epoch();

    if json {
        writeln!(
            writer,
            "{}",
            format_lookup_json(&records, window, from, to, now)?
        )?;
    } else {
        let heading = if from == to {
            format!("on {from}")
        } else {
            format!("from {from} to {to}")
        };
        write!(writer, "{}", format_lookup(&records, window, &heading, now))?;
    }
    Ok(())
}
