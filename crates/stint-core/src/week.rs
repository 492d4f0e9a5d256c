//! Calendar-week bucketing of the stint log.
//!
//! Weeks run Monday through Sunday in local time. Buckets are derived on
//! demand for every read and never persisted; at personal-log scale the
//! O(n) recomputation per query is cheaper than any staleness risk.

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::duration::DAY;
use crate::record::StintRecord;

/// One calendar week of recorded activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    /// Epoch seconds of this week's local-time Monday 00:00.
    pub start: i64,

    /// Per-day duration sums, at most seven entries.
    ///
    /// A full week has seven entries indexed Monday through Sunday. The
    /// earliest week loses its leading inactive days; the week containing
    /// `now` stops at the current weekday, with no entries for future days.
    pub daily_totals: Vec<i64>,

    /// Sum of `daily_totals`.
    pub total: i64,

    /// Marks the earliest bucket of the returned sequence.
    pub is_first: bool,

    /// Marks the latest bucket of the returned sequence.
    pub is_last: bool,
}

fn to_local(instant: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp(instant, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// Local midnight of a calendar date, as an instant.
///
/// A DST gap at midnight falls forward to 01:00, which always exists; an
/// ambiguous midnight resolves to the earlier offset.
fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            Local.from_local_datetime(&one_am).unwrap()
        }
    }
}

/// The Monday of the week containing `date`.
fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Epoch seconds of the local-time Monday 00:00 of the week containing
/// `instant`.
pub fn week_start(instant: i64) -> i64 {
    local_midnight(monday_of(to_local(instant).date_naive())).timestamp()
}

/// Epoch seconds of the local midnight beginning the day containing
/// `instant`.
pub fn day_start(instant: i64) -> i64 {
    local_midnight(to_local(instant).date_naive()).timestamp()
}

/// Epoch seconds of the local midnight beginning `date`.
pub fn date_start(date: NaiveDate) -> i64 {
    local_midnight(date).timestamp()
}

/// Weekday index of `instant` in local time, 0 = Monday .. 6 = Sunday.
#[allow(clippy::cast_possible_truncation)]
pub fn weekday_index(instant: i64) -> usize {
    to_local(instant).weekday().num_days_from_monday() as usize
}

/// Buckets the log into calendar weeks, oldest first.
///
/// With no explicit window the buckets span from the week containing the
/// earliest record to the week containing `now`, inclusive, so interior
/// silent weeks appear with seven zeros. An explicit `(start, end)` instant
/// window instead selects exactly the weeks overlapping it; records of an
/// edge week are summed over the whole week, since buckets are whole
/// calendar weeks.
///
/// `now` only marks where the latest week stops; it is a parameter so the
/// engine stays a pure function of its inputs. An empty log always
/// produces an empty sequence.
pub fn bucket_weeks(
    records: &[StintRecord],
    window: Option<(i64, i64)>,
    now: i64,
) -> Vec<WeekBucket> {
    if records.is_empty() {
        return Vec::new();
    }

    let (span_start, span_end) = match window {
        Some((start, end)) => (start, end.max(start)),
        None => {
            let earliest = records.iter().map(|r| r.start).min().unwrap_or(now);
            (earliest, now)
        }
    };

    let first_monday = monday_of(to_local(span_start).date_naive());
    let last_monday = monday_of(to_local(span_end).date_naive());
    let now_monday = monday_of(to_local(now).date_naive());

    let mut buckets = Vec::new();
    let mut monday = first_monday;
    while monday <= last_monday {
        let start = local_midnight(monday).timestamp();
        let is_first = monday == first_monday;
        let is_last = monday == last_monday;

        // Future days of the current week are not emitted at all.
        let days = if is_last && monday == now_monday {
            weekday_index(now) + 1
        } else {
            7
        };

        let mut daily_totals: Vec<i64> = (0..days)
            .map(|i| {
                let day_begin = start + (i as i64) * DAY;
                let day_end = day_begin + DAY;
                records
                    .iter()
                    .filter(|r| r.start >= day_begin && r.start < day_end)
                    .map(|r| r.duration)
                    .sum()
            })
            .collect();

        if is_first {
            daily_totals = trim_leading_zero_days(daily_totals);
        }

        let total = daily_totals.iter().sum();
        buckets.push(WeekBucket {
            start,
            daily_totals,
            total,
            is_first,
            is_last,
        });
        monday = monday + Duration::days(7);
    }

    buckets
}

/// Drops leading inactive days from the earliest week. A fully inactive
/// week keeps only its single last day.
fn trim_leading_zero_days(daily_totals: Vec<i64>) -> Vec<i64> {
    match daily_totals.iter().position(|&total| total != 0) {
        Some(first_active) => daily_totals[first_active..].to_vec(),
        None => daily_totals
            .last()
            .map_or_else(Vec::new, |&last| vec![last]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_epoch(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("unambiguous test instant")
            .timestamp()
    }

    fn stint(start: i64, duration: i64) -> StintRecord {
        StintRecord {
            task: "test".to_string(),
            start,
            duration,
            notes: None,
            treat_picked: None,
        }
    }

    #[test]
    fn empty_log_produces_no_buckets() {
        let now = local_epoch(2025, 1, 15, 12, 0);
        assert!(bucket_weeks(&[], None, now).is_empty());
        assert!(bucket_weeks(&[], Some((0, now)), now).is_empty());
    }

    #[test]
    fn week_start_is_the_local_monday_midnight() {
        // Jan 15, 2025 is a Wednesday; its week starts Monday Jan 13.
        let wednesday = local_epoch(2025, 1, 15, 9, 30);
        assert_eq!(week_start(wednesday), local_epoch(2025, 1, 13, 0, 0));
        // A Monday belongs to its own week.
        let monday = local_epoch(2025, 1, 13, 0, 0);
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn weekday_index_starts_at_monday() {
        assert_eq!(weekday_index(local_epoch(2025, 1, 13, 8, 0)), 0);
        assert_eq!(weekday_index(local_epoch(2025, 1, 19, 8, 0)), 6);
    }

    #[test]
    fn monday_stint_lands_in_slot_zero() {
        // The week of Monday Jan 13, 2025, viewed from its Sunday.
        let start = local_epoch(2025, 1, 13, 9, 0);
        let now = local_epoch(2025, 1, 19, 20, 0);
        let buckets = bucket_weeks(&[stint(start, 3600)], None, now);

        assert_eq!(buckets.len(), 1);
        let bucket = &buckets[0];
        assert_eq!(bucket.start, local_epoch(2025, 1, 13, 0, 0));
        assert_eq!(bucket.daily_totals, vec![3600, 0, 0, 0, 0, 0, 0]);
        assert_eq!(bucket.total, 3600);
        assert!(bucket.is_first);
        assert!(bucket.is_last);
    }

    #[test]
    fn first_week_is_trimmed_to_its_first_active_day() {
        // Earliest activity on Wednesday: Mon and Tue are dropped, the
        // inactive Thu..Sun stay positionally.
        let wednesday = local_epoch(2025, 1, 15, 9, 0);
        let next_tuesday = local_epoch(2025, 1, 21, 9, 0);
        let now = local_epoch(2025, 1, 22, 12, 0);
        let buckets = bucket_weeks(
            &[stint(wednesday, 1800), stint(next_tuesday, 600)],
            None,
            now,
        );

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].daily_totals, vec![1800, 0, 0, 0, 0]);
        assert!(buckets[0].is_first);
        assert!(!buckets[0].is_last);

        // Current week stops at Wednesday (today).
        assert_eq!(buckets[1].daily_totals, vec![0, 600, 0]);
        assert!(buckets[1].is_last);
    }

    #[test]
    fn fully_inactive_first_week_keeps_only_its_last_day() {
        // A zero-duration record makes the first week entirely inactive.
        let monday = local_epoch(2025, 1, 13, 10, 0);
        let next_thursday = local_epoch(2025, 1, 23, 10, 0);
        let now = local_epoch(2025, 1, 24, 12, 0);
        let buckets = bucket_weeks(&[stint(monday, 0), stint(next_thursday, 900)], None, now);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].daily_totals, vec![0]);
        assert_eq!(buckets[0].total, 0);
    }

    #[test]
    fn interior_silent_weeks_appear_with_seven_zeros() {
        let first = local_epoch(2025, 1, 7, 9, 0);
        let last = local_epoch(2025, 1, 21, 9, 0);
        let now = local_epoch(2025, 1, 24, 12, 0);
        let buckets = bucket_weeks(&[stint(first, 100), stint(last, 200)], None, now);

        assert_eq!(buckets.len(), 3);
        let middle = &buckets[1];
        assert_eq!(middle.daily_totals, vec![0; 7]);
        assert_eq!(middle.total, 0);
        assert!(!middle.is_first);
        assert!(!middle.is_last);
    }

    #[test]
    fn current_week_stops_at_the_current_weekday() {
        let monday = local_epoch(2025, 1, 13, 9, 0);
        let now = local_epoch(2025, 1, 15, 12, 0); // Wednesday
        let buckets = bucket_weeks(&[stint(monday, 3600)], None, now);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].daily_totals, vec![3600, 0, 0]);
    }

    #[test]
    fn total_matches_daily_totals_for_every_bucket() {
        let records = [
            stint(local_epoch(2025, 1, 8, 9, 0), 120),
            stint(local_epoch(2025, 1, 14, 9, 0), 340),
            stint(local_epoch(2025, 1, 14, 15, 0), 60),
            stint(local_epoch(2025, 1, 18, 22, 0), 999),
        ];
        let now = local_epoch(2025, 1, 19, 12, 0);
        for bucket in bucket_weeks(&records, None, now) {
            assert_eq!(bucket.total, bucket.daily_totals.iter().sum::<i64>());
            assert!(bucket.daily_totals.len() <= 7);
        }
    }

    #[test]
    fn multiple_stints_on_one_day_sum_into_one_slot() {
        let morning = local_epoch(2025, 1, 14, 9, 0);
        let evening = local_epoch(2025, 1, 14, 21, 0);
        let now = local_epoch(2025, 1, 19, 23, 0);
        let buckets = bucket_weeks(&[stint(morning, 100), stint(evening, 250)], None, now);

        assert_eq!(buckets[0].daily_totals, vec![350, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn explicit_window_selects_exactly_the_overlapping_weeks() {
        // Records across three weeks; the window covers only the middle one.
        let records = [
            stint(local_epoch(2025, 1, 8, 9, 0), 100),
            stint(local_epoch(2025, 1, 15, 9, 0), 200),
            stint(local_epoch(2025, 1, 22, 9, 0), 300),
        ];
        let now = local_epoch(2025, 1, 24, 12, 0);
        let window = (
            local_epoch(2025, 1, 14, 0, 0),
            local_epoch(2025, 1, 16, 0, 0),
        );
        let buckets = bucket_weeks(&records, Some(window), now);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].start, local_epoch(2025, 1, 13, 0, 0));
        assert_eq!(buckets[0].total, 200);
    }

    #[test]
    fn explicit_window_sums_whole_edge_weeks() {
        // The window starts Wednesday, but Tuesday's record is in the same
        // calendar week and therefore still counted.
        let records = [
            stint(local_epoch(2025, 1, 14, 9, 0), 500),
            stint(local_epoch(2025, 1, 16, 9, 0), 700),
        ];
        let now = local_epoch(2025, 1, 24, 12, 0);
        let window = (
            local_epoch(2025, 1, 15, 0, 0),
            local_epoch(2025, 1, 17, 0, 0),
        );
        let buckets = bucket_weeks(&records, Some(window), now);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, 1200);
    }

    #[test]
    fn past_window_is_not_cut_at_a_weekday() {
        // A window entirely in the past keeps all seven day slots of its
        // last week.
        let records = [stint(local_epoch(2025, 1, 8, 9, 0), 100)];
        let now = local_epoch(2025, 3, 1, 12, 0);
        let window = (
            local_epoch(2025, 1, 6, 0, 0),
            local_epoch(2025, 1, 12, 12, 0),
        );
        let buckets = bucket_weeks(&records, Some(window), now);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].daily_totals.len(), 5); // front-trimmed to Wed..Sun
        assert!(buckets[0].is_first);
        assert!(buckets[0].is_last);
    }
}
