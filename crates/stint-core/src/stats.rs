//! Aggregate statistics over the stint log.

use crate::record::StintRecord;
use crate::week::{WeekBucket, week_start, weekday_index};

/// Sum of all recorded durations, in seconds.
pub fn total_duration(records: &[StintRecord]) -> i64 {
    records.iter().map(|r| r.duration).sum()
}

/// Weekday a bucket entry maps to, 0 = Monday.
///
/// The earliest bucket loses leading days to trimming, so its entries are
/// right-aligned against the end of the week; every other bucket starts on
/// Monday. Keeping this arithmetic in one place is what makes weekday
/// identity survive the trimming.
pub fn entry_weekday(bucket: &WeekBucket, index: usize) -> usize {
    let offset = if bucket.is_first {
        7_usize.saturating_sub(bucket.daily_totals.len())
    } else {
        0
    };
    index + offset
}

/// Weekday a bucket entry maps to for display, 0 = Monday.
///
/// [`entry_weekday`] right-aligns every earliest bucket, which conflates
/// front trimming with the tail cut when the earliest week is also the
/// week containing `now`. Displays know `now`, so they can separate the
/// two and name each day correctly.
pub fn display_weekday(bucket: &WeekBucket, index: usize, now: i64) -> usize {
    let offset = if bucket.is_first {
        if bucket.is_last && week_start(now) == bucket.start {
            (weekday_index(now) + 1).saturating_sub(bucket.daily_totals.len())
        } else {
            7_usize.saturating_sub(bucket.daily_totals.len())
        }
    } else {
        0
    };
    index + offset
}

/// Per-weekday averages across buckets, index 0 = Monday.
///
/// Each slot averages over the buckets that actually supplied a value for
/// that weekday, and is zero when none did.
pub fn weekday_averages(buckets: &[WeekBucket]) -> [i64; 7] {
    let mut sums = [0_i64; 7];
    let mut counts = [0_i64; 7];

    for bucket in buckets {
        for (index, &seconds) in bucket.daily_totals.iter().enumerate() {
            let weekday = entry_weekday(bucket, index);
            if weekday < 7 {
                sums[weekday] += seconds;
                counts[weekday] += 1;
            }
        }
    }

    let mut averages = [0_i64; 7];
    for ((average, sum), count) in averages.iter_mut().zip(&sums).zip(&counts) {
        if *count > 0 {
            *average = sum / count;
        }
    }
    averages
}
