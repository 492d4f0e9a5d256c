//! Core domain logic for the stint tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Duration codec: colon-separated duration strings
//! - Week bucketing: calendar-week grouping with partial-edge trimming
//! - Aggregation and sliding-window statistics over the log
//! - Treat rewards: one-shot rules, the earned-treat bank, lazy expiry
//!
//! Everything here is a pure function over caller-supplied data; loading
//! and saving live in `stint-store`, and the current instant is always an
//! explicit parameter.

pub mod duration;
pub mod record;
pub mod settings;
pub mod stats;
pub mod treat;
pub mod week;
pub mod window;

pub use duration::FormatError;
pub use record::StintRecord;
pub use settings::Settings;
pub use treat::{HighScoreInterval, Treat, TreatBankEntry, TreatRule, WindowUnit};
pub use week::{WeekBucket, bucket_weeks, week_start, weekday_index};
pub use window::{WindowStats, running_window_stats};
