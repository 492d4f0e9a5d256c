//! Countdown and stopwatch loops for an active stint.
//!
//! Both loops redraw once per second and race a Ctrl-C signal inside a
//! single `tokio::select!` per iteration, so cancellation wins immediately
//! once raised.

use std::io::{self, Write};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use stint_core::duration;

use crate::commands::util::now_epoch;

/// How an interactive phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The phase ran to its natural end.
    Completed,
    /// The user interrupted it.
    Cancelled,
}

/// Counts down `seconds`, redrawing the remaining time once per second.
///
/// Returns [`Outcome::Cancelled`] as soon as Ctrl-C is received.
#[allow(clippy::cast_sign_loss)]
pub async fn countdown(seconds: i64, label: &str) -> io::Result<Outcome> {
    let end = tokio::time::Instant::now() + Duration::from_secs(seconds.max(0) as u64);
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let remaining = end
                    .saturating_duration_since(tokio::time::Instant::now())
                    .as_secs();
                if remaining == 0 {
                    redraw("")?;
                    return Ok(Outcome::Completed);
                }
                #[allow(clippy::cast_possible_wrap)]
                redraw(&format!("{label}: {}", duration::format(remaining as i64)))?;
            }
            _ = &mut ctrl_c => {
                println!();
                return Ok(Outcome::Cancelled);
            }
        }
    }
}

/// Stopwatch phase: redraws the elapsed time once per second and ends on
/// the stop code, Ctrl-C, or when `end_at` (epoch seconds) is reached.
pub async fn stopwatch(
    started: i64,
    stop_code: &str,
    end_at: Option<i64>,
) -> io::Result<Outcome> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("Enter {stop_code} to end the stint.");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = now_epoch();
                if end_at.is_some_and(|at| now >= at) {
                    println!();
                    return Ok(Outcome::Completed);
                }
                redraw(&format!("Elapsed time: {}", duration::format(now - started)))?;
            }
            line = lines.next_line() => {
                match line? {
                    Some(input) if input.trim().eq_ignore_ascii_case(stop_code) => {
                        println!();
                        return Ok(Outcome::Completed);
                    }
                    Some(_) => {}
                    // stdin closed: treat like the stop code
                    None => {
                        println!();
                        return Ok(Outcome::Completed);
                    }
                }
            }
            _ = &mut ctrl_c => {
                println!();
                return Ok(Outcome::Cancelled);
            }
        }
    }
}

/// Clears the current line and redraws `text` in place.
fn redraw(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\r\x1b[2K{text}")?;
    stdout.flush()
}
