//! Interactive stint flow: select a task, wait out the validity
//! countdown, run the stopwatch, log the record, evaluate rewards.

use anyhow::{Context, Result};

use stint_core::duration::DAY;
use stint_core::week::day_start;
use stint_core::{Settings, StintRecord, bucket_weeks, duration, treat};
use stint_store::Store;

use crate::prompt;
use crate::sound;
use crate::timer::{self, Outcome};

use super::treats::entry_label;
use super::util::now_epoch;

pub fn run(store: &Store, task: Option<&str>, notes: Option<&str>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    runtime.block_on(run_stint(store, task, notes))
}

async fn run_stint(store: &Store, task: Option<&str>, notes: Option<&str>) -> Result<()> {
    let mut settings = store.load_settings()?;
    let min_stint = settings.min_stint_seconds()?;

    let (task, notes) = match task {
        Some(task) => (task.to_string(), notes.map(String::from)),
        None => pick_task(store, &mut settings, notes)?,
    };

    let start = now_epoch();
    tracing::debug!(task = %task, start, "stint started");

    if timer::countdown(min_stint, "Time until valid").await? == Outcome::Cancelled {
        println!("Stint canceled");
        return Ok(());
    }
    println!("Stint valid!");
    sound::play_chime();

    let end_at = settings
        .end_stint_at_seconds()?
        .map(|into_day| next_occurrence(start, into_day));
    let outcome = timer::stopwatch(start, "s", end_at).await?;

    let duration_secs = now_epoch() - start;
    match outcome {
        Outcome::Completed => {
            println!("Logging stint - final time: {}", duration::format(duration_secs));
        }
        Outcome::Cancelled => {
            // The stint already passed the validity threshold, so an
            // interrupt logs the elapsed time instead of discarding it.
            println!(
                "Stint interrupted - logging elapsed time: {}",
                duration::format(duration_secs)
            );
        }
    }

    let record = StintRecord {
        task,
        start,
        duration: duration_secs,
        notes,
        treat_picked: None,
    };
    let records = store.append_record(record)?;

    evaluate_rewards(store, &mut settings, &records)?;
    Ok(())
}

/// Interactive task selection from the catalog, with an escape hatch to
/// describe a new task and optionally add it to the catalog.
fn pick_task(
    store: &Store,
    settings: &mut Settings,
    notes: Option<&str>,
) -> Result<(String, Option<String>)> {
    let mut choices: Vec<&str> = settings.tasks.iter().map(String::as_str).collect();
    choices.push("other");
    let picked = prompt::select("Select stint:", &choices)?;

    if picked == settings.tasks.len() {
        let described = prompt::line("Describe the task: ")?;
        if prompt::confirm("Add task to the catalog?")? {
            settings.tasks.push(described.clone());
            store.save_settings(settings)?;
        }
        return Ok((described, notes.map(String::from)));
    }

    let task = settings.tasks[picked].clone();
    let extra = prompt::line("Additional details (optional): ")?;
    let notes = notes
        .map(String::from)
        .or_else(|| (!extra.is_empty()).then_some(extra));
    Ok((task, notes))
}

/// Evaluates every treat rule against the updated log, banks what was
/// earned, and offers an immediate redemption.
fn evaluate_rewards(
    store: &Store,
    settings: &mut Settings,
    records: &[StintRecord],
) -> Result<()> {
    let now = now_epoch();
    let buckets = bucket_weeks(records, None, now);

    let mut bank = store.load_bank()?;
    let expired = treat::purge_expired(&mut bank, now);
    for entry in &expired {
        println!("Treat expired unredeemed: {}", entry.description);
    }

    let earned = treat::evaluate(settings, records, &buckets, now)?;
    for entry in &earned {
        println!("Treat earned: {}", entry.description);
    }
    bank.extend(earned.clone());

    if !earned.is_empty() {
        store.save_settings_and_bank(settings, &bank)?;
    } else if !expired.is_empty() {
        store.save_bank(&bank)?;
    }

    treat::sort_by_expiry(&mut bank);
    if !bank.is_empty() && prompt::confirm("Redeem a treat now?")? {
        let labels: Vec<String> = bank.iter().map(|entry| entry_label(entry, now)).collect();
        let choices: Vec<&str> = labels.iter().map(String::as_str).collect();
        let index = prompt::select("Pick a treat:", &choices)?;
        let picked = bank.remove(index);
        store.save_bank(&bank)?;

        // Remember the pick on the stint that paid for it.
        let mut log = store.load_log()?;
        if let Some(last) = log.last_mut() {
            last.treat_picked = Some(picked.description.clone());
            store.save_log(&log)?;
        }
        println!("Enjoy: {}", picked.description);
    }
    Ok(())
}

/// Next instant after `from` at the given local time of day.
fn next_occurrence(from: i64, seconds_into_day: i64) -> i64 {
    let candidate = day_start(from) + seconds_into_day;
    if candidate > from {
        candidate
    } else {
        candidate + DAY
    }
}
