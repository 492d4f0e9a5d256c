//! Treat bank display and redemption.

use std::io::Write;

use anyhow::Result;

use stint_core::{TreatBankEntry, duration, treat};
use stint_store::Store;

use crate::prompt;

use super::util::now_epoch;

/// One line of the bank listing, with time left until expiry.
pub fn entry_label(entry: &TreatBankEntry, now: i64) -> String {
    match entry.expires_at {
        Some(expires_at) => format!(
            "{} (expires in {})",
            entry.description,
            duration::format(expires_at - now)
        ),
        None => entry.description.clone(),
    }
}

/// Runs the treats command: purge expired entries, list the bank and
/// optionally redeem one.
pub fn run<W: Write>(writer: &mut W, store: &Store, redeem: bool) -> Result<()> {
    let now = now_epoch();
    let mut bank = store.load_bank()?;

    let expired = treat::purge_expired(&mut bank, now);
    for entry in &expired {
        writeln!(writer, "Expired unredeemed: {}", entry.description)?;
    }
    if !expired.is_empty() {
        store.save_bank(&bank)?;
        tracing::debug!(count = expired.len(), "expired treats purged");
    }

    if bank.is_empty() {
        writeln!(writer, "No treats in the bank.")?;
        return Ok(());
    }

    treat::sort_by_expiry(&mut bank);
    writeln!(writer, "Treat bank:")?;
    for (i, entry) in bank.iter().enumerate() {
        writeln!(writer, "  {}) {}", i + 1, entry_label(entry, now))?;
    }

    if redeem {
        let labels: Vec<String> = bank.iter().map(|entry| entry_label(entry, now)).collect();
        let choices: Vec<&str> = labels.iter().map(String::as_str).collect();
        let index = prompt::select("Redeem which treat?", &choices)?;
        let picked = bank.remove(index);
        store.save_bank(&bank)?;
        writeln!(writer, "Redeemed: {}", picked.description)?;
    }

    Ok(())
}
