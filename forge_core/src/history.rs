//! Progress history across the live WAL and the archived CSV.

use crate::{Error, ProgressEntry, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::path::Path;

/// Earliest `logged_at` still inside a window of `days`
fn window_start(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    if days < 0 {
        return Err(Error::Other(format!(
            "history window must not be negative (got {} days)",
            days
        )));
    }
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| Error::Other(format!("history window of {} days is out of range", days)))
}

/// Entries from the last `days` days, oldest first
///
/// The WAL and the archive are merged; an id present in both is
/// returned once. Damaged lines or rows are skipped and logged.
pub fn load_recent_entries(
    wal_path: &Path,
    csv_path: &Path,
    days: i64,
) -> Result<Vec<ProgressEntry>> {
    let cutoff = window_start(Utc::now(), days)?;

    let live = crate::wal::scan(wal_path)?;
    let (archived, archive_skipped) = crate::csv_rollup::read_archive(csv_path)?;
    if live.skipped + archive_skipped > 0 {
        tracing::warn!(
            "Ignored {} damaged WAL lines and {} damaged archive rows",
            live.skipped,
            archive_skipped
        );
    }

    let mut seen_ids = HashSet::new();
    let mut entries: Vec<ProgressEntry> = live
        .entries
        .into_iter()
        .chain(archived)
        .filter(|e| e.logged_at >= cutoff && seen_ids.insert(e.id))
        .collect();
    entries.sort_by_key(|e| e.logged_at);

    tracing::info!(
        "Loaded {} progress entries from last {} days",
        entries.len(),
        days
    );

    Ok(entries)
}

/// Most recent entry in an oldest-first list
pub fn latest_entry(entries: &[ProgressEntry]) -> Option<&ProgressEntry> {
    entries.last()
}

/// Weight change from the first to the last entry; needs two entries
pub fn weight_change(entries: &[ProgressEntry]) -> Option<f64> {
    match entries {
        [first, .., last] => Some(last.weight_kg - first.weight_kg),
        _ => None,
    }
}
