//! Archived half of the progress log.
//!
//! Rollup moves WAL entries into `progress.csv` in `logged_at` order.
//! An id already in the archive is never appended twice, so re-running a
//! rollup after a crash between the CSV fsync and the WAL rename is safe.

use crate::{Error, ProgressEntry, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const PROCESSED_SUFFIX: &str = ".wal.processed";

/// On-disk CSV row
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ArchiveRow {
    id: Uuid,
    logged_at: String,
    weight_kg: f64,
    points: u32,
}

impl From<&ProgressEntry> for ArchiveRow {
    fn from(entry: &ProgressEntry) -> Self {
        Self {
            id: entry.id,
            logged_at: entry.logged_at.to_rfc3339(),
            weight_kg: entry.weight_kg,
            points: entry.points,
        }
    }
}

impl TryFrom<ArchiveRow> for ProgressEntry {
    type Error = Error;

    fn try_from(row: ArchiveRow) -> Result<Self> {
        let logged_at = DateTime::parse_from_rfc3339(&row.logged_at)
            .map_err(|e| Error::Other(format!("Invalid date '{}': {}", row.logged_at, e)))?
            .with_timezone(&Utc);
        let entry = ProgressEntry {
            id: row.id,
            logged_at,
            weight_kg: row.weight_kg,
            points: row.points,
        };
        entry.validate()?;
        Ok(entry)
    }
}

/// Archived entries plus the number of damaged rows passed over
pub fn read_archive(path: &Path) -> Result<(Vec<ProgressEntry>, usize)> {
    if !path.exists() {
        return Ok((Vec::new(), 0));
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut entries = Vec::new();
    let mut skipped = 0;

    for row in reader.deserialize::<ArchiveRow>() {
        match row.map_err(Error::from).and_then(ProgressEntry::try_from) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping archive row in {:?}: {}", path, e);
            }
        }
    }

    Ok((entries, skipped))
}

/// What a rollup did
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RollupReport {
    /// Entries newly appended to the CSV
    pub archived: usize,
    /// WAL entries whose id was already archived
    pub already_archived: usize,
    /// Where the WAL was moved, if it was
    pub processed_wal: Option<PathBuf>,
}

/// Move every WAL entry into the CSV archive, then retire the WAL
///
/// The CSV is fsynced before the WAL is renamed to `.wal.processed`.
/// A WAL with no valid entries is left in place.
pub fn archive_wal(wal_path: &Path, csv_path: &Path) -> Result<RollupReport> {
    let scan = crate::wal::scan(wal_path)?;
    if scan.entries.is_empty() {
        tracing::info!("No progress entries in WAL to roll up");
        return Ok(RollupReport::default());
    }

    let (archived, _) = read_archive(csv_path)?;
    let mut seen: HashSet<Uuid> = archived.iter().map(|e| e.id).collect();

    let total = scan.entries.len();
    let mut fresh: Vec<ProgressEntry> = scan
        .entries
        .into_iter()
        .filter(|e| seen.insert(e.id))
        .collect();
    fresh.sort_by_key(|e| e.logged_at);

    if !fresh.is_empty() {
        append_rows(csv_path, &fresh)?;
    }

    let processed = processed_path(wal_path);
    std::fs::rename(wal_path, &processed)?;

    let report = RollupReport {
        archived: fresh.len(),
        already_archived: total - fresh.len(),
        processed_wal: Some(processed),
    };
    tracing::info!(
        "Archived {} progress entries ({} already present)",
        report.archived,
        report.already_archived
    );
    Ok(report)
}

fn append_rows(csv_path: &Path, entries: &[ProgressEntry]) -> Result<()> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);
    for entry in entries {
        writer.serialize(ArchiveRow::from(entry))?;
    }
    writer.flush()?;

    let file = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    file.sync_all()?;
    Ok(())
}

fn processed_path(wal_path: &Path) -> PathBuf {
    wal_path.with_extension("wal.processed")
}

/// Delete retired WALs in `dir`; live WALs are untouched
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let retired = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(PROCESSED_SUFFIX));
        if retired {
            std::fs::remove_file(&path)?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Removed {} processed WAL files", count);
    }
    Ok(count)
}
