//! Live half of the progress log: weight/points snapshots as JSON lines.
//!
//! Only validated entries are ever appended. Each entry is written as one
//! `write_all` of a complete line under an exclusive lock, so concurrent
//! writers cannot interleave. A torn tail from a crash is skipped on read.

use crate::profile::WEIGHT_RANGE_KG;
use crate::{Error, ProgressEntry, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

impl ProgressEntry {
    /// A checked measurement; both weight and points are mandatory
    pub fn new(weight_kg: f64, points: u32, logged_at: DateTime<Utc>) -> Result<Self> {
        let entry = Self {
            id: Uuid::new_v4(),
            logged_at,
            weight_kg,
            points,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> Result<()> {
        if !WEIGHT_RANGE_KG.contains(&self.weight_kg) {
            return Err(Error::InvalidEntry(format!(
                "weight {} kg outside {}-{} kg",
                self.weight_kg,
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            )));
        }
        Ok(())
    }
}

/// Destination for progress entries
pub trait ProgressSink {
    /// Persist a validated entry; invalid entries are rejected unwritten
    fn record(&mut self, entry: &ProgressEntry) -> Result<()>;
}

/// Locked JSONL sink
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate, record and return a new measurement
    pub fn log(
        &mut self,
        weight_kg: f64,
        points: u32,
        logged_at: DateTime<Utc>,
    ) -> Result<ProgressEntry> {
        let entry = ProgressEntry::new(weight_kg, points, logged_at)?;
        self.record(&entry)?;
        Ok(entry)
    }
}

impl ProgressSink for JsonlSink {
    fn record(&mut self, entry: &ProgressEntry) -> Result<()> {
        entry.validate()?;

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;
        let written = file.write_all(&line).and_then(|_| file.sync_data());
        file.unlock()?;
        written?;

        tracing::debug!(
            "Logged {:.1} kg / {} points as {}",
            entry.weight_kg,
            entry.points,
            entry.id
        );
        Ok(())
    }
}

/// Result of reading a WAL
#[derive(Debug, Default)]
pub struct WalScan {
    /// Valid entries in file order
    pub entries: Vec<ProgressEntry>,
    /// Lines that were unparseable or failed validation
    pub skipped: usize,
}

/// Read a WAL under a shared lock; a missing file is an empty log
pub fn scan(path: &Path) -> Result<WalScan> {
    let mut scan = WalScan::default();
    if !path.exists() {
        return Ok(scan);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    for (line_num, line) in BufReader::new(&file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed = serde_json::from_str::<ProgressEntry>(&line)
            .map_err(Error::from)
            .and_then(|entry| entry.validate().map(|_| entry));
        match parsed {
            Ok(entry) => scan.entries.push(entry),
            Err(e) => {
                scan.skipped += 1;
                tracing::warn!("Skipping WAL line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_scan() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("nested").join("progress.wal");

        let mut sink = JsonlSink::new(&wal_path);
        let first = sink.log(80.0, 10, Utc::now()).unwrap();
        let second = sink.log(79.5, 20, Utc::now()).unwrap();

        let scan = scan(&wal_path).unwrap();
        assert_eq!(scan.entries, vec![first, second]);
        assert_eq!(scan.skipped, 0);
    }

    #[test]
    fn test_out_of_range_weight_never_written() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("progress.wal");
        let mut sink = JsonlSink::new(&wal_path);

        for weight in [5.0, 450.0, f64::NAN] {
            assert!(matches!(
                sink.log(weight, 0, Utc::now()),
                Err(Error::InvalidEntry(_))
            ));
        }
        assert!(!wal_path.exists());

        // Hand-built entries are checked by the sink as well
        let forged = ProgressEntry {
            id: Uuid::new_v4(),
            logged_at: Utc::now(),
            weight_kg: -1.0,
            points: 3,
        };
        assert!(sink.record(&forged).is_err());
        assert!(!wal_path.exists());
    }

    #[test]
    fn test_damaged_lines_are_counted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("progress.wal");

        let mut sink = JsonlSink::new(&wal_path);
        sink.log(70.0, 0, Utc::now()).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&wal_path).unwrap();
            writeln!(file, "{{ not json").unwrap();
            writeln!(
                file,
                r#"{{"id":"{}","logged_at":"2024-01-01T00:00:00Z","weight_kg":999.0,"points":1}}"#,
                Uuid::new_v4()
            )
            .unwrap();
            writeln!(file).unwrap();
        }
        sink.log(71.0, 5, Utc::now()).unwrap();

        let scan = scan(&wal_path).unwrap();
        assert_eq!(scan.entries.len(), 2);
        assert_eq!(scan.skipped, 2);
    }

    #[test]
    fn test_missing_wal_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let scan = scan(&temp_dir.path().join("none.wal")).unwrap();
        assert!(scan.entries.is_empty());
        assert_eq!(scan.skipped, 0);
    }
}
