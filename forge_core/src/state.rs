//! User record persistence with file locking.
//!
//! Reads take a shared lock on the record file. Writes go through a temp
//! file that is renamed into place. Read-modify-write cycles additionally
//! hold an exclusive lock on a `<file>.lock` sidecar for their whole
//! duration, so concurrent toggles for the same user are applied one at a
//! time and none is lost.

use crate::progression::ToggleOutcome;
use crate::{Error, Result, TaskCategory, UserRecord};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use rand::Rng;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Sidecar lock path for a record file
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("state"));
    name.push(".lock");
    path.with_file_name(name)
}

/// Exclusive per-user lock, released on drop
struct UpdateLock {
    file: File,
}

impl UpdateLock {
    fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path(path))?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for UpdateLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl UserRecord {
    /// Load a user record with shared locking
    ///
    /// A missing or corrupted file yields a fresh record; corruption is
    /// logged as a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, starting a new user record");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open state file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<UserRecord>(&contents) {
            Ok(mut record) => {
                record.progression.refresh_derived();
                tracing::debug!("Loaded user record {} from {:?}", record.id, path);
                Ok(record)
            }
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the record atomically via temp file and rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("state path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved user record {} to {:?}", self.id, path);
        Ok(())
    }

    /// Load, modify and save under the per-user lock
    ///
    /// Nothing is written when `f` fails.
    pub fn update<F, T>(path: &Path, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut UserRecord) -> Result<T>,
    {
        let _lock = UpdateLock::acquire(path)?;
        let mut record = Self::load(path)?;
        let value = f(&mut record)?;
        record.save(path)?;
        Ok((record, value))
    }

    /// Current record with the daily rotation applied
    ///
    /// The record is only rewritten when the rotation drew new tasks or the
    /// file did not exist yet.
    pub fn fetch_current<R: Rng + ?Sized>(
        path: &Path,
        now: DateTime<Utc>,
        rng: &mut R,
        pool: &[String],
    ) -> Result<Self> {
        let _lock = UpdateLock::acquire(path)?;
        let existed = path.exists();
        let mut record = Self::load(path)?;

        let rotated = record.progression.ensure_fresh_tasks(pool, now, rng)?;
        if rotated || !existed {
            record.save(path)?;
        }

        Ok(record)
    }

    /// Toggle one task and persist the new aggregate
    pub fn toggle(
        path: &Path,
        category: TaskCategory,
        index: usize,
        daily_points: u32,
    ) -> Result<ToggleOutcome> {
        let (_, outcome) = Self::update(path, |record| {
            record
                .progression
                .toggle_task(category, index, daily_points)
        })?;
        Ok(outcome)
    }
}
