//! Append-only activity journal.
//!
//! Completed sets and finished workouts are appended to a JSONL (JSON Lines)
//! file with file locking so concurrent writers cannot interleave lines.

use crate::{Result, SetRecord, WorkoutRecord};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Receiver of session activity.
///
/// Sessions call it fire-and-forget: an error is logged by the caller and
/// never changes navigation.
pub trait ActivitySink {
    fn record_set(&mut self, record: &SetRecord) -> Result<()>;
    fn record_workout(&mut self, record: &WorkoutRecord) -> Result<()>;
}

/// One line of the journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    SetCompleted(SetRecord),
    WorkoutCompleted(WorkoutRecord),
}

/// Sink that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ActivitySink for NullSink {
    fn record_set(&mut self, _record: &SetRecord) -> Result<()> {
        Ok(())
    }

    fn record_workout(&mut self, _record: &WorkoutRecord) -> Result<()> {
        Ok(())
    }
}

/// JSONL-based journal with file locking
#[derive(Clone, Debug)]
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &JournalEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;
        Ok(())
    }
}

impl ActivitySink for JsonlJournal {
    fn record_set(&mut self, record: &SetRecord) -> Result<()> {
        self.append(&JournalEntry::SetCompleted(record.clone()))?;
        tracing::debug!(
            "Journaled set {} of {}",
            record.set_number,
            record.exercise_name
        );
        Ok(())
    }

    fn record_workout(&mut self, record: &WorkoutRecord) -> Result<()> {
        self.append(&JournalEntry::WorkoutCompleted(record.clone()))?;
        tracing::debug!("Journaled workout {} ({})", record.id, record.program_name);
        Ok(())
    }
}

/// Read every entry from a journal file.
///
/// A missing file reads as empty; malformed lines are skipped with a warning.
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<JournalEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping journal line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} journal entries from {:?}", entries.len(), path);
    Ok(entries)
}
