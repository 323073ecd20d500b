//! Workout history loaded from the activity journal.

use crate::journal::{read_entries, JournalEntry};
use crate::{Error, Result, WorkoutRecord};
use chrono::{Duration, Utc};
use std::path::Path;

/// Load workouts completed within the last `days` days.
///
/// Returns workouts sorted by completion time (newest first).
pub fn load_recent_workouts(journal_path: &Path, days: i64) -> Result<Vec<WorkoutRecord>> {
    let cutoff = Duration::try_days(days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| Error::Other(format!("History window of {} days is out of range", days)))?;

    let mut workouts: Vec<WorkoutRecord> = read_entries(journal_path)?
        .into_iter()
        .filter_map(|entry| match entry {
            JournalEntry::WorkoutCompleted(record) => Some(record),
            JournalEntry::SetCompleted(_) => None,
        })
        .filter(|record| record.completed_at >= cutoff)
        .collect();

    workouts.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    tracing::debug!(
        "Loaded {} workouts from the last {} days",
        workouts.len(),
        days
    );
    Ok(workouts)
}
