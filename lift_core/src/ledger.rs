//! Record of which sets have been completed in the current session.

use std::collections::HashSet;

/// Identifies one set of one exercise in one program
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SetKey {
    program_key: String,
    exercise_index: usize,
    set: u32,
}

/// Append-only set of completed `(program, exercise, set)` entries.
///
/// Owned by exactly one session and cleared only when that session restarts.
#[derive(Clone, Debug, Default)]
pub struct CompletionLedger {
    done: HashSet<SetKey>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_done(&mut self, program_key: &str, exercise_index: usize, set: u32) {
        let inserted = self.done.insert(SetKey {
            program_key: program_key.to_string(),
            exercise_index,
            set,
        });
        if !inserted {
            tracing::debug!(
                "Set {} of exercise {} in {} was already marked done",
                set,
                exercise_index,
                program_key
            );
        }
    }

    pub fn is_done(&self, program_key: &str, exercise_index: usize, set: u32) -> bool {
        self.done.contains(&SetKey {
            program_key: program_key.to_string(),
            exercise_index,
            set,
        })
    }

    /// Number of distinct completed sets
    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn clear(&mut self) {
        self.done.clear();
    }
}
