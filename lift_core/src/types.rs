//! Core domain types for the workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises, superset group labels and workout programs
//! - Navigation results produced by the progression engine
//! - The mutable session state they are applied to
//! - Records handed to the activity journal

use crate::timer::Tick;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Prescribed repetitions: either a label such as `"6-8"` / `"45-60s"` or a
/// fixed count.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RepRange {
    Count(u32),
    Text(String),
}

impl Default for RepRange {
    fn default() -> Self {
        RepRange::Text(String::new())
    }
}

impl RepRange {
    /// True when the prescription carries no information at all.
    pub fn is_missing(&self) -> bool {
        match self {
            RepRange::Count(_) => false,
            RepRange::Text(text) => text.trim().is_empty(),
        }
    }

    /// Rep count logged for a completed set.
    ///
    /// Ranges log their upper bound (`"10-12 each"` logs 12); other labels log
    /// their leading integer (`"60s"` logs 60). Returns `None` when the label
    /// has no leading digits.
    pub fn target_reps(&self) -> Option<u32> {
        match self {
            RepRange::Count(n) => Some(*n),
            RepRange::Text(text) => {
                let upper = text.split('-').nth(1).unwrap_or(text);
                leading_integer(upper)
            }
        }
    }
}

fn leading_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl fmt::Display for RepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepRange::Count(n) => write!(f, "{}", n),
            RepRange::Text(text) => f.write_str(text),
        }
    }
}

/// Position of an exercise inside a superset pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupersetSlot {
    /// Suffix `1`: the pair always restarts here
    First,
    /// Suffix `2`: owns the pair's inter-set rest
    Second,
}

impl SupersetSlot {
    pub fn suffix(self) -> char {
        match self {
            SupersetSlot::First => '1',
            SupersetSlot::Second => '2',
        }
    }

    pub fn other(self) -> Self {
        match self {
            SupersetSlot::First => SupersetSlot::Second,
            SupersetSlot::Second => SupersetSlot::First,
        }
    }
}

/// Parsed form of an exercise `group` label.
///
/// `"B"` is standalone; `"E1"` and `"E2"` are the two halves of superset `E`.
/// A label containing `1` or `2` anywhere marks superset membership, but only
/// a trailing digit says which half it is: `"A1B"` is a superset member that
/// can never be paired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupTag<'a> {
    Standalone(&'a str),
    Superset { base: &'a str, slot: SupersetSlot },
    Unslotted(&'a str),
}

impl<'a> GroupTag<'a> {
    pub fn parse(group: &'a str) -> Self {
        let slot = match group.chars().last() {
            Some('1') => SupersetSlot::First,
            Some('2') => SupersetSlot::Second,
            _ if group.contains(['1', '2']) => return GroupTag::Unslotted(group),
            _ => return GroupTag::Standalone(group),
        };
        GroupTag::Superset {
            base: &group[..group.len() - 1],
            slot,
        }
    }

    /// Group label without its superset suffix
    pub fn base(&self) -> &'a str {
        match *self {
            GroupTag::Standalone(base) | GroupTag::Unslotted(base) => base,
            GroupTag::Superset { base, .. } => base,
        }
    }

    pub fn slot(&self) -> Option<SupersetSlot> {
        match *self {
            GroupTag::Superset { slot, .. } => Some(slot),
            GroupTag::Standalone(_) | GroupTag::Unslotted(_) => None,
        }
    }

    pub fn is_superset(&self) -> bool {
        !matches!(self, GroupTag::Standalone(_))
    }

    /// Label the superset partner must carry, e.g. `"E2"` for `"E1"`
    pub fn partner_group(&self) -> Option<String> {
        match *self {
            GroupTag::Superset { base, slot } => Some(format!("{}{}", base, slot.other().suffix())),
            GroupTag::Standalone(_) | GroupTag::Unslotted(_) => None,
        }
    }
}

/// A single exercise prescription inside a workout program.
///
/// Deserialization never fails on a missing property: absent numbers read as
/// zero and are remembered so validation can name them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "ExerciseDef")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: RepRange,
    #[serde(rename = "rest")]
    pub rest_seconds: u32,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(skip)]
    absent: Vec<&'static str>,
}

impl Exercise {
    pub fn new(name: &str, sets: u32, reps: RepRange, rest_seconds: u32, group: &str) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            rest_seconds,
            group: group.into(),
            notes: None,
            equipment: None,
            absent: Vec::new(),
        }
    }

    pub fn tag(&self) -> GroupTag<'_> {
        GroupTag::parse(&self.group)
    }

    /// Whether a numeric property (`"sets"` or `"rest"`) was missing from the
    /// document this exercise was read from
    pub fn is_absent(&self, property: &str) -> bool {
        self.absent.contains(&property)
    }
}

/// Wire form of [`Exercise`] with every property optional
#[derive(Deserialize)]
struct ExerciseDef {
    #[serde(default)]
    name: String,
    sets: Option<u32>,
    #[serde(default)]
    reps: RepRange,
    rest: Option<u32>,
    #[serde(default)]
    group: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    equipment: Option<String>,
}

impl From<ExerciseDef> for Exercise {
    fn from(def: ExerciseDef) -> Self {
        let mut absent = Vec::new();
        if def.sets.is_none() {
            absent.push("sets");
        }
        if def.rest.is_none() {
            absent.push("rest");
        }
        Self {
            name: def.name,
            sets: def.sets.unwrap_or_default(),
            reps: def.reps,
            rest_seconds: def.rest.unwrap_or_default(),
            group: def.group,
            notes: def.notes,
            equipment: def.equipment,
            absent,
        }
    }
}

// ============================================================================
// Program and Catalog Types
// ============================================================================

/// An ordered workout program. Exercise order is the navigation order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutProgram {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl WorkoutProgram {
    /// Total number of sets prescribed across every exercise
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

/// The set of workout programs available for selection
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub programs: Vec<WorkoutProgram>,
}

// ============================================================================
// Navigation and Session Types
// ============================================================================

/// Outcome of the progression engine for one completion event.
///
/// Always replaces the navigation fields of [`SessionState`] as a unit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationResult {
    pub new_exercise_index: usize,
    pub new_set: u32,
    pub should_rest: bool,
    pub time_left: i32,
    pub is_timer_running: bool,
    /// Set only on the terminal result of a finished workout
    pub workout_complete: bool,
}

impl NavigationResult {
    /// Move to `index`/`set` after a timed rest of `rest_seconds`
    pub fn rest(index: usize, set: u32, rest_seconds: u32) -> Self {
        Self {
            new_exercise_index: index,
            new_set: set,
            should_rest: true,
            time_left: i32::try_from(rest_seconds).unwrap_or(i32::MAX),
            is_timer_running: true,
            workout_complete: false,
        }
    }

    /// Move to `index`/`set` immediately, timer stopped
    pub fn go_to(index: usize, set: u32) -> Self {
        Self {
            new_exercise_index: index,
            new_set: set,
            should_rest: false,
            time_left: 0,
            is_timer_running: false,
            workout_complete: false,
        }
    }

    /// Terminal result: position unchanged, nothing left to do
    pub fn finished(index: usize, set: u32) -> Self {
        Self {
            workout_complete: true,
            ..Self::go_to(index, set)
        }
    }
}

/// Mutable state of the active session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub current_exercise_index: usize,
    pub current_set: u32,
    pub is_resting: bool,
    /// Seconds of rest left; negative values are overtime
    pub time_left: i32,
    pub is_timer_running: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_exercise_index: 0,
            current_set: 1,
            is_resting: false,
            time_left: 0,
            is_timer_running: false,
        }
    }
}

impl SessionState {
    pub fn apply(&mut self, result: &NavigationResult) {
        self.current_exercise_index = result.new_exercise_index;
        self.current_set = result.new_set;
        self.is_resting = result.should_rest;
        self.time_left = result.time_left;
        self.is_timer_running = result.is_timer_running;
    }

    /// Advance the countdown by one second.
    ///
    /// There is no floor: a running timer keeps counting into overtime until
    /// it is stopped.
    pub fn tick(&mut self) -> Tick {
        if !self.is_timer_running {
            return Tick::Idle;
        }
        let previous = self.time_left;
        self.time_left = previous.saturating_sub(1);
        if previous == 1 {
            Tick::Elapsed
        } else {
            Tick::Counted(self.time_left)
        }
    }
}

// ============================================================================
// Activity Records
// ============================================================================

/// One completed set, as handed to the activity journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    pub program_name: String,
    pub exercise_name: String,
    pub set_number: u32,
    pub reps: Option<u32>,
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

/// Summary line for one exercise of a finished workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSummary {
    pub name: String,
    pub sets: u32,
    pub reps: RepRange,
}

/// A finished workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub program_key: String,
    pub program_name: String,
    pub description: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: i64,
    pub sets_completed: usize,
    pub total_sets: u32,
    pub exercises: Vec<ExerciseSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_tag_parsing() {
        assert_eq!(GroupTag::parse("B"), GroupTag::Standalone("B"));
        assert_eq!(
            GroupTag::parse("E1"),
            GroupTag::Superset {
                base: "E",
                slot: SupersetSlot::First
            }
        );
        assert_eq!(GroupTag::parse("E2").slot(), Some(SupersetSlot::Second));
        assert_eq!(GroupTag::parse("E2").base(), "E");
        assert_eq!(GroupTag::parse("E1").partner_group(), Some("E2".into()));
        assert_eq!(GroupTag::parse("B").partner_group(), None);
    }

    #[test]
    fn test_exercise_remembers_absent_numbers() {
        let exercise: Exercise =
            serde_json::from_str(r#"{"name": "Row", "reps": "10", "group": "A"}"#).unwrap();
        assert!(exercise.is_absent("sets"));
        assert!(exercise.is_absent("rest"));
        assert_eq!(exercise.rest_seconds, 0);

        let exercise: Exercise = serde_json::from_str(
            r#"{"name": "Row", "sets": 3, "reps": "10", "rest": 0, "group": "A1"}"#,
        )
        .unwrap();
        assert!(!exercise.is_absent("sets"));
        assert!(!exercise.is_absent("rest"));
        assert_eq!(exercise, Exercise::new("Row", 3, RepRange::Text("10".into()), 0, "A1"));
    }

    #[test]
    fn test_inner_digit_marks_unslotted_superset() {
        let tag = GroupTag::parse("A1B");
        assert_eq!(tag, GroupTag::Unslotted("A1B"));
        assert!(tag.is_superset());
        assert_eq!(tag.slot(), None);
        assert_eq!(tag.partner_group(), None);
        assert!(!GroupTag::parse("AB").is_superset());
    }

    #[test]
    fn test_target_reps() {
        assert_eq!(RepRange::Text("6-8".into()).target_reps(), Some(8));
        assert_eq!(RepRange::Text("10-12 each".into()).target_reps(), Some(12));
        assert_eq!(RepRange::Text("45-60s".into()).target_reps(), Some(60));
        assert_eq!(RepRange::Text("60s".into()).target_reps(), Some(60));
        assert_eq!(RepRange::Text("3x10s holds".into()).target_reps(), Some(3));
        assert_eq!(RepRange::Text("max".into()).target_reps(), None);
        assert_eq!(RepRange::Count(12).target_reps(), Some(12));
    }

    #[test]
    fn test_rep_range_deserializes_both_forms() {
        let text: RepRange = serde_json::from_str("\"8-10\"").unwrap();
        let count: RepRange = serde_json::from_str("5").unwrap();
        assert_eq!(text, RepRange::Text("8-10".into()));
        assert_eq!(count, RepRange::Count(5));
    }

    #[test]
    fn test_apply_replaces_navigation_fields() {
        let mut state = SessionState::default();
        state.apply(&NavigationResult::rest(2, 3, 90));

        assert_eq!(state.current_exercise_index, 2);
        assert_eq!(state.current_set, 3);
        assert!(state.is_resting);
        assert_eq!(state.time_left, 90);
        assert!(state.is_timer_running);

        state.apply(&NavigationResult::go_to(3, 1));
        assert!(!state.is_resting);
        assert_eq!(state.time_left, 0);
        assert!(!state.is_timer_running);
    }

    #[test]
    fn test_tick_counts_into_overtime() {
        let mut state = SessionState::default();
        state.apply(&NavigationResult::rest(0, 2, 5));

        let ticks: Vec<Tick> = (0..6).map(|_| state.tick()).collect();

        assert_eq!(state.time_left, -1);
        assert_eq!(ticks[3], Tick::Counted(1));
        assert_eq!(ticks[4], Tick::Elapsed);
        assert_eq!(ticks[5], Tick::Counted(-1));
    }

    #[test]
    fn test_tick_is_idle_when_stopped() {
        let mut state = SessionState::default();
        state.time_left = 30;
        assert_eq!(state.tick(), Tick::Idle);
        assert_eq!(state.time_left, 30);
    }
}
