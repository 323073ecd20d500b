//! Progression engine: where a session goes after a set is completed.
//!
//! Standalone exercises rest between their own sets and move straight on to
//! the next exercise once done. Superset pairs alternate set by set:
//! A1 set 1 → A2 set 1 → rest → A1 set 2 → A2 set 2 → ...
//! Rest is only inserted after both halves of a set are complete, and it is
//! taken from the `2` member of the pair.

use crate::{CompletionLedger, Error, Exercise, GroupTag, NavigationResult, Result, SupersetSlot};

/// Inputs for one [`advance`] call.
///
/// The ledger must already contain the set that was just completed.
#[derive(Clone, Copy, Debug)]
pub struct AdvanceContext<'a> {
    pub exercises: &'a [Exercise],
    pub current_exercise_index: usize,
    pub current_set: u32,
    pub ledger: &'a CompletionLedger,
    pub program_key: &'a str,
}

/// Find the other half of the superset `group` belongs to.
///
/// The partner's group must equal the base group plus the opposite suffix;
/// groups that merely share a prefix do not match. Returns `None` for
/// standalone groups or when no partner exists.
pub fn find_partner<'a>(
    exercises: &'a [Exercise],
    index: usize,
    group: &str,
) -> Option<(usize, &'a Exercise)> {
    let expected = GroupTag::parse(group).partner_group()?;
    exercises
        .iter()
        .enumerate()
        .find(|(i, exercise)| *i != index && exercise.group == expected)
}

/// Compute the next navigation state after the current set was completed.
///
/// Used for completions from both the active exercise and the rest screen.
pub fn advance(ctx: &AdvanceContext<'_>) -> Result<NavigationResult> {
    let index = ctx.current_exercise_index;
    let exercise = ctx.exercises.get(index).ok_or_else(|| {
        Error::State(format!(
            "Exercise index {} is outside program '{}' ({} exercises)",
            index,
            ctx.program_key,
            ctx.exercises.len()
        ))
    })?;

    if exercise.tag().is_superset() {
        match find_partner(ctx.exercises, index, &exercise.group) {
            Some((partner_index, partner)) => {
                return Ok(superset_step(ctx, exercise, partner_index, partner));
            }
            None => {
                tracing::warn!(
                    "Superset exercise '{}' ({}) has no partner, progressing it as standalone",
                    exercise.name,
                    exercise.group
                );
            }
        }
    }

    Ok(standalone_step(ctx, exercise))
}

fn superset_step(
    ctx: &AdvanceContext<'_>,
    exercise: &Exercise,
    partner_index: usize,
    partner: &Exercise,
) -> NavigationResult {
    let index = ctx.current_exercise_index;
    let set = ctx.current_set;

    if !ctx.ledger.is_done(ctx.program_key, partner_index, set) {
        tracing::debug!(
            "Superset {}: switching to '{}' for set {}",
            exercise.group,
            partner.name,
            set
        );
        return NavigationResult::go_to(partner_index, set);
    }

    if set < exercise.sets {
        let (first_index, second) = match exercise.tag().slot() {
            Some(SupersetSlot::Second) => (partner_index, exercise),
            _ => (index, partner),
        };
        tracing::debug!(
            "Superset {}: set {} done, resting {}s before set {}",
            exercise.group,
            set,
            second.rest_seconds,
            set + 1
        );
        return NavigationResult::rest(first_index, set + 1, second.rest_seconds);
    }

    let next_index = index.max(partner_index) + 1;
    match ctx.exercises.get(next_index) {
        Some(next) => {
            tracing::debug!(
                "Superset {} complete, resting {}s before '{}'",
                exercise.group,
                next.rest_seconds,
                next.name
            );
            NavigationResult::rest(next_index, 1, next.rest_seconds)
        }
        None => {
            tracing::info!("Final superset {} complete, workout finished", exercise.group);
            NavigationResult::finished(index, set)
        }
    }
}

fn standalone_step(ctx: &AdvanceContext<'_>, exercise: &Exercise) -> NavigationResult {
    let index = ctx.current_exercise_index;
    let set = ctx.current_set;

    if set < exercise.sets {
        tracing::debug!(
            "'{}' set {} done, resting {}s",
            exercise.name,
            set,
            exercise.rest_seconds
        );
        NavigationResult::rest(index, set + 1, exercise.rest_seconds)
    } else if index + 1 < ctx.exercises.len() {
        tracing::debug!("'{}' complete, moving to exercise {}", exercise.name, index + 1);
        NavigationResult::go_to(index + 1, 1)
    } else {
        tracing::info!("'{}' was the final exercise, workout finished", exercise.name);
        NavigationResult::finished(index, set)
    }
}
