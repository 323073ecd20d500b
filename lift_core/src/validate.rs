//! Structural validation of workout programs.
//!
//! A program must pass [`validate_program`] before it can become the active
//! session. Checks run in a fixed order and stop at the first violation.

use crate::{Exercise, GroupTag, SupersetSlot, ValidationError, WorkoutProgram};

/// Shortest rest allowed after a standalone exercise
pub const MIN_STANDALONE_REST: u32 = 30;

/// Longest rest allowed after a standalone exercise
pub const MAX_STANDALONE_REST: u32 = 180;

/// Validate a workout program's structure.
///
/// Order of checks:
/// 1. program name, description and at least one exercise
/// 2. required exercise properties and positive sets
/// 3. rest bounds (standalone 30-180s, superset members any non-negative value)
/// 4. superset pairing: one partner with the opposite suffix and equal sets
pub fn validate_program(program: &WorkoutProgram) -> Result<(), ValidationError> {
    if program.name.trim().is_empty() {
        return Err(ValidationError::MissingProgramProperty("name"));
    }
    if program.description.trim().is_empty() {
        return Err(ValidationError::MissingProgramProperty("description"));
    }
    if program.exercises.is_empty() {
        return Err(ValidationError::NoExercises);
    }

    for (index, exercise) in program.exercises.iter().enumerate() {
        check_required_properties(index + 1, exercise)?;
    }

    for (index, exercise) in program.exercises.iter().enumerate() {
        check_rest_bounds(index + 1, exercise)?;
    }

    for (index, exercise) in program.exercises.iter().enumerate() {
        check_superset_pair(&program.exercises, index, exercise)?;
    }

    Ok(())
}

fn check_required_properties(position: usize, exercise: &Exercise) -> Result<(), ValidationError> {
    let missing = if exercise.name.trim().is_empty() {
        Some("name")
    } else if exercise.is_absent("sets") {
        Some("sets")
    } else if exercise.reps.is_missing() {
        Some("reps")
    } else if exercise.is_absent("rest") {
        Some("rest")
    } else if exercise.group.trim().is_empty() {
        Some("group")
    } else {
        None
    };

    if let Some(property) = missing {
        return Err(ValidationError::MissingExerciseProperty { position, property });
    }

    if exercise.sets == 0 {
        return Err(ValidationError::InvalidSets {
            position,
            name: exercise.name.clone(),
        });
    }

    Ok(())
}

fn check_rest_bounds(position: usize, exercise: &Exercise) -> Result<(), ValidationError> {
    // Superset members only need a non-negative rest, which u32 already enforces.
    if exercise.tag().is_superset() {
        return Ok(());
    }

    let rest = exercise.rest_seconds;
    if !(MIN_STANDALONE_REST..=MAX_STANDALONE_REST).contains(&rest) {
        return Err(ValidationError::RestOutOfRange {
            position,
            name: exercise.name.clone(),
            rest,
            min: MIN_STANDALONE_REST,
            max: MAX_STANDALONE_REST,
        });
    }

    Ok(())
}

fn check_superset_pair(
    exercises: &[Exercise],
    index: usize,
    exercise: &Exercise,
) -> Result<(), ValidationError> {
    let tag = exercise.tag();
    if let GroupTag::Unslotted(group) = tag {
        return Err(ValidationError::UnslottedSuperset {
            name: exercise.name.clone(),
            group: group.to_string(),
        });
    }
    let (Some(slot), Some(expected)) = (tag.slot(), tag.partner_group()) else {
        return Ok(());
    };

    if let Some(twin) = exercises
        .iter()
        .enumerate()
        .find(|(i, other)| *i != index && other.group == exercise.group)
        .map(|(_, other)| other)
    {
        return Err(ValidationError::DuplicateSupersetMember {
            group: exercise.group.clone(),
            first: exercise.name.clone(),
            second: twin.name.clone(),
        });
    }

    let partners: Vec<&Exercise> = exercises.iter().filter(|e| e.group == expected).collect();
    let partner = match partners.as_slice() {
        [] => {
            return Err(ValidationError::UnpairedSuperset {
                name: exercise.name.clone(),
                group: exercise.group.clone(),
                expected,
            })
        }
        [partner] => *partner,
        [first, second, ..] => {
            return Err(ValidationError::DuplicateSupersetMember {
                group: expected,
                first: first.name.clone(),
                second: second.name.clone(),
            })
        }
    };

    if partner.sets != exercise.sets {
        let (first, second) = match slot {
            SupersetSlot::First => (exercise, partner),
            SupersetSlot::Second => (partner, exercise),
        };
        return Err(ValidationError::MismatchedSupersetSets {
            first_name: first.name.clone(),
            first_group: first.group.clone(),
            first_sets: first.sets,
            second_name: second.name.clone(),
            second_group: second.group.clone(),
            second_sets: second.sets,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RepRange;

    fn exercise(name: &str, group: &str, sets: u32, rest: u32) -> Exercise {
        Exercise::new(name, sets, RepRange::Text("8-10".into()), rest, group)
    }

    fn program(exercises: Vec<Exercise>) -> WorkoutProgram {
        WorkoutProgram {
            key: "test".into(),
            name: "Test Workout".into(),
            description: "Validation fixture".into(),
            exercises,
        }
    }

    #[test]
    fn test_valid_program_passes() {
        let p = program(vec![
            exercise("Squat", "A", 3, 120),
            exercise("Curl", "B1", 3, 0),
            exercise("Extension", "B2", 3, 60),
        ]);
        assert_eq!(validate_program(&p), Ok(()));
    }

    #[test]
    fn test_missing_program_properties() {
        let mut p = program(vec![exercise("Squat", "A", 3, 120)]);
        p.description.clear();
        assert_eq!(
            validate_program(&p),
            Err(ValidationError::MissingProgramProperty("description"))
        );

        let p = program(vec![]);
        assert_eq!(validate_program(&p), Err(ValidationError::NoExercises));
    }

    #[test]
    fn test_missing_exercise_property_named() {
        let mut squat = exercise("Squat", "A", 3, 120);
        squat.reps = RepRange::Text(String::new());
        let err = validate_program(&program(vec![squat])).unwrap_err();
        assert_eq!(err.to_string(), "Exercise 1 missing required property: reps");
    }

    #[test]
    fn test_zero_sets_rejected() {
        let p = program(vec![
            exercise("Squat", "A", 3, 120),
            exercise("Lunge", "B", 0, 90),
        ]);
        assert_eq!(
            validate_program(&p),
            Err(ValidationError::InvalidSets {
                position: 2,
                name: "Lunge".into()
            })
        );
    }

    #[test]
    fn test_standalone_rest_below_floor_rejected() {
        let p = program(vec![exercise("Plank", "A", 3, 20)]);
        let err = validate_program(&p).unwrap_err();
        assert!(matches!(err, ValidationError::RestOutOfRange { rest: 20, .. }));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_standalone_rest_above_ceiling_rejected() {
        let p = program(vec![exercise("Deadlift", "A", 3, 240)]);
        assert!(matches!(
            validate_program(&p),
            Err(ValidationError::RestOutOfRange { rest: 240, .. })
        ));
    }

    #[test]
    fn test_superset_member_may_have_zero_rest() {
        let p = program(vec![
            exercise("Lateral Raise", "E1", 3, 0),
            exercise("Face Pull", "E2", 3, 60),
        ]);
        assert_eq!(validate_program(&p), Ok(()));
    }

    #[test]
    fn test_mismatched_superset_sets_names_both_exercises() {
        let p = program(vec![
            exercise("Curl", "H1", 4, 0),
            exercise("Extension", "H2", 3, 60),
        ]);
        let err = validate_program(&p).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Curl"));
        assert!(message.contains("Extension"));
        assert!(message.contains("H1"));
        assert!(message.contains("H2"));
        assert!(message.contains("Found 4 and 3"));
    }

    #[test]
    fn test_mismatch_reported_in_pair_order_from_second_member() {
        let p = program(vec![
            exercise("Extension", "H2", 3, 60),
            exercise("Curl", "H1", 4, 0),
        ]);
        assert_eq!(
            validate_program(&p),
            Err(ValidationError::MismatchedSupersetSets {
                first_name: "Curl".into(),
                first_group: "H1".into(),
                first_sets: 4,
                second_name: "Extension".into(),
                second_group: "H2".into(),
                second_sets: 3,
            })
        );
    }

    #[test]
    fn test_unpaired_superset_rejected() {
        let p = program(vec![
            exercise("Squat", "A", 3, 120),
            exercise("Curl", "B1", 3, 0),
        ]);
        assert_eq!(
            validate_program(&p),
            Err(ValidationError::UnpairedSuperset {
                name: "Curl".into(),
                group: "B1".into(),
                expected: "B2".into(),
            })
        );
    }

    #[test]
    fn test_prefix_sharing_group_is_not_a_partner() {
        // "B12" is its own superset member with base "B1", not B1's partner.
        let p = program(vec![
            exercise("Curl", "B1", 3, 0),
            exercise("Extension", "B12", 3, 60),
        ]);
        assert!(matches!(
            validate_program(&p),
            Err(ValidationError::UnpairedSuperset { .. })
        ));
    }

    #[test]
    fn test_inner_digit_group_without_partner_rejected() {
        let p = program(vec![
            exercise("Curl", "A1B", 3, 60),
            exercise("Squat", "C", 3, 90),
        ]);
        let err = validate_program(&p).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnslottedSuperset {
                name: "Curl".into(),
                group: "A1B".into(),
            }
        );
        assert!(err.to_string().contains("A1B"));
    }

    #[test]
    fn test_duplicate_superset_member_rejected() {
        let p = program(vec![
            exercise("Curl", "B1", 3, 0),
            exercise("Hammer Curl", "B1", 3, 0),
            exercise("Extension", "B2", 3, 60),
        ]);
        assert!(matches!(
            validate_program(&p),
            Err(ValidationError::DuplicateSupersetMember { .. })
        ));
    }
}
