//! Built-in workout catalog and program lookup.
//!
//! The default catalog holds the home-gym programs (push/pull/legs twice over
//! plus a full-body catch-up day). Superset pairs put their inter-set rest on
//! the `2` member; the `1` member rests 0s.

use crate::validate::validate_program;
use crate::{Catalog, Error, Exercise, RepRange, Result, WorkoutProgram};
use once_cell::sync::Lazy;
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn program(key: &str, name: &str, description: &str, exercises: Vec<Exercise>) -> WorkoutProgram {
    WorkoutProgram {
        key: key.into(),
        name: name.into(),
        description: description.into(),
        exercises,
    }
}

fn exercise(name: &str, sets: u32, reps: &str, rest_seconds: u32, group: &str) -> Exercise {
    Exercise::new(name, sets, RepRange::Text(reps.into()), rest_seconds, group)
}

impl Exercise {
    fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn with_equipment(mut self, equipment: &str) -> Self {
        self.equipment = Some(equipment.into());
        self
    }
}

fn build_default_catalog_internal() -> Catalog {
    let programs = vec![
        program(
            "workoutA",
            "Workout A",
            "Push (Chest/Shoulders/Triceps) - Heavy Focus",
            vec![
                exercise("DB Bench Press", 4, "6-8", 150, "A")
                    .with_notes("Greater ROM than barbell, superior pec stretch. Control the descent.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("DB Overhead Press (Seated)", 3, "8-10", 120, "B")
                    .with_notes("Neutral or pronated grip. Full lockout overhead.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Incline DB Press", 3, "8-10", 120, "C")
                    .with_notes("30-45° incline. Targets upper chest. Lengthened position emphasis.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Ring Dips", 3, "8-12", 90, "D")
                    .with_notes("Lean forward for chest emphasis. Rings turned out at top. Superior to machine dips.")
                    .with_equipment("Rings"),
                exercise("DB Lateral Raises", 3, "12-15", 0, "E1")
                    .with_notes("Slight forward lean. Raise to shoulder height. Control eccentric.")
                    .with_equipment("Dumbbells"),
                exercise("Band Face Pulls", 3, "15-20", 60, "E2")
                    .with_notes("External rotation at end. Critical for shoulder health. Superset with laterals.")
                    .with_equipment("Bands"),
                exercise("DB Overhead Triceps Extension", 3, "10-12", 90, "F")
                    .with_notes("Long head emphasis due to shoulder flexion. Deep stretch at bottom.")
                    .with_equipment("Dumbbells"),
                exercise("Ring Push-ups (Diamond)", 2, "12-15", 60, "G")
                    .with_notes("Triceps finisher. Rings increase instability and muscle activation.")
                    .with_equipment("Rings"),
            ],
        ),
        program(
            "workoutB",
            "Workout B",
            "Pull (Back/Biceps/Rear Delts) - Volume Focus",
            vec![
                exercise("Pull-ups (Various Grips)", 4, "6-10", 150, "A")
                    .with_notes("Rotate grips: wide, neutral, chin-up. Superior to lat pulldown per EMG studies.")
                    .with_equipment("Pull-up Attachment"),
                exercise("DB Row (Chest Supported)", 3, "8-10", 120, "B")
                    .with_notes("Incline bench support removes momentum. Full stretch at bottom.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Ring Rows", 3, "10-12", 90, "C")
                    .with_notes("Adjust difficulty by foot position. Squeeze scapula at top.")
                    .with_equipment("Rings"),
                exercise("Ring Face Pulls", 3, "15-20", 0, "D1")
                    .with_notes("External rotation at end. Rear delt and rotator cuff emphasis.")
                    .with_equipment("Rings"),
                exercise("DB Rear Delt Fly (Incline)", 3, "12-15", 60, "D2")
                    .with_notes("Chest on incline bench. Eliminates momentum. Superset with face pulls.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("DB Curl (Standing)", 3, "8-10", 90, "E")
                    .with_notes("Supinate at top. No swinging. Control the negative.")
                    .with_equipment("Dumbbells"),
                exercise("DB Hammer Curl", 3, "10-12", 60, "F")
                    .with_notes("Brachialis and brachioradialis emphasis. Neutral grip throughout.")
                    .with_equipment("Dumbbells"),
                exercise("Grip Work - Hand Gripper", 3, "10-15", 60, "G")
                    .with_notes("Crush grip strength. Hold at close for 2-3 seconds.")
                    .with_equipment("Hand Gripper"),
            ],
        ),
        program(
            "workoutC",
            "Workout C",
            "Legs (Quads/Hamstrings/Glutes) - Compound Focus",
            vec![
                exercise("DB Goblet Squat", 4, "8-10", 150, "A")
                    .with_notes("Heels elevated if needed. Deep ROM. Quad dominant.")
                    .with_equipment("Dumbbells"),
                exercise("DB Romanian Deadlift", 4, "8-10", 120, "B")
                    .with_notes("Hinge at hips. Feel hamstring stretch. Critical for posterior chain.")
                    .with_equipment("Dumbbells"),
                exercise("Bulgarian Split Squat", 3, "10-12 each", 90, "C")
                    .with_notes("Rear foot on bench. Excellent unilateral quad/glute builder.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Leg Extension (Attachment)", 3, "12-15", 0, "D1")
                    .with_notes("Rectus femoris isolation. Pause at top contraction.")
                    .with_equipment("Bench Leg Attachment"),
                exercise("Leg Curl (Attachment)", 3, "12-15", 60, "D2")
                    .with_notes("Hamstring isolation. Superset with extensions. Control eccentric.")
                    .with_equipment("Bench Leg Attachment"),
                exercise("DB Calf Raise (Single Leg)", 4, "15-20", 60, "E")
                    .with_notes("Full stretch at bottom, full contraction at top. One leg at a time.")
                    .with_equipment("Dumbbells"),
                exercise("Plank", 3, "45-60s", 60, "F")
                    .with_notes("Core stability. Posterior pelvic tilt. Squeeze glutes.")
                    .with_equipment("Bodyweight"),
            ],
        ),
        program(
            "workoutD",
            "Workout D",
            "Push Variation (Chest/Shoulders/Triceps) - Hypertrophy Focus",
            vec![
                exercise("Incline DB Fly", 4, "10-12", 90, "A")
                    .with_notes("Deep stretch at bottom - lengthened partials for hypertrophy. Schoenfeld 2023 research.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Ring Push-ups", 4, "10-15", 90, "B")
                    .with_notes("Turn rings out at top. Instability increases pec and core activation.")
                    .with_equipment("Rings"),
                exercise("DB Arnold Press", 3, "10-12", 90, "C")
                    .with_notes("Rotation through movement. Hits all delt heads.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Band Lateral Raises", 3, "15-20", 0, "D1")
                    .with_notes("Constant tension throughout ROM. Different resistance curve than DBs.")
                    .with_equipment("Bands"),
                exercise("DB Front Raise", 3, "12-15", 60, "D2")
                    .with_notes("Anterior delt. Alternate arms or together. Superset with laterals.")
                    .with_equipment("Dumbbells"),
                exercise("Ring Flyes", 3, "8-12", 90, "E")
                    .with_notes("Excellent stretch-mediated hypertrophy. Start with feet forward to reduce difficulty.")
                    .with_equipment("Rings"),
                exercise("DB Skull Crusher", 3, "10-12", 60, "F")
                    .with_notes("Lower to forehead/behind head. Long head emphasis.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Power Twister - Chest Squeeze", 2, "12-15", 60, "G")
                    .with_notes("Isometric/concentric chest work. Hold at peak contraction.")
                    .with_equipment("Power Twister"),
            ],
        ),
        program(
            "workoutE",
            "Workout E",
            "Pull Variation (Back/Biceps/Rear Delts) - Metabolic Focus",
            vec![
                exercise("Chin-ups (Close Grip)", 4, "6-10", 120, "A")
                    .with_notes("Supinated grip. More bicep involvement. Full dead hang at bottom.")
                    .with_equipment("Pull-up Attachment"),
                exercise("Single-Arm DB Row", 3, "10-12 each", 90, "B")
                    .with_notes("One hand on bench. Full lat stretch at bottom, squeeze at top.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Ring Face Pulls to External Rotation", 3, "15-20", 60, "C")
                    .with_notes("Pull to face, rotate hands back. Superior to cable face pulls.")
                    .with_equipment("Rings"),
                exercise("Band Pull-Aparts", 3, "15-20", 60, "D")
                    .with_notes("Rear delts and mid traps. Keep arms straight.")
                    .with_equipment("Bands"),
                exercise("DB Preacher Curl", 3, "10-12", 90, "E")
                    .with_notes("Eliminates cheating. Excellent for short head biceps. Full stretch at bottom.")
                    .with_equipment("Dumbbells + Preacher Attachment"),
                exercise("Incline DB Curl", 3, "10-12", 60, "F")
                    .with_notes("Long head emphasis - stretched position. Key for bicep peak.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("DB Reverse Curl", 2, "12-15", 60, "G")
                    .with_notes("Brachioradialis and forearm extensors. Overhand grip.")
                    .with_equipment("Dumbbells"),
                exercise("Lattice Pin Hangs", 2, "20-30s", 60, "H")
                    .with_notes("Finger and grip strength. Dead hang position.")
                    .with_equipment("Lattice Pin"),
            ],
        ),
        program(
            "workoutF",
            "Workout F",
            "Legs Variation (Posterior Chain/Glutes) - Unilateral Focus",
            vec![
                exercise("DB Single-Leg Romanian Deadlift", 4, "8-10 each", 90, "A")
                    .with_notes("Balance and hamstring stretch. Hold DB on opposite side.")
                    .with_equipment("Dumbbells"),
                exercise("Reverse Lunge", 3, "10-12 each", 90, "B")
                    .with_notes("Step back, not forward. More glute/hamstring emphasis than forward lunge.")
                    .with_equipment("Dumbbells"),
                exercise("DB Hip Thrust (Bench)", 3, "12-15", 90, "C")
                    .with_notes("Upper back on bench. Pause at top. Best exercise for glute activation.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Leg Curl (Attachment)", 4, "10-12", 60, "D")
                    .with_notes("Hamstring isolation. Slow eccentric (3-4 seconds).")
                    .with_equipment("Bench Leg Attachment"),
                exercise("DB Step-ups", 3, "12-15 each", 60, "E")
                    .with_notes("Bench height. Push through lead leg only, no push-off from back foot.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("DB Seated Calf Raise", 4, "15-20", 60, "F")
                    .with_notes("DB on knees. Targets soleus. Pause at stretch and contraction.")
                    .with_equipment("Dumbbells"),
                exercise("Hanging Leg Raise", 3, "10-15", 60, "G")
                    .with_notes("Core and hip flexors. Control the swing. Bent knee to make easier.")
                    .with_equipment("Pull-up Attachment"),
                exercise("Bullworker Isometric Squeeze", 2, "3x10s holds", 60, "H")
                    .with_notes("Full body tension. Choose compression or extension movement.")
                    .with_equipment("Bullworker"),
            ],
        ),
        program(
            "workoutCatchup",
            "Catch-up Workout",
            "Full Body - All Muscle Groups Stimulation",
            vec![
                exercise("DB Goblet Squat", 4, "8-10", 120, "A")
                    .with_notes("Compound quad/glute exercise. Deep ROM for maximum stimulus.")
                    .with_equipment("Dumbbells"),
                exercise("DB Bench Press", 4, "6-8", 120, "B")
                    .with_notes("Heavy chest/shoulder/tricep compound. Greater stretch than barbell.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("Pull-ups (Neutral Grip)", 4, "6-10", 120, "C")
                    .with_notes("Back/bicep compound. Neutral grip reduces shoulder stress.")
                    .with_equipment("Pull-up Attachment"),
                exercise("DB Overhead Press (Standing)", 3, "8-10", 90, "D")
                    .with_notes("Shoulder/tricep compound. Standing engages core.")
                    .with_equipment("Dumbbells"),
                exercise("DB Romanian Deadlift", 3, "8-10", 90, "E")
                    .with_notes("Posterior chain compound. Hamstring/glute/back emphasis.")
                    .with_equipment("Dumbbells"),
                exercise("Ring Dips", 3, "8-12", 90, "F")
                    .with_notes("Chest/tricep/shoulder compound. Rings add instability.")
                    .with_equipment("Rings"),
                exercise("Single-Arm DB Row", 3, "10-12 each", 90, "G")
                    .with_notes("Back/bicep compound. Unilateral for symmetry.")
                    .with_equipment("Dumbbells + Bench"),
                exercise("DB Hammer Curl", 3, "10-12", 0, "H1")
                    .with_notes("Bicep/brachialis compound. Neutral grip.")
                    .with_equipment("Dumbbells"),
                exercise("DB Overhead Triceps Extension", 3, "10-12", 60, "H2")
                    .with_notes("Tricep compound. Long head emphasis. Superset with curls.")
                    .with_equipment("Dumbbells"),
                exercise("DB Lateral Raises", 3, "12-15", 60, "I")
                    .with_notes("Shoulder isolation. Control eccentric.")
                    .with_equipment("Dumbbells"),
                exercise("Band Face Pulls", 3, "15-20", 60, "J")
                    .with_notes("Rear delt/rotator cuff. Critical for shoulder health.")
                    .with_equipment("Bands"),
                exercise("DB Calf Raise (Single Leg)", 4, "15-20", 60, "K")
                    .with_notes("Calf isolation. Unilateral for balance.")
                    .with_equipment("Dumbbells"),
                exercise("Plank", 3, "60s", 60, "L")
                    .with_notes("Core stability. Full body tension.")
                    .with_equipment("Bodyweight"),
            ],
        ),
    ];

    Catalog { programs }
}

impl Catalog {
    /// Load a catalog from a JSON file of the form `{"programs": [...]}`
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded {} workout programs from {:?}",
            catalog.programs.len(),
            path
        );
        Ok(catalog)
    }

    /// Look up a program by key
    pub fn get(&self, key: &str) -> Result<&WorkoutProgram> {
        self.programs
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| Error::ProgramNotFound(key.to_string()))
    }

    /// Look up a program and check it may become the active session
    pub fn select(&self, key: &str) -> Result<&WorkoutProgram> {
        let program = self.get(key)?;
        if let Err(e) = validate_program(program) {
            tracing::error!("Workout '{}' failed validation: {}", key, e);
            return Err(e.into());
        }
        Ok(program)
    }

    /// Program keys in catalog order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(|p| p.key.as_str())
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.programs.is_empty() {
            errors.push("Catalog has no workout programs".to_string());
        }

        for (index, program) in self.programs.iter().enumerate() {
            if program.key.is_empty() {
                errors.push(format!("Program {} has empty key", index + 1));
            }
            if self.programs[..index].iter().any(|p| p.key == program.key) {
                errors.push(format!("Duplicate program key '{}'", program.key));
            }
            if let Err(e) = validate_program(program) {
                errors.push(format!("Program '{}': {}", program.key, e));
            }
        }

        errors
    }
}
