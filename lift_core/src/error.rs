//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A workout program failed structural validation
    #[error("Invalid workout: {0}")]
    Validation(#[from] ValidationError),

    /// No program is registered under the requested key
    #[error("Workout program not found: {0}")]
    ProgramNotFound(String),

    /// Session state management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Structural problems found in a workout program.
///
/// Messages name the offending property, rest value, or superset pair so the
/// caller can show them to the user as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Workout missing required property: {0}")]
    MissingProgramProperty(&'static str),

    #[error("Workout must have at least one exercise")]
    NoExercises,

    #[error("Exercise {position} missing required property: {property}")]
    MissingExerciseProperty {
        position: usize,
        property: &'static str,
    },

    #[error("Exercise {position} ({name}) must have positive integer sets")]
    InvalidSets { position: usize, name: String },

    #[error("Exercise {position} ({name}) rest time must be between {min}-{max} seconds, found {rest}")]
    RestOutOfRange {
        position: usize,
        name: String,
        rest: u32,
        min: u32,
        max: u32,
    },

    #[error("Superset exercise {name} ({group}) has no partner {expected}")]
    UnpairedSuperset {
        name: String,
        group: String,
        expected: String,
    },

    #[error("Superset exercise {name} ({group}) has no partner: superset groups must end in 1 or 2")]
    UnslottedSuperset { name: String, group: String },

    #[error("Superset group {group} is used by both {first} and {second}")]
    DuplicateSupersetMember {
        group: String,
        first: String,
        second: String,
    },

    #[error(
        "Superset pair {first_group} ({first_name}) and {second_group} ({second_name}) must have the same number of sets. Found {first_sets} and {second_sets} respectively."
    )]
    MismatchedSupersetSets {
        first_name: String,
        first_group: String,
        first_sets: u32,
        second_name: String,
        second_group: String,
        second_sets: u32,
    },
}
