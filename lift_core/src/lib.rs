#![forbid(unsafe_code)]

//! Core domain model and business logic for the Lift workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, programs, session state, navigation results)
//! - The built-in workout catalog and program validation
//! - The progression engine deciding the next exercise, set and rest
//! - Session control with a cancellable rest timer
//! - The activity journal and workout history

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod validate;
pub mod ledger;
pub mod progression;
pub mod timer;
pub mod journal;
pub mod history;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use validate::validate_program;
pub use ledger::CompletionLedger;
pub use progression::{advance, find_partner, AdvanceContext};
pub use timer::{format_time, RestCue, SilentCue, Tick};
pub use journal::{ActivitySink, JsonlJournal, NullSink};
pub use history::load_recent_workouts;
pub use session::{LiveSession, Progress, Session};
