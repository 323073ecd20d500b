//! Active workout session.
//!
//! [`Session`] owns the state and completion ledger of one selected program
//! and is the only place they are mutated. Every navigation is expressed as a
//! [`NavigationResult`] and applied as a unit. [`LiveSession`] adds the rest
//! timer: it shares the session with a ticker thread behind a mutex and keeps
//! the ticker in step with `is_timer_running`.
//!
//! Each applied transition bumps a timer epoch. A ticker only mutates the
//! session while its epoch is current, so a tick that races a transition (or
//! teardown) is discarded instead of counting down the new state.

use crate::journal::ActivitySink;
use crate::progression::{advance, AdvanceContext};
use crate::timer::{RestCue, RestTimer, Tick};
use crate::validate::validate_program;
use crate::{
    Catalog, CompletionLedger, Error, Exercise, ExerciseSummary, NavigationResult, Result,
    SessionState, SetRecord, WorkoutProgram, WorkoutRecord,
};
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

/// Completed versus prescribed sets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub completed_sets: usize,
    pub total_sets: u32,
}

/// Session over one validated workout program
pub struct Session {
    program: WorkoutProgram,
    state: SessionState,
    ledger: CompletionLedger,
    sink: Box<dyn ActivitySink + Send>,
    started_at: DateTime<Utc>,
    timer_epoch: u64,
    workout_recorded: bool,
    ended: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("program", &self.program.key)
            .field("state", &self.state)
            .field("completed_sets", &self.ledger.len())
            .field("timer_epoch", &self.timer_epoch)
            .field("ended", &self.ended)
            .finish()
    }
}

impl Session {
    /// Select `key` from the catalog and start a fresh session on it.
    ///
    /// Fails without side effects if the program is unknown or invalid.
    pub fn start(catalog: &Catalog, key: &str, sink: Box<dyn ActivitySink + Send>) -> Result<Self> {
        let program = catalog.select(key)?.clone();
        Self::with_program(program, sink)
    }

    /// Start a session on an explicit program, validating it first
    pub fn with_program(program: WorkoutProgram, sink: Box<dyn ActivitySink + Send>) -> Result<Self> {
        validate_program(&program)?;
        tracing::info!(
            "Starting '{}' ({} exercises, {} sets)",
            program.name,
            program.exercises.len(),
            program.total_sets()
        );
        Ok(Self {
            program,
            state: SessionState::default(),
            ledger: CompletionLedger::new(),
            sink,
            started_at: Utc::now(),
            timer_epoch: 0,
            workout_recorded: false,
            ended: false,
        })
    }

    pub fn program(&self) -> &WorkoutProgram {
        &self.program
    }

    pub fn program_key(&self) -> &str {
        &self.program.key
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.program.exercises.get(self.state.current_exercise_index)
    }

    pub fn is_set_completed(&self, exercise_index: usize, set: u32) -> bool {
        self.ledger.is_done(&self.program.key, exercise_index, set)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed_sets: self.ledger.len(),
            total_sets: self.program.total_sets(),
        }
    }

    /// Whether the final set of the program has been completed
    pub fn is_finished(&self) -> bool {
        self.workout_recorded
    }

    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    /// Complete the current set and move on.
    ///
    /// Serves both the active-exercise and the rest-screen triggers. The set
    /// is marked done before the engine runs so it can see it. Once the
    /// workout has finished, further completions are refused until
    /// [`Session::restart`].
    pub fn complete_set(&mut self) -> Result<NavigationResult> {
        self.ensure_active()?;
        if self.workout_recorded {
            return Err(Error::State("Workout already finished".into()));
        }
        let index = self.state.current_exercise_index;
        let set = self.state.current_set;

        self.ledger.mark_done(&self.program.key, index, set);
        self.record_set(index, set);

        let result = advance(&AdvanceContext {
            exercises: &self.program.exercises,
            current_exercise_index: index,
            current_set: set,
            ledger: &self.ledger,
            program_key: &self.program.key,
        })?;
        self.apply(&result);

        if result.workout_complete && !self.workout_recorded {
            self.workout_recorded = true;
            self.record_workout();
        }

        Ok(result)
    }

    /// Jump to the first set of another exercise, cancelling any rest
    pub fn skip_to_exercise(&mut self, index: usize) -> Result<NavigationResult> {
        self.ensure_active()?;
        if index >= self.program.exercises.len() {
            return Err(Error::State(format!(
                "Exercise {} does not exist in '{}'",
                index + 1,
                self.program.name
            )));
        }
        let result = NavigationResult::go_to(index, 1);
        self.apply(&result);
        Ok(result)
    }

    /// Jump to another set of the current exercise, cancelling any rest
    pub fn skip_to_set(&mut self, set: u32) -> Result<NavigationResult> {
        self.ensure_active()?;
        let sets = self.current_exercise().map_or(0, |e| e.sets);
        if set == 0 || set > sets {
            return Err(Error::State(format!(
                "Set {} does not exist (exercise has {} sets)",
                set, sets
            )));
        }
        let result = NavigationResult::go_to(self.state.current_exercise_index, set);
        self.apply(&result);
        Ok(result)
    }

    /// End the current rest early
    pub fn skip_rest(&mut self) -> Result<NavigationResult> {
        self.ensure_active()?;
        let result =
            NavigationResult::go_to(self.state.current_exercise_index, self.state.current_set);
        self.apply(&result);
        Ok(result)
    }

    /// Pause or resume the rest timer. Returns whether it is now running.
    pub fn toggle_timer(&mut self) -> Result<bool> {
        self.ensure_active()?;
        if !self.state.is_resting {
            return Err(Error::State("No rest in progress".into()));
        }
        self.state.is_timer_running = !self.state.is_timer_running;
        self.timer_epoch += 1;
        tracing::debug!(
            "Rest timer {} at {}s",
            if self.state.is_timer_running { "resumed" } else { "paused" },
            self.state.time_left
        );
        Ok(self.state.is_timer_running)
    }

    /// Start the same program over with a cleared ledger
    pub fn restart(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.ledger.clear();
        self.state = SessionState::default();
        self.started_at = Utc::now();
        self.workout_recorded = false;
        self.timer_epoch += 1;
        tracing::info!("Restarted '{}'", self.program.name);
        Ok(())
    }

    /// Count the rest timer down by one tick issued under `epoch`
    pub fn tick(&mut self, epoch: u64) -> Tick {
        if self.ended || epoch != self.timer_epoch {
            return Tick::Stale;
        }
        self.state.tick()
    }

    /// Stop the session; later ticks and transitions are rejected
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.state.is_timer_running = false;
        self.timer_epoch += 1;
        tracing::info!(
            "Ended '{}' after {} of {} sets",
            self.program.name,
            self.ledger.len(),
            self.program.total_sets()
        );
    }

    fn ensure_active(&self) -> Result<()> {
        if self.ended {
            return Err(Error::State("Session has ended".into()));
        }
        Ok(())
    }

    fn apply(&mut self, result: &NavigationResult) {
        self.state.apply(result);
        self.timer_epoch += 1;
    }

    fn record_set(&mut self, index: usize, set: u32) {
        let Some(exercise) = self.program.exercises.get(index) else {
            return;
        };
        let record = SetRecord {
            program_name: self.program.name.clone(),
            exercise_name: exercise.name.clone(),
            set_number: set,
            reps: exercise.reps.target_reps(),
            notes: format!("Completed set {}", set),
            recorded_at: Utc::now(),
        };
        if let Err(e) = self.sink.record_set(&record) {
            tracing::warn!("Failed to record set {} of {}: {}", set, exercise.name, e);
        }
    }

    fn record_workout(&mut self) {
        let completed_at = Utc::now();
        let record = WorkoutRecord {
            id: Uuid::new_v4(),
            program_key: self.program.key.clone(),
            program_name: self.program.name.clone(),
            description: self.program.description.clone(),
            started_at: self.started_at,
            completed_at,
            duration_seconds: (completed_at - self.started_at).num_seconds(),
            sets_completed: self.ledger.len(),
            total_sets: self.program.total_sets(),
            exercises: self
                .program
                .exercises
                .iter()
                .map(|e| ExerciseSummary {
                    name: e.name.clone(),
                    sets: e.sets,
                    reps: e.reps.clone(),
                })
                .collect(),
        };
        tracing::info!(
            "Workout '{}' complete ({} sets)",
            record.program_name,
            record.sets_completed
        );
        if let Err(e) = self.sink.record_workout(&record) {
            tracing::warn!("Failed to record workout {}: {}", record.program_name, e);
        }
    }
}

/// A session with a running rest timer attached.
///
/// Dropping it ends the session and joins the timer thread.
pub struct LiveSession {
    shared: Arc<Mutex<Session>>,
    timer: RestTimer,
    cue: Arc<dyn RestCue>,
}

impl LiveSession {
    pub fn new(session: Session, tick_period: Duration, cue: Arc<dyn RestCue>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(session)),
            timer: RestTimer::new(tick_period),
            cue,
        }
    }

    pub fn complete_set(&mut self) -> Result<NavigationResult> {
        self.transition(Session::complete_set)
    }

    pub fn skip_to_exercise(&mut self, index: usize) -> Result<NavigationResult> {
        self.transition(|s| s.skip_to_exercise(index))
    }

    pub fn skip_to_set(&mut self, set: u32) -> Result<NavigationResult> {
        self.transition(|s| s.skip_to_set(set))
    }

    pub fn skip_rest(&mut self) -> Result<NavigationResult> {
        self.transition(Session::skip_rest)
    }

    pub fn toggle_timer(&mut self) -> Result<bool> {
        self.transition(Session::toggle_timer)
    }

    pub fn restart(&mut self) -> Result<()> {
        self.transition(Session::restart)
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> Result<SessionState> {
        Ok(self.lock()?.state().clone())
    }

    /// Read access to the whole session for rendering
    pub fn with_session<T>(&self, f: impl FnOnce(&Session) -> T) -> Result<T> {
        let session = self.lock()?;
        Ok(f(&*session))
    }

    pub fn is_timer_active(&self) -> bool {
        self.timer.is_running()
    }

    /// Leave the session: stop the timer and discard the state
    pub fn end(self) {
        drop(self);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>> {
        self.shared
            .lock()
            .map_err(|_| Error::State("Session lock poisoned".into()))
    }

    /// Run a transition under the lock, then bring the ticker in line with
    /// the new state outside it.
    fn transition<T>(&mut self, f: impl FnOnce(&mut Session) -> Result<T>) -> Result<T> {
        let (value, running, epoch) = {
            let mut session = self.lock()?;
            let value = f(&mut *session)?;
            (value, session.state().is_timer_running, session.timer_epoch())
        };
        self.sync_timer(running, epoch)?;
        Ok(value)
    }

    fn sync_timer(&mut self, running: bool, epoch: u64) -> Result<()> {
        if !running {
            self.timer.stop();
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let cue = Arc::clone(&self.cue);
        self.timer.start(move || {
            let tick = match shared.lock() {
                Ok(mut session) => session.tick(epoch),
                Err(_) => return ControlFlow::Break(()),
            };
            match tick {
                Tick::Counted(_) => ControlFlow::Continue(()),
                Tick::Elapsed => {
                    if let Err(e) = cue.play() {
                        tracing::warn!("Rest cue failed: {}", e);
                    }
                    ControlFlow::Continue(())
                }
                Tick::Idle | Tick::Stale => ControlFlow::Break(()),
            }
        })
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if let Ok(mut session) = self.shared.lock() {
            session.end();
        }
        self.timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::timer::SilentCue;
    use crate::{RepRange, SetRecord, WorkoutRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[derive(Default)]
    struct Recorded {
        sets: Vec<SetRecord>,
        workouts: Vec<WorkoutRecord>,
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Recorded>>);

    impl ActivitySink for RecordingSink {
        fn record_set(&mut self, record: &SetRecord) -> Result<()> {
            self.0.lock().unwrap().sets.push(record.clone());
            Ok(())
        }

        fn record_workout(&mut self, record: &WorkoutRecord) -> Result<()> {
            self.0.lock().unwrap().workouts.push(record.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl ActivitySink for FailingSink {
        fn record_set(&mut self, _record: &SetRecord) -> Result<()> {
            Err(Error::Other("disk full".into()))
        }

        fn record_workout(&mut self, _record: &WorkoutRecord) -> Result<()> {
            Err(Error::Other("disk full".into()))
        }
    }

    #[derive(Default)]
    struct CountingCue(AtomicUsize);

    impl RestCue for CountingCue {
        fn play(&self) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(Error::Other("no audio device".into()))
        }
    }

    fn exercise(name: &str, group: &str, sets: u32, rest: u32) -> Exercise {
        Exercise::new(name, sets, RepRange::Text("6-8".into()), rest, group)
    }

    fn superset_program() -> WorkoutProgram {
        WorkoutProgram {
            key: "pair".into(),
            name: "Pair Day".into(),
            description: "Superset then finisher".into(),
            exercises: vec![
                exercise("Curl", "B1", 2, 0),
                exercise("Extension", "B2", 2, 90),
                exercise("Plank", "C", 1, 60),
            ],
        }
    }

    #[test]
    fn test_new_session_initial_state() {
        let session = Session::with_program(superset_program(), Box::new(RecordingSink::default()))
            .unwrap();
        assert_eq!(session.state(), &SessionState::default());
        assert_eq!(session.progress().completed_sets, 0);
        assert_eq!(session.progress().total_sets, 5);
    }

    #[test]
    fn test_invalid_program_never_becomes_session() {
        let mut program = superset_program();
        program.exercises[2].rest_seconds = 20;
        let result = Session::with_program(program, Box::new(RecordingSink::default()));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_start_unknown_program() {
        let catalog = build_default_catalog();
        let result = Session::start(&catalog, "nope", Box::new(RecordingSink::default()));
        assert!(matches!(result, Err(Error::ProgramNotFound(_))));
    }

    #[test]
    fn test_full_walkthrough_records_activity() {
        let sink = RecordingSink::default();
        let mut session =
            Session::with_program(superset_program(), Box::new(sink.clone())).unwrap();

        session.complete_set().unwrap();
        assert_eq!(session.state().current_exercise_index, 1);
        assert!(!session.state().is_resting);

        session.complete_set().unwrap();
        assert_eq!(session.state().current_exercise_index, 0);
        assert_eq!(session.state().current_set, 2);
        assert!(session.state().is_resting);
        assert_eq!(session.state().time_left, 90);

        session.complete_set().unwrap();
        session.complete_set().unwrap();
        assert_eq!(session.state().current_exercise_index, 2);
        assert_eq!(session.state().time_left, 60);

        let last = session.complete_set().unwrap();
        assert!(last.workout_complete);
        assert!(session.is_finished());

        let recorded = sink.0.lock().unwrap();
        assert_eq!(recorded.sets.len(), 5);
        assert_eq!(recorded.sets[0].exercise_name, "Curl");
        assert_eq!(recorded.sets[0].reps, Some(8));
        assert_eq!(recorded.workouts.len(), 1);
        assert_eq!(recorded.workouts[0].sets_completed, 5);
        assert_eq!(recorded.workouts[0].exercises.len(), 3);
    }

    #[test]
    fn test_workout_recorded_once() {
        let sink = RecordingSink::default();
        let program = WorkoutProgram {
            key: "single".into(),
            name: "Single".into(),
            description: "One set".into(),
            exercises: vec![exercise("Squat", "A", 1, 90)],
        };
        let mut session = Session::with_program(program, Box::new(sink.clone())).unwrap();

        session.complete_set().unwrap();
        assert!(session.is_finished());
        assert!(matches!(session.complete_set(), Err(Error::State(_))));

        let recorded = sink.0.lock().unwrap();
        assert_eq!(recorded.workouts.len(), 1);
        assert_eq!(recorded.sets.len(), 1);
    }

    #[test]
    fn test_restart_after_finish_allows_a_new_run() {
        let sink = RecordingSink::default();
        let program = WorkoutProgram {
            key: "single".into(),
            name: "Single".into(),
            description: "One set".into(),
            exercises: vec![exercise("Squat", "A", 1, 90)],
        };
        let mut session = Session::with_program(program, Box::new(sink.clone())).unwrap();

        session.complete_set().unwrap();
        session.restart().unwrap();
        assert!(session.complete_set().unwrap().workout_complete);

        assert_eq!(sink.0.lock().unwrap().workouts.len(), 2);
    }

    #[test]
    fn test_sink_failure_does_not_alter_navigation() {
        let mut failing =
            Session::with_program(superset_program(), Box::new(FailingSink)).unwrap();
        let mut recording =
            Session::with_program(superset_program(), Box::new(RecordingSink::default()))
                .unwrap();

        for _ in 0..5 {
            let a = failing.complete_set().unwrap();
            let b = recording.complete_set().unwrap();
            assert_eq!(a, b);
        }
        assert!(failing.is_finished());
    }

    #[test]
    fn test_skip_to_exercise_and_set() {
        let mut session =
            Session::with_program(superset_program(), Box::new(RecordingSink::default()))
                .unwrap();
        session.complete_set().unwrap();
        session.complete_set().unwrap();
        assert!(session.state().is_timer_running);

        let result = session.skip_to_exercise(2).unwrap();
        assert_eq!(result, NavigationResult::go_to(2, 1));
        assert!(!session.state().is_timer_running);

        assert!(session.skip_to_exercise(3).is_err());
        assert!(session.skip_to_set(2).is_err());

        session.skip_to_exercise(0).unwrap();
        session.skip_to_set(2).unwrap();
        assert_eq!(session.state().current_set, 2);
        assert!(session.is_set_completed(0, 1));
        assert!(!session.is_set_completed(0, 2));
    }

    #[test]
    fn test_toggle_timer_requires_rest() {
        let mut session =
            Session::with_program(superset_program(), Box::new(RecordingSink::default()))
                .unwrap();
        assert!(session.toggle_timer().is_err());

        session.complete_set().unwrap();
        session.complete_set().unwrap();
        assert!(!session.toggle_timer().unwrap());
        assert!(session.toggle_timer().unwrap());
    }

    #[test]
    fn test_restart_clears_ledger() {
        let mut session =
            Session::with_program(superset_program(), Box::new(RecordingSink::default()))
                .unwrap();
        session.complete_set().unwrap();
        session.restart().unwrap();

        assert_eq!(session.state(), &SessionState::default());
        assert!(!session.is_set_completed(0, 1));
        assert_eq!(session.progress().completed_sets, 0);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut session =
            Session::with_program(superset_program(), Box::new(RecordingSink::default()))
                .unwrap();
        session.complete_set().unwrap();
        session.complete_set().unwrap();
        let epoch = session.timer_epoch();

        assert_eq!(session.tick(epoch), Tick::Counted(89));
        assert_eq!(session.tick(epoch - 1), Tick::Stale);
        assert_eq!(session.state().time_left, 89);

        session.end();
        assert_eq!(session.tick(session.timer_epoch()), Tick::Stale);
        assert!(session.complete_set().is_err());
    }

    #[test]
    fn test_live_session_counts_down_and_cues() {
        let program = WorkoutProgram {
            key: "quick".into(),
            name: "Quick".into(),
            description: "Short rests".into(),
            exercises: vec![exercise("Curl", "A1", 2, 0), exercise("Extension", "A2", 2, 2)],
        };
        let session = Session::with_program(program, Box::new(RecordingSink::default())).unwrap();
        let cue = Arc::new(CountingCue::default());
        let mut live = LiveSession::new(session, Duration::from_millis(5), cue.clone());

        live.complete_set().unwrap();
        assert!(!live.is_timer_active());
        live.complete_set().unwrap();
        assert!(live.is_timer_active());

        let deadline = Instant::now() + Duration::from_secs(5);
        while live.snapshot().unwrap().time_left > -1 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(live.snapshot().unwrap().time_left <= -1);
        assert_eq!(cue.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_live_session_pause_freezes_countdown() {
        let session =
            Session::with_program(superset_program(), Box::new(RecordingSink::default()))
                .unwrap();
        let mut live = LiveSession::new(session, Duration::from_millis(2), Arc::new(SilentCue));
        live.complete_set().unwrap();
        live.complete_set().unwrap();

        std::thread::sleep(Duration::from_millis(50));
        assert!(!live.toggle_timer().unwrap());
        assert!(!live.is_timer_active());

        let paused_at = live.snapshot().unwrap().time_left;
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(live.snapshot().unwrap().time_left, paused_at);
        assert!(paused_at < 90);
    }

    #[test]
    fn test_live_session_completion_from_rest_stops_timer() {
        let session =
            Session::with_program(superset_program(), Box::new(RecordingSink::default()))
                .unwrap();
        let mut live = LiveSession::new(session, Duration::from_millis(2), Arc::new(SilentCue));
        live.complete_set().unwrap();
        live.complete_set().unwrap();
        assert!(live.is_timer_active());

        // Completing from the rest screen goes through the same path.
        let result = live.complete_set().unwrap();
        assert_eq!(result, NavigationResult::go_to(1, 2));
        assert!(!live.is_timer_active());
        let state = live.snapshot().unwrap();
        assert_eq!(state.time_left, 0);
        live.end();
    }
}
