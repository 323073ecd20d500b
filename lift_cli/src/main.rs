use clap::{Parser, Subcommand};
use lift_core::config::journal_path_in;
use lift_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Workout tracker with superset-aware rest timing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a JSON workout catalog instead of the built-in programs
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List available workout programs (default)
    List,

    /// Validate every program in the catalog
    Validate,

    /// Start a workout session
    Start {
        /// Program key, e.g. workoutA
        program: String,

        /// Complete every set automatically (for testing)
        #[arg(long)]
        auto_complete: bool,
    },

    /// Show recently completed workouts
    History {
        /// How many days back to look
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    lift_core::logging::init_with_level(lift_core::logging::level_for_verbosity(cli.verbose));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
    }
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let catalog = config.load_catalog()?;
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::List) | None => cmd_list(&catalog),
        Some(Commands::Validate) => cmd_validate(&catalog),
        Some(Commands::Start {
            program,
            auto_complete,
        }) => cmd_start(&catalog, &program, data_dir, auto_complete, &config),
        Some(Commands::History { days }) => cmd_history(data_dir, days),
    }
}

fn cmd_list(catalog: &Catalog) -> Result<()> {
    for program in &catalog.programs {
        println!(
            "{:<16} {} - {} ({} exercises)",
            program.key,
            program.name,
            program.description,
            program.exercises.len()
        );
    }
    Ok(())
}

fn cmd_validate(catalog: &Catalog) -> Result<()> {
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other(format!(
            "{} catalog problem(s) found",
            errors.len()
        )));
    }

    println!("✓ {} programs valid", catalog.programs.len());
    Ok(())
}

fn cmd_start(
    catalog: &Catalog,
    key: &str,
    data_dir: PathBuf,
    auto_complete: bool,
    config: &Config,
) -> Result<()> {
    let journal_path = journal_path_in(&data_dir);
    let session = Session::start(catalog, key, Box::new(JsonlJournal::new(&journal_path)))?;

    let cue: Arc<dyn RestCue> = if config.timer.audible_cue && !auto_complete {
        Arc::new(TerminalBell)
    } else {
        Arc::new(SilentCue)
    };
    let mut live = LiveSession::new(session, config.timer.tick_period(), cue);

    let finished = if auto_complete {
        run_auto_complete(&mut live)?
    } else {
        run_interactive(&mut live)?
    };

    if finished {
        let progress = live.with_session(Session::progress)?;
        println!(
            "\n✓ Workout complete! {} sets logged to {}",
            progress.completed_sets,
            journal_path.display()
        );
    }

    live.end();
    Ok(())
}

fn run_auto_complete(live: &mut LiveSession) -> Result<bool> {
    let total = live.with_session(|s| s.progress().total_sets)?;

    for _ in 0..total {
        let (name, set) = live.with_session(|s| {
            (
                s.current_exercise().map(|e| e.name.clone()).unwrap_or_default(),
                s.state().current_set,
            )
        })?;
        let result = live.complete_set()?;
        println!("✓ {} - set {}", name, set);
        if result.workout_complete {
            return Ok(true);
        }
    }

    Ok(false)
}

fn run_interactive(live: &mut LiveSession) -> Result<bool> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        render(live)?;
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(false);
        };
        let line = line?;
        let mut parts = line.split_whitespace();

        let outcome = match (parts.next(), parts.next()) {
            (None, _) => live.complete_set().map(|r| r.workout_complete),
            (Some("s"), _) => live.skip_rest().map(|_| false),
            (Some("p"), _) => live.toggle_timer().map(|_| false),
            (Some("r"), _) => live.restart().map(|_| false),
            (Some("x"), Some(n)) => match parse_position(n) {
                Some(index) => live.skip_to_exercise(index).map(|_| false),
                None => Err(Error::Other(format!("Not an exercise number: {}", n))),
            },
            (Some("n"), Some(n)) => match n.parse::<u32>() {
                Ok(set) => live.skip_to_set(set).map(|_| false),
                Err(_) => Err(Error::Other(format!("Not a set number: {}", n))),
            },
            (Some("q"), _) => return Ok(false),
            (Some(other), _) => Err(Error::Other(format!("Unknown command: {}", other))),
        };

        match outcome {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(Error::State(message)) | Err(Error::Other(message)) => {
                println!("  ! {}", message);
            }
            Err(e) => return Err(e),
        }
    }
}

fn parse_position(input: &str) -> Option<usize> {
    input.parse::<usize>().ok()?.checked_sub(1)
}

fn render(live: &LiveSession) -> Result<()> {
    live.with_session(|session| {
        let state = session.state();
        let program = session.program();
        let progress = session.progress();

        println!("\n╭─────────────────────────────────────────╮");
        println!("│  {}", program.name);
        println!("╰─────────────────────────────────────────╯");

        if let Some(exercise) = session.current_exercise() {
            println!(
                "  [{}] {} ({}/{})",
                exercise.group,
                exercise.name,
                state.current_exercise_index + 1,
                program.exercises.len()
            );
            println!(
                "  Set {} of {} · {} reps · {}s rest",
                state.current_set, exercise.sets, exercise.reps, exercise.rest_seconds
            );
            if let Some(notes) = &exercise.notes {
                println!("  ℹ {}", notes);
            }
        }

        if state.is_resting {
            let label = if state.time_left < 0 { "Overtime" } else { "Rest" };
            let paused = if state.is_timer_running { "" } else { " (paused)" };
            println!("  ⏱ {}: {}{}", label, format_time(state.time_left), paused);
        }

        println!(
            "  Progress: {}/{} sets",
            progress.completed_sets, progress.total_sets
        );
        println!("─────────────────────────────────────────");
        println!("Enter: set done · s: skip rest · p: pause/resume");
        println!("x N: exercise N · n N: set N · r: restart · q: quit");
    })
}

fn cmd_history(data_dir: PathBuf, days: i64) -> Result<()> {
    let workouts = load_recent_workouts(&journal_path_in(&data_dir), days)?;

    if workouts.is_empty() {
        println!("No workouts in the last {} days.", days);
        return Ok(());
    }

    for workout in workouts {
        println!(
            "{}  {:<20} {}/{} sets  {} min",
            workout.completed_at.format("%Y-%m-%d %H:%M"),
            workout.program_name,
            workout.sets_completed,
            workout.total_sets,
            workout.duration_seconds / 60
        );
    }
    Ok(())
}

/// Rings the terminal bell when a rest period is over
struct TerminalBell;

impl RestCue for TerminalBell {
    fn play(&self) -> Result<()> {
        let mut stderr = io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}
