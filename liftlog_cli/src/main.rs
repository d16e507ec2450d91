use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout tracking system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new workout session
    Start {
        /// Workout title
        title: String,

        /// Optional workout notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Add a set of an exercise to the active workout
    Add {
        /// Exercise name (case-insensitive)
        exercise: String,

        /// Place the set after the highest existing set number
        /// instead of at the count position
        #[arg(long)]
        next: bool,
    },

    /// Enter weight and reps for a set
    Set {
        /// Exercise name
        exercise: String,

        /// Set number as shown by `status` (1-based)
        number: u32,

        /// Weight (non-numeric input clears the field)
        weight: String,

        /// Reps (non-numeric input clears the field)
        reps: String,
    },

    /// Toggle a set's completion checkmark
    Check {
        /// Exercise name
        exercise: String,

        /// Set number as shown by `status` (1-based)
        number: u32,
    },

    /// Remove a set from the active workout
    Remove {
        /// Exercise name
        exercise: String,

        /// Set number as shown by `status` (1-based)
        number: u32,
    },

    /// Show the active workout
    Status,

    /// Background the active workout, optionally saving pending edits
    Minimize {
        /// Updated title
        #[arg(long)]
        title: Option<String>,

        /// Updated notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Bring a minimized workout back to the foreground
    Resume,

    /// Finish the active workout and record it in history
    Finish,

    /// Abandon the active workout (empty workouts are discarded)
    Cancel,

    /// Show completed workout history
    History {
        /// Show at most this many workouts
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the exercise library grouped by bodypart
    Exercises,

    /// Export workout history to CSV
    Export {
        /// Output CSV path
        path: PathBuf,
    },

    /// Sync data to the cloud (Premium)
    Sync,
}

fn main() -> Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Start { title, notes } => cmd_start(&data_dir, &title, notes.as_deref()),
        Commands::Add { exercise, next } => cmd_add(&data_dir, &exercise, next),
        Commands::Set {
            exercise,
            number,
            weight,
            reps,
        } => cmd_set(&data_dir, &config, &exercise, number, &weight, &reps),
        Commands::Check { exercise, number } => cmd_check(&data_dir, &exercise, number),
        Commands::Remove { exercise, number } => cmd_remove(&data_dir, &exercise, number),
        Commands::Status => cmd_status(&data_dir, &config),
        Commands::Minimize { title, notes } => {
            cmd_minimize(&data_dir, title.as_deref(), notes.as_deref())
        }
        Commands::Resume => cmd_resume(&data_dir),
        Commands::Finish => cmd_finish(&data_dir),
        Commands::Cancel => cmd_cancel(&data_dir),
        Commands::History { limit } => cmd_history(&data_dir, &config, limit),
        Commands::Exercises => cmd_exercises(&data_dir),
        Commands::Export { path } => cmd_export(&data_dir, &path),
        Commands::Sync => cmd_sync(&config),
    }
}

fn open_store(data_dir: &PathBuf) -> Result<EntityStore> {
    EntityStore::open(data_dir.join("store.json"))
}

fn open_session(data_dir: &PathBuf) -> SessionManager {
    SessionManager::load(data_dir.join("session.json"))
}

/// Resolve the active workout id, or explain that there is none.
fn require_active(session: &SessionManager, store: &EntityStore) -> Result<Uuid> {
    session
        .get_active_workout(store)
        .map(|w| w.id)
        .ok_or_else(|| Error::Session("no active workout (run `liftlog start`)".into()))
}

/// Find a set by exercise name and 1-based display number.
fn resolve_set(
    store: &EntityStore,
    workout_id: Uuid,
    exercise: &str,
    number: u32,
) -> Result<Uuid> {
    if number == 0 {
        return Err(Error::Session("set numbers start at 1".into()));
    }

    store
        .sets_for_workout(workout_id)
        .into_iter()
        .find(|s| s.exercise_name.eq_ignore_ascii_case(exercise) && s.order == number - 1)
        .map(|s| s.id)
        .ok_or_else(|| {
            Error::Session(format!("no set {} of '{}' in the active workout", number, exercise))
        })
}

fn cmd_start(data_dir: &PathBuf, title: &str, notes: Option<&str>) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(data_dir);

    let workout = builder::create_workout(&mut store, &mut session, title, notes)?;

    println!("✓ Started workout '{}'", workout.title);
    println!("  Add sets with: liftlog add <exercise>");
    Ok(())
}

fn cmd_add(data_dir: &PathBuf, exercise: &str, next: bool) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(data_dir);

    // First read of an empty exercise collection materializes the library
    if store.exercises_by_name().is_empty() {
        seed_if_empty(&mut store)?;
    }

    let workout_id = require_active(&session, &store)?;
    let exercise_id = store
        .exercise_by_name(exercise)
        .map(|e| e.id)
        .ok_or_else(|| {
            Error::Session(format!(
                "unknown exercise '{}' (see `liftlog exercises`)",
                exercise
            ))
        })?;

    let set = if next {
        builder::add_following_set(&mut store, workout_id, exercise_id)?
    } else {
        builder::attach_exercise_set(&mut store, workout_id, exercise_id)?
    };

    println!("✓ Added set {} of {}", set.order + 1, set.exercise_name);
    Ok(())
}

fn cmd_set(
    data_dir: &PathBuf,
    config: &Config,
    exercise: &str,
    number: u32,
    weight: &str,
    reps: &str,
) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let session = open_session(data_dir);

    let workout_id = require_active(&session, &store)?;
    let set_id = resolve_set(&store, workout_id, exercise, number)?;

    let updated = builder::update_set_values(&mut store, set_id, weight, reps)?;
    println!(
        "✓ {} set {}: {} {} x {} reps",
        updated.exercise_name,
        number,
        updated.weight,
        config.units.weight,
        updated.reps
    );
    Ok(())
}

fn cmd_check(data_dir: &PathBuf, exercise: &str, number: u32) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let session = open_session(data_dir);

    let workout_id = require_active(&session, &store)?;
    let set_id = resolve_set(&store, workout_id, exercise, number)?;

    let before = store.set(set_id).map(|s| s.is_completed).unwrap_or(false);
    let after = builder::toggle_completion(&mut store, set_id)?;

    if after.is_completed == before {
        println!("Set {} of {} needs weight and reps before completion", number, exercise);
    } else if after.is_completed {
        println!("✓ Completed set {} of {}", number, after.exercise_name);
    } else {
        println!("✓ Unchecked set {} of {}", number, after.exercise_name);
    }
    Ok(())
}

fn cmd_remove(data_dir: &PathBuf, exercise: &str, number: u32) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let session = open_session(data_dir);

    let workout_id = require_active(&session, &store)?;
    let set_id = resolve_set(&store, workout_id, exercise, number)?;

    store.soft_delete_set(set_id)?;
    println!("✓ Removed set {} of {}", number, exercise);
    Ok(())
}

fn cmd_status(data_dir: &PathBuf, config: &Config) -> Result<()> {
    let store = open_store(data_dir)?;
    let session = open_session(data_dir);

    let Some(workout) = session.get_active_workout(&store) else {
        println!("No active workout.");
        return Ok(());
    };

    if session.is_minimized() {
        println!("▸ Minimized workout (resume with `liftlog resume`)");
    }

    println!();
    println!("  {}", workout.title);
    if let Some(ref notes) = workout.notes {
        println!("  {}", notes);
    }
    println!("  Started {}", workout.date.format("%Y-%m-%d %H:%M"));

    let summary = history::summarize(&store, workout.id);
    println!(
        "  {}/{} sets done · {} exercises",
        summary.completed_sets, summary.total_sets, summary.exercise_count
    );

    for group in group_sets_by_exercise(store.sets_for_workout(workout.id)) {
        println!();
        println!("  {}", group.exercise_name);
        for set in &group.sets {
            let mark = if set.is_completed { "✓" } else { "·" };
            println!(
                "    {} {}  {} {} x {} reps",
                mark,
                set.order + 1,
                set.weight,
                config.units.weight,
                set.reps
            );
        }
    }
    println!();
    Ok(())
}

fn cmd_minimize(data_dir: &PathBuf, title: Option<&str>, notes: Option<&str>) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(data_dir);

    let workout_id = require_active(&session, &store)?;
    builder::minimize(&mut store, &mut session, workout_id, title, notes)?;

    println!("✓ Workout minimized");
    Ok(())
}

fn cmd_resume(data_dir: &PathBuf) -> Result<()> {
    let store = open_store(data_dir)?;
    let mut session = open_session(data_dir);

    let workout_id = require_active(&session, &store)?;
    session.resume_workout()?;

    let title = store.workout(workout_id).map(|w| w.title.clone()).unwrap_or_default();
    println!("✓ Resumed '{}'", title);
    Ok(())
}

fn cmd_finish(data_dir: &PathBuf) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(data_dir);

    let workout_id = require_active(&session, &store)?;
    let finished = builder::finish(&mut store, &mut session, workout_id)?;

    let summary = history::summarize(&store, finished.id);
    println!("✓ Finished '{}'", finished.title);
    println!(
        "  {}/{} sets done · {} exercises",
        summary.completed_sets, summary.total_sets, summary.exercise_count
    );
    Ok(())
}

fn cmd_cancel(data_dir: &PathBuf) -> Result<()> {
    let mut store = open_store(data_dir)?;
    let mut session = open_session(data_dir);

    let workout_id = require_active(&session, &store)?;
    let had_sets = !store.sets_for_workout(workout_id).is_empty();

    builder::cancel(&mut store, &mut session, workout_id)?;

    if had_sets {
        println!("✓ Workout cancelled (kept as incomplete)");
    } else {
        println!("✓ Empty workout discarded");
    }
    Ok(())
}

fn cmd_history(data_dir: &PathBuf, config: &Config, limit: Option<usize>) -> Result<()> {
    let store = open_store(data_dir)?;
    let entries = load_history(&store, limit);

    if entries.is_empty() {
        println!("No completed workouts yet.");
        return Ok(());
    }

    for entry in entries {
        println!();
        println!("  {}", entry.workout.title);
        if let Some(completed_at) = entry.workout.completed_at {
            println!("  Completed {}", completed_at.format("%Y-%m-%d %H:%M"));
        }
        println!(
            "  {}/{} sets done · {} exercises",
            entry.summary.completed_sets, entry.summary.total_sets, entry.summary.exercise_count
        );
        for group in &entry.groups {
            let best = group
                .sets
                .iter()
                .filter(|s| s.is_completed)
                .map(|s| s.weight)
                .fold(0.0_f64, f64::max);
            if best > 0.0 {
                println!(
                    "    {} ({} sets, top {} {})",
                    group.exercise_name,
                    group.sets.len(),
                    best,
                    config.units.weight
                );
            } else {
                println!("    {} ({} sets)", group.exercise_name, group.sets.len());
            }
        }
    }
    println!();
    Ok(())
}

fn cmd_exercises(data_dir: &PathBuf) -> Result<()> {
    let mut store = open_store(data_dir)?;

    // First read of an empty exercise collection materializes the library
    if store.exercises_by_name().is_empty() {
        let report = seed_if_empty(&mut store)?;
        if report.exercises_added > 0 {
            println!(
                "Seeded {} default exercises across {} bodyparts",
                report.exercises_added, report.bodyparts_added
            );
        }
    }

    for bodypart in store.bodyparts_by_name() {
        let exercises: Vec<_> = store
            .exercises_by_name()
            .into_iter()
            .filter(|e| e.bodypart_id == Some(bodypart.id))
            .collect();
        if exercises.is_empty() {
            continue;
        }

        println!();
        println!("  {}", bodypart.name);
        for exercise in exercises {
            println!("    {}", exercise.name);
        }
    }

    let uncategorized: Vec<_> = store
        .exercises_by_name()
        .into_iter()
        .filter(|e| e.bodypart_id.is_none())
        .collect();
    if !uncategorized.is_empty() {
        println!();
        println!("  Uncategorized");
        for exercise in uncategorized {
            println!("    {}", exercise.name);
        }
    }
    println!();
    Ok(())
}

fn cmd_export(data_dir: &PathBuf, path: &PathBuf) -> Result<()> {
    let store = open_store(data_dir)?;

    let rows = export_history_csv(&store, path)?;
    if rows == 0 {
        println!("No completed workouts to export.");
    } else {
        println!("✓ Exported {} set rows", rows);
        println!("  CSV: {}", path.display());
    }
    Ok(())
}

fn cmd_sync(config: &Config) -> Result<()> {
    let subscription = Subscription::new(config.subscription.tier);

    if subscription.requires_premium(billing::features::CLOUD_SYNC) {
        println!("Cloud sync requires a Premium subscription.");
        println!("Premium includes:");
        for feature in SubscriptionTier::Premium.features() {
            println!("  - {}", feature);
        }
        return Ok(());
    }

    // Capability is granted; the sync transport itself is a future feature
    println!("Cloud sync is enabled for your account but not yet available in this build.");
    Ok(())
}
