//! Default bodypart and exercise reference data.
//!
//! This module populates an empty store with the built-in exercise library.
//! Seeding is idempotent: existing names are checked before insert, never
//! truncated and reinserted.

use crate::{Bodypart, EntityStore, Exercise, Result};
use once_cell::sync::Lazy;

/// The canonical muscle-group categories
pub const DEFAULT_BODYPARTS: [&str; 11] = [
    "Chest",
    "Back",
    "Shoulders",
    "Biceps",
    "Triceps",
    "Forearms",
    "Quadriceps",
    "Hamstrings",
    "Glutes",
    "Calves",
    "Abs",
];

/// Cached default exercise list as (name, bodypart name) pairs
static DEFAULT_EXERCISES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        // Chest
        ("Barbell Bench Press", "Chest"),
        ("Incline Barbell Bench Press", "Chest"),
        ("Decline Barbell Bench Press", "Chest"),
        ("Dumbbell Bench Press", "Chest"),
        ("Incline Dumbbell Press", "Chest"),
        ("Dumbbell Flyes", "Chest"),
        ("Cable Chest Fly", "Chest"),
        ("Chest Press Machine", "Chest"),
        ("Pec Deck Machine", "Chest"),
        // Back
        ("Deadlift", "Back"),
        ("Barbell Row", "Back"),
        ("T-Bar Row", "Back"),
        ("Dumbbell Row", "Back"),
        ("Cable Row", "Back"),
        ("Lat Pulldown", "Back"),
        ("Pull-ups", "Back"),
        ("Cable Pullover", "Back"),
        ("Machine Row", "Back"),
        // Shoulders
        ("Overhead Press", "Shoulders"),
        ("Dumbbell Shoulder Press", "Shoulders"),
        ("Lateral Raises", "Shoulders"),
        ("Front Raises", "Shoulders"),
        ("Rear Delt Flyes", "Shoulders"),
        ("Cable Lateral Raises", "Shoulders"),
        ("Machine Shoulder Press", "Shoulders"),
        ("Face Pulls", "Shoulders"),
        // Biceps
        ("Barbell Curl", "Biceps"),
        ("Dumbbell Curl", "Biceps"),
        ("Hammer Curls", "Biceps"),
        ("Cable Bicep Curl", "Biceps"),
        ("Preacher Curls", "Biceps"),
        ("Cable Hammer Curls", "Biceps"),
        // Triceps
        ("Close Grip Bench Press", "Triceps"),
        ("Tricep Dips", "Triceps"),
        ("Overhead Tricep Extension", "Triceps"),
        ("Cable Tricep Pushdown", "Triceps"),
        ("Dumbbell Tricep Extension", "Triceps"),
        ("Cable Overhead Extension", "Triceps"),
        // Forearms
        ("Barbell Wrist Curls", "Forearms"),
        ("Dumbbell Wrist Curls", "Forearms"),
        ("Reverse Barbell Curls", "Forearms"),
        ("Cable Wrist Curls", "Forearms"),
        // Quadriceps
        ("Squat", "Quadriceps"),
        ("Front Squat", "Quadriceps"),
        ("Leg Press", "Quadriceps"),
        ("Bulgarian Split Squats", "Quadriceps"),
        ("Dumbbell Lunges", "Quadriceps"),
        ("Leg Extension", "Quadriceps"),
        // Hamstrings
        ("Romanian Deadlift", "Hamstrings"),
        ("Leg Curls", "Hamstrings"),
        ("Stiff Leg Deadlift", "Hamstrings"),
        ("Dumbbell Romanian Deadlift", "Hamstrings"),
        // Glutes
        ("Hip Thrust", "Glutes"),
        ("Barbell Hip Thrust", "Glutes"),
        ("Dumbbell Hip Thrust", "Glutes"),
        ("Cable Kickbacks", "Glutes"),
        // Calves
        ("Calf Raise", "Calves"),
        ("Seated Calf Raise", "Calves"),
        ("Dumbbell Calf Raise", "Calves"),
        ("Machine Calf Raise", "Calves"),
        // Abs
        ("Plank", "Abs"),
        ("Cable Crunches", "Abs"),
        ("Russian Twists", "Abs"),
        ("Machine Crunches", "Abs"),
    ]
});

/// Get the default exercise reference list
pub fn default_exercises() -> &'static [(&'static str, &'static str)] {
    &DEFAULT_EXERCISES
}

/// What a seeding pass inserted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub bodyparts_added: usize,
    pub exercises_added: usize,
}

/// Populate reference data when the store is empty.
///
/// Bodyparts are inserted name-by-name so a partially seeded store is
/// completed rather than duplicated. Exercises are only inserted when the
/// live exercise collection is empty; each pair resolves its bodypart by
/// name, or stays uncategorized when no bodypart matches.
pub fn seed_if_empty(store: &mut EntityStore) -> Result<SeedReport> {
    let needs_bodyparts = DEFAULT_BODYPARTS
        .iter()
        .any(|name| store.bodypart_by_name(name).is_none());
    let needs_exercises = store.exercises_by_name().is_empty();

    if !needs_bodyparts && !needs_exercises {
        tracing::debug!("Reference data already present, nothing to seed");
        return Ok(SeedReport::default());
    }

    store.transact(|data| {
        let mut report = SeedReport::default();

        for name in DEFAULT_BODYPARTS {
            if !data.bodyparts.iter().any(|b| b.name == name) {
                data.bodyparts.push(Bodypart::new(name));
                report.bodyparts_added += 1;
            }
        }

        if needs_exercises {
            for (name, bodypart_name) in default_exercises() {
                let bodypart_id = data
                    .bodyparts
                    .iter()
                    .find(|b| b.name == *bodypart_name)
                    .map(|b| b.id);
                if bodypart_id.is_none() {
                    tracing::warn!("Seed exercise '{}' has no bodypart '{}'", name, bodypart_name);
                }
                data.exercises.push(Exercise::new(*name, bodypart_id));
                report.exercises_added += 1;
            }
        }

        tracing::info!(
            "Seeded {} bodyparts and {} exercises",
            report.bodyparts_added,
            report.exercises_added
        );
        Ok(report)
    })
}
