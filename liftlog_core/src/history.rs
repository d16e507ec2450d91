//! Completed-workout history and display derivations.
//!
//! Grouping and summary values are recomputed on every read; nothing here
//! is a stored property.

use crate::{EntityStore, ExerciseSet, Workout};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Sets of one exercise within a workout, ordered for display
#[derive(Clone, Debug)]
pub struct ExerciseGroup {
    pub exercise_name: String,
    pub sets: Vec<ExerciseSet>,
}

/// Per-workout display counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkoutSummary {
    pub total_sets: usize,
    pub completed_sets: usize,
    pub exercise_count: usize,
}

/// One history entry: the workout plus its derived display data
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub workout: Workout,
    pub summary: WorkoutSummary,
    pub groups: Vec<ExerciseGroup>,
}

/// Group sets by exercise name.
///
/// Groups are ordered alphabetically by name; sets within a group by
/// `order` ascending.
pub fn group_sets_by_exercise<'a, I>(sets: I) -> Vec<ExerciseGroup>
where
    I: IntoIterator<Item = &'a ExerciseSet>,
{
    let mut grouped: BTreeMap<String, Vec<ExerciseSet>> = BTreeMap::new();
    for set in sets {
        grouped
            .entry(set.exercise_name.clone())
            .or_default()
            .push(set.clone());
    }

    grouped
        .into_iter()
        .map(|(exercise_name, mut sets)| {
            sets.sort_by_key(|s| s.order);
            ExerciseGroup {
                exercise_name,
                sets,
            }
        })
        .collect()
}

/// Derive display counts for one workout
pub fn summarize(store: &EntityStore, workout_id: Uuid) -> WorkoutSummary {
    let sets = store.sets_for_workout(workout_id);
    let exercise_count = {
        let mut names: Vec<&str> = sets.iter().map(|s| s.exercise_name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    };

    WorkoutSummary {
        total_sets: sets.len(),
        completed_sets: sets.iter().filter(|s| s.is_completed).count(),
        exercise_count,
    }
}

/// Load completed workouts newest first, with display data attached.
pub fn load_history(store: &EntityStore, limit: Option<usize>) -> Vec<HistoryEntry> {
    let completed = store.completed_workouts();
    let take = limit.unwrap_or(completed.len());

    completed
        .into_iter()
        .take(take)
        .map(|workout| {
            let sets = store.sets_for_workout(workout.id);
            HistoryEntry {
                workout: workout.clone(),
                summary: summarize(store, workout.id),
                groups: group_sets_by_exercise(sets.into_iter()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{attach_exercise_set, create_workout, finish, toggle_completion, update_set_values},
        seed_if_empty, EntityStore, SessionManager,
    };

    struct Fixture {
        _dir: tempfile::TempDir,
        store: EntityStore,
        session: SessionManager,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::open(dir.path().join("store.json")).unwrap();
        seed_if_empty(&mut store).unwrap();
        let session = SessionManager::load(dir.path().join("session.json"));
        Fixture {
            _dir: dir,
            store,
            session,
        }
    }

    #[test]
    fn test_groups_alphabetical_sets_by_order() {
        let mut fx = fixture();
        let workout = create_workout(&mut fx.store, &mut fx.session, "Leg Day", None).unwrap();
        let squat = fx.store.exercise_by_name("Squat").unwrap().id;
        let curls = fx.store.exercise_by_name("Leg Curls").unwrap().id;

        attach_exercise_set(&mut fx.store, workout.id, squat).unwrap();
        attach_exercise_set(&mut fx.store, workout.id, curls).unwrap();
        attach_exercise_set(&mut fx.store, workout.id, squat).unwrap();

        let groups = group_sets_by_exercise(fx.store.sets_for_workout(workout.id));

        let names: Vec<_> = groups.iter().map(|g| g.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["Leg Curls", "Squat"]);

        let squat_orders: Vec<u32> = groups[1].sets.iter().map(|s| s.order).collect();
        assert_eq!(squat_orders, vec![0, 1]);
    }

    #[test]
    fn test_summary_counts() {
        let mut fx = fixture();
        let workout = create_workout(&mut fx.store, &mut fx.session, "Leg Day", None).unwrap();
        let squat = fx.store.exercise_by_name("Squat").unwrap().id;
        let press = fx.store.exercise_by_name("Leg Press").unwrap().id;

        let first = attach_exercise_set(&mut fx.store, workout.id, squat).unwrap();
        attach_exercise_set(&mut fx.store, workout.id, squat).unwrap();
        attach_exercise_set(&mut fx.store, workout.id, press).unwrap();

        update_set_values(&mut fx.store, first.id, "135", "5").unwrap();
        toggle_completion(&mut fx.store, first.id).unwrap();

        let summary = summarize(&fx.store, workout.id);
        assert_eq!(summary.total_sets, 3);
        assert_eq!(summary.completed_sets, 1);
        assert_eq!(summary.exercise_count, 2);
    }

    #[test]
    fn test_load_history_only_finished_workouts() {
        let mut fx = fixture();
        let first = create_workout(&mut fx.store, &mut fx.session, "Day One", None).unwrap();
        let squat = fx.store.exercise_by_name("Squat").unwrap().id;
        attach_exercise_set(&mut fx.store, first.id, squat).unwrap();
        finish(&mut fx.store, &mut fx.session, first.id).unwrap();

        // Second workout is still active, so not history
        create_workout(&mut fx.store, &mut fx.session, "Day Two", None).unwrap();

        let history = load_history(&fx.store, None);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].workout.title, "Day One");
        assert_eq!(history[0].summary.total_sets, 1);
        assert_eq!(history[0].groups.len(), 1);
    }

    #[test]
    fn test_history_display_survives_exercise_deletion() {
        let mut fx = fixture();
        let workout = create_workout(&mut fx.store, &mut fx.session, "Leg Day", None).unwrap();
        let squat_id = fx.store.exercise_by_name("Squat").unwrap().id;
        attach_exercise_set(&mut fx.store, workout.id, squat_id).unwrap();
        finish(&mut fx.store, &mut fx.session, workout.id).unwrap();

        // The snapshotted name keeps history readable after deletion
        fx.store.soft_delete_exercise(squat_id).unwrap();

        let history = load_history(&fx.store, None);
        assert_eq!(history[0].groups[0].exercise_name, "Squat");
        assert_eq!(history[0].summary.exercise_count, 1);
    }

    #[test]
    fn test_load_history_respects_limit() {
        let mut fx = fixture();
        for title in ["One", "Two", "Three"] {
            let workout = create_workout(&mut fx.store, &mut fx.session, title, None).unwrap();
            let squat = fx.store.exercise_by_name("Squat").unwrap().id;
            attach_exercise_set(&mut fx.store, workout.id, squat).unwrap();
            finish(&mut fx.store, &mut fx.session, workout.id).unwrap();
        }

        let history = load_history(&fx.store, Some(2));
        assert_eq!(history.len(), 2);
        // Newest completion first
        assert_eq!(history[0].workout.title, "Three");
    }
}
