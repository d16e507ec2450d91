//! Workout builder: the orchestrating mutator of the entity graph.
//!
//! Creates workouts, attaches ordered sets, updates set values, toggles
//! completion, and drives the finish/cancel lifecycle. Every operation is
//! one store transaction; session registration happens after the store
//! write succeeds, so a failed save never leaves a dangling session pointer.

use crate::{EntityStore, Error, ExerciseSet, Result, SessionManager, Workout};
use chrono::Utc;
use uuid::Uuid;

/// Create a workout and register it as the active session.
///
/// On a failed store write nothing is registered and the caller keeps its
/// unsaved form state.
pub fn create_workout(
    store: &mut EntityStore,
    session: &mut SessionManager,
    title: &str,
    notes: Option<&str>,
) -> Result<Workout> {
    let notes = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);

    let created = store.transact(|data| {
        let workout = Workout::new(title, notes);
        data.workouts.push(workout.clone());
        Ok(workout)
    })?;

    session.start_workout(created.id)?;
    tracing::info!("Created workout '{}' ({})", created.title, created.id);
    Ok(created)
}

/// Append a blank set for an exercise.
///
/// `order` is the count of existing live sets for the (workout, exercise)
/// pair, so repeated attachment yields the dense sequence 0..n-1.
pub fn attach_exercise_set(
    store: &mut EntityStore,
    workout_id: Uuid,
    exercise_id: Uuid,
) -> Result<ExerciseSet> {
    insert_set(store, workout_id, exercise_id, |data| {
        data.sets_for_pair(workout_id, exercise_id).len() as u32
    })
}

/// Append a blank set after the highest existing order.
///
/// Takes max + 1 rather than the count, so gaps left by deleted sets do
/// not produce a colliding order.
pub fn add_following_set(
    store: &mut EntityStore,
    workout_id: Uuid,
    exercise_id: Uuid,
) -> Result<ExerciseSet> {
    insert_set(store, workout_id, exercise_id, |data| {
        data.sets_for_pair(workout_id, exercise_id)
            .iter()
            .map(|s| s.order)
            .max()
            .map_or(0, |max| max + 1)
    })
}

fn insert_set<F>(
    store: &mut EntityStore,
    workout_id: Uuid,
    exercise_id: Uuid,
    next_order: F,
) -> Result<ExerciseSet>
where
    F: FnOnce(&crate::StoreData) -> u32,
{
    store.transact(|data| {
        let exercise = data
            .exercise(exercise_id)
            .ok_or_else(|| Error::Store(format!("unknown exercise {}", exercise_id)))?
            .clone();
        if data.workout(workout_id).is_none() {
            return Err(Error::Store(format!("unknown workout {}", workout_id)));
        }

        let order = next_order(data);
        let set = ExerciseSet::new(&exercise, workout_id, order);
        data.sets.push(set.clone());
        data.touch_workout(workout_id);

        tracing::debug!(
            "Attached set {} of '{}' to workout {}",
            order + 1,
            exercise.name,
            workout_id
        );
        Ok(set)
    })
}

/// Update a set's weight and reps from raw text input.
///
/// Non-numeric or negative input coerces to zero, mirroring a cleared
/// field rather than rejecting the edit.
pub fn update_set_values(
    store: &mut EntityStore,
    set_id: Uuid,
    weight_text: &str,
    reps_text: &str,
) -> Result<ExerciseSet> {
    let weight = parse_weight(weight_text);
    let reps = parse_reps(reps_text);

    store.transact(|data| {
        let set = data
            .set_mut(set_id)
            .ok_or_else(|| Error::Store(format!("unknown set {}", set_id)))?;
        set.weight = weight;
        set.reps = reps;
        set.updated_at = Utc::now();
        Ok(set.clone())
    })
}

fn parse_weight(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(0.0)
}

fn parse_reps(text: &str) -> u32 {
    text.trim().parse::<u32>().unwrap_or(0)
}

/// Flip a set's completion flag.
///
/// Completion requires weight > 0 and reps > 0; without them the toggle is
/// a no-op and the unchanged set is returned. Toggling off always works.
pub fn toggle_completion(store: &mut EntityStore, set_id: Uuid) -> Result<ExerciseSet> {
    store.transact(|data| {
        let set = data
            .set_mut(set_id)
            .ok_or_else(|| Error::Store(format!("unknown set {}", set_id)))?;

        if !set.is_completed && !set.can_complete() {
            tracing::debug!("Set {} not completable yet (weight/reps missing)", set_id);
            return Ok(set.clone());
        }

        set.is_completed = !set.is_completed;
        set.updated_at = Utc::now();
        Ok(set.clone())
    })
}

/// Persist pending title/notes edits, then background the session.
pub fn minimize(
    store: &mut EntityStore,
    session: &mut SessionManager,
    workout_id: Uuid,
    title: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    if title.is_some() || notes.is_some() {
        store.transact(|data| {
            let workout = data
                .workout_mut(workout_id)
                .ok_or_else(|| Error::Store(format!("unknown workout {}", workout_id)))?;
            if let Some(title) = title {
                workout.title = title.to_string();
            }
            if let Some(notes) = notes {
                workout.notes = if notes.trim().is_empty() {
                    None
                } else {
                    Some(notes.to_string())
                };
            }
            workout.updated_at = Utc::now();
            Ok(())
        })?;
    }

    session.minimize_workout()
}

/// Abandon a workout.
///
/// An empty workout (zero live sets) is hard-deleted; one with sets stays
/// persisted as incomplete-but-kept. The session is cleared either way.
pub fn cancel(store: &mut EntityStore, session: &mut SessionManager, workout_id: Uuid) -> Result<()> {
    let delete_result = if store.sets_for_workout(workout_id).is_empty() {
        tracing::info!("Cancelling empty workout {}, discarding", workout_id);
        store
            .transact(|data| {
                data.remove_workout_cascade(workout_id);
                Ok(())
            })
    } else {
        tracing::info!("Cancelling workout {} with sets, keeping record", workout_id);
        Ok(())
    };

    session.complete_workout()?;
    delete_result
}

/// Finish a workout: deactivate, stamp completion, clear the session.
pub fn finish(
    store: &mut EntityStore,
    session: &mut SessionManager,
    workout_id: Uuid,
) -> Result<Workout> {
    let finished = store.transact(|data| {
        let workout = data
            .workout_mut(workout_id)
            .ok_or_else(|| Error::Store(format!("unknown workout {}", workout_id)))?;
        workout.is_active = false;
        let now = Utc::now();
        workout.completed_at = Some(now);
        workout.updated_at = now;
        Ok(workout.clone())
    })?;

    session.complete_workout()?;
    tracing::info!("Finished workout '{}' ({})", finished.title, finished.id);
    Ok(finished)
}
