//! Core entity types for the LiftLog workout tracker.
//!
//! This module defines the entity graph persisted by the store:
//! - Bodyparts (muscle-group categories)
//! - Exercises (named movements, optionally tagged with a bodypart)
//! - Workouts (one training session, active/completed lifecycle)
//! - Exercise sets (weight x reps, ordered among same-exercise sets)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder fields written for an external cloud-sync collaborator.
///
/// The core records these but never interprets them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub cloud_record_id: Option<String>,
    pub last_sync_date: Option<DateTime<Utc>>,
}

/// A muscle-group category used to classify exercises
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bodypart {
    pub id: Uuid,
    pub name: String,
}

impl Bodypart {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A named movement (e.g. "Barbell Bench Press")
///
/// `bodypart_id` is a weak reference; exercises may be uncategorized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub bodypart_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    #[serde(default)]
    pub sync: SyncMetadata,
}

impl Exercise {
    pub fn new(name: impl Into<String>, bodypart_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bodypart_id,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            sync: SyncMetadata::default(),
        }
    }
}

/// One training session
///
/// Created active; becomes inactive with `completed_at` set when finished.
/// Its sets are child records keyed by `workout_id` and are removed with it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    #[serde(default)]
    pub sync: SyncMetadata,
}

impl Workout {
    pub fn new(title: impl Into<String>, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            date: now,
            notes,
            is_active: true,
            completed_at: None,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            sync: SyncMetadata::default(),
        }
    }
}

/// One performed set of an exercise within a workout
///
/// `order` is 0-based per (workout, exercise) pair. `exercise_name` is
/// snapshotted at creation so history display survives exercise deletion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub weight: f64,
    pub reps: u32,
    pub order: u32,
    pub is_completed: bool,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub workout_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    #[serde(default)]
    pub sync: SyncMetadata,
}

impl ExerciseSet {
    pub fn new(exercise: &Exercise, workout_id: Uuid, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            weight: 0.0,
            reps: 0,
            order,
            is_completed: false,
            exercise_id: exercise.id,
            exercise_name: exercise.name.clone(),
            workout_id,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            sync: SyncMetadata::default(),
        }
    }

    /// Completion precondition: both weight and reps must be entered.
    pub fn can_complete(&self) -> bool {
        self.weight > 0.0 && self.reps > 0
    }
}
