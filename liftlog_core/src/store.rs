//! Entity store persistence with file locking.
//!
//! All four record collections live in one JSON document. Mutations are
//! applied to a working copy and the document is atomically replaced on
//! disk, so a save either commits every pending change or none of them.

use crate::{Bodypart, Error, Exercise, ExerciseSet, Result, Workout};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// The persisted record collections
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub bodyparts: Vec<Bodypart>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
}

impl StoreData {
    pub fn workout(&self, id: Uuid) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id && !w.is_deleted)
    }

    pub fn workout_mut(&mut self, id: Uuid) -> Option<&mut Workout> {
        self.workouts
            .iter_mut()
            .find(|w| w.id == id && !w.is_deleted)
    }

    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id && !e.is_deleted)
    }

    pub fn exercise_mut(&mut self, id: Uuid) -> Option<&mut Exercise> {
        self.exercises
            .iter_mut()
            .find(|e| e.id == id && !e.is_deleted)
    }

    pub fn set(&self, id: Uuid) -> Option<&ExerciseSet> {
        self.sets.iter().find(|s| s.id == id && !s.is_deleted)
    }

    pub fn set_mut(&mut self, id: Uuid) -> Option<&mut ExerciseSet> {
        self.sets.iter_mut().find(|s| s.id == id && !s.is_deleted)
    }

    /// Live sets belonging to one (workout, exercise) pair
    pub fn sets_for_pair(&self, workout_id: Uuid, exercise_id: Uuid) -> Vec<&ExerciseSet> {
        self.sets
            .iter()
            .filter(|s| {
                s.workout_id == workout_id && s.exercise_id == exercise_id && !s.is_deleted
            })
            .collect()
    }

    /// Refresh the owning workout's `updated_at` after a child mutation
    pub fn touch_workout(&mut self, id: Uuid) {
        if let Some(workout) = self.workout_mut(id) {
            workout.updated_at = Utc::now();
        }
    }

    /// Hard-delete a workout and every set sharing its id.
    ///
    /// Returns the number of removed sets, or None if the workout was absent.
    pub fn remove_workout_cascade(&mut self, id: Uuid) -> Option<usize> {
        let position = self.workouts.iter().position(|w| w.id == id)?;
        self.workouts.remove(position);

        let before = self.sets.len();
        self.sets.retain(|s| s.workout_id != id);
        Some(before - self.sets.len())
    }
}

/// Durable store for the entity graph
pub struct EntityStore {
    path: PathBuf,
    data: StoreData,
}

impl EntityStore {
    /// Open the store at the given path.
    ///
    /// A missing file yields an empty store. A corrupted file logs a
    /// warning and also yields an empty store rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = Self::load_data(&path)?;
        Ok(Self { path, data })
    }

    fn load_data(path: &Path) -> Result<StoreData> {
        if !path.exists() {
            tracing::info!("No store file found at {:?}, starting empty", path);
            return Ok(StoreData::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open store file {:?}: {}. Starting empty.", path, e);
                return Ok(StoreData::default());
            }
        };

        // Shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock store file {:?}: {}. Starting empty.", path, e);
            return Ok(StoreData::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read store file {:?}: {}. Starting empty.", path, e);
            return Ok(StoreData::default());
        }

        file.unlock()?;

        match serde_json::from_str::<StoreData>(&contents) {
            Ok(data) => {
                tracing::debug!(
                    "Loaded store from {:?}: {} workouts, {} sets, {} exercises",
                    path,
                    data.workouts.len(),
                    data.sets.len(),
                    data.exercises.len()
                );
                Ok(data)
            }
            Err(e) => {
                tracing::warn!("Failed to parse store file {:?}: {}. Starting empty.", path, e);
                Ok(StoreData::default())
            }
        }
    }

    /// Apply a batch of mutations as one transaction.
    ///
    /// The closure runs against a working copy. Only if it succeeds and the
    /// copy is durably written does the in-memory data change; on any
    /// failure both memory and disk keep their previous contents.
    pub fn transact<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreData) -> Result<T>,
    {
        let mut working = self.data.clone();
        let out = f(&mut working)?;
        Self::persist(&self.path, &working)?;
        self.data = working;
        Ok(out)
    }

    /// Atomically write the document: temp file, exclusive lock, fsync, rename.
    fn persist(path: &Path, data: &StoreData) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(data)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved store to {:?}", path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    // ------------------------------------------------------------------
    // Queries (soft-deleted records are excluded from every query)
    // ------------------------------------------------------------------

    /// Bodyparts sorted by name
    pub fn bodyparts_by_name(&self) -> Vec<&Bodypart> {
        let mut bodyparts: Vec<_> = self.data.bodyparts.iter().collect();
        bodyparts.sort_by(|a, b| a.name.cmp(&b.name));
        bodyparts
    }

    pub fn bodypart_by_name(&self, name: &str) -> Option<&Bodypart> {
        self.data
            .bodyparts
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Exercises sorted by name
    pub fn exercises_by_name(&self) -> Vec<&Exercise> {
        let mut exercises: Vec<_> = self
            .data
            .exercises
            .iter()
            .filter(|e| !e.is_deleted)
            .collect();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        exercises
    }

    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.data.exercise(id)
    }

    pub fn exercise_by_name(&self, name: &str) -> Option<&Exercise> {
        self.data
            .exercises
            .iter()
            .find(|e| !e.is_deleted && e.name.eq_ignore_ascii_case(name))
    }

    pub fn workout(&self, id: Uuid) -> Option<&Workout> {
        self.data.workout(id)
    }

    /// Workouts sorted by `updated_at` descending
    pub fn workouts_recent(&self) -> Vec<&Workout> {
        let mut workouts: Vec<_> = self
            .data
            .workouts
            .iter()
            .filter(|w| !w.is_deleted)
            .collect();
        workouts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        workouts
    }

    /// Completed workouts (history), newest completion first
    pub fn completed_workouts(&self) -> Vec<&Workout> {
        let mut workouts: Vec<_> = self
            .data
            .workouts
            .iter()
            .filter(|w| w.completed_at.is_some() && !w.is_deleted)
            .collect();
        workouts.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        workouts
    }

    /// Live sets belonging to a workout
    pub fn sets_for_workout(&self, workout_id: Uuid) -> Vec<&ExerciseSet> {
        self.data
            .sets
            .iter()
            .filter(|s| s.workout_id == workout_id && !s.is_deleted)
            .collect()
    }

    /// Live sets referencing an exercise, across all workouts
    pub fn sets_for_exercise(&self, exercise_id: Uuid) -> Vec<&ExerciseSet> {
        self.data
            .sets
            .iter()
            .filter(|s| s.exercise_id == exercise_id && !s.is_deleted)
            .collect()
    }

    pub fn set(&self, id: Uuid) -> Option<&ExerciseSet> {
        self.data.set(id)
    }

    // ------------------------------------------------------------------
    // Deletes
    // ------------------------------------------------------------------

    /// Soft-delete an exercise.
    ///
    /// Historical sets keep their snapshotted exercise name, so this
    /// proceeds even when the exercise has been performed.
    pub fn soft_delete_exercise(&mut self, id: Uuid) -> Result<()> {
        self.transact(|data| {
            let exercise = data
                .exercise_mut(id)
                .ok_or_else(|| Error::Store(format!("unknown exercise {}", id)))?;
            exercise.is_deleted = true;
            exercise.updated_at = Utc::now();
            Ok(())
        })
    }

    /// Soft-delete a single set, leaving a gap in the order sequence.
    pub fn soft_delete_set(&mut self, id: Uuid) -> Result<()> {
        self.transact(|data| {
            let workout_id = {
                let set = data
                    .set_mut(id)
                    .ok_or_else(|| Error::Store(format!("unknown set {}", id)))?;
                set.is_deleted = true;
                set.updated_at = Utc::now();
                set.workout_id
            };
            data.touch_workout(workout_id);
            Ok(())
        })
    }

    /// Hard-delete a workout and cascade to its sets in one transaction.
    pub fn delete_workout(&mut self, id: Uuid) -> Result<usize> {
        self.transact(|data| {
            data.remove_workout_cascade(id)
                .ok_or_else(|| Error::Store(format!("unknown workout {}", id)))
        })
    }
}
