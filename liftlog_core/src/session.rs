//! Active-workout session tracking, durable across restarts.
//!
//! At most one workout is "active" at a time. The tracker persists
//! `active_workout_id` and `is_minimized` to a small key-value document
//! outside the entity store, written atomically on every transition and
//! reloaded at construction, so an in-progress workout survives process
//! restarts.

use crate::{EntityStore, Error, Result, Workout};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Visibility state of the session tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No active workout
    Idle,
    /// A workout is active and on screen
    InProgress,
    /// A workout is active but backgrounded
    Minimized,
}

/// The two persisted keys
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct SessionState {
    active_workout_id: Option<Uuid>,
    is_minimized: bool,
}

/// Restart-durable tracker of the workout currently being performed.
///
/// Explicitly constructed (one per running app) rather than a process-wide
/// singleton; callers pass it alongside the store.
pub struct SessionManager {
    path: PathBuf,
    state: SessionState,
}

impl SessionManager {
    /// Load session state from a file.
    ///
    /// Missing or corrupted files yield the idle state with a warning;
    /// a lost session pointer is recoverable, a failed startup is not.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load_state(&path);
        Self { path, state }
    }

    fn load_state(path: &Path) -> SessionState {
        if !path.exists() {
            tracing::info!("No session file found, starting idle");
            return SessionState::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open session file {:?}: {}. Starting idle.", path, e);
                return SessionState::default();
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock session file {:?}: {}. Starting idle.", path, e);
            return SessionState::default();
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read = reader.read_to_string(&mut contents);
        let _ = file.unlock();

        if let Err(e) = read {
            tracing::warn!("Failed to read session file {:?}: {}. Starting idle.", path, e);
            return SessionState::default();
        }

        match serde_json::from_str::<SessionState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded session state from {:?}", path);
                state
            }
            Err(e) => {
                tracing::warn!("Failed to parse session file {:?}: {}. Starting idle.", path, e);
                SessionState::default()
            }
        }
    }

    /// Atomically persist both keys.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "session path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&self.state)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved session state to {:?}", self.path);
        Ok(())
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.state.active_workout_id, self.state.is_minimized) {
            (None, _) => SessionPhase::Idle,
            (Some(_), false) => SessionPhase::InProgress,
            (Some(_), true) => SessionPhase::Minimized,
        }
    }

    pub fn active_workout_id(&self) -> Option<Uuid> {
        self.state.active_workout_id
    }

    pub fn is_minimized(&self) -> bool {
        self.state.is_minimized
    }

    pub fn has_active_workout(&self) -> bool {
        self.state.active_workout_id.is_some()
    }

    /// Mark a workout as the active session.
    ///
    /// Starting while another workout is active overwrites the previous
    /// pointer without finishing that workout; the orphaned id is logged.
    pub fn start_workout(&mut self, workout_id: Uuid) -> Result<()> {
        if let Some(previous) = self.state.active_workout_id {
            if previous != workout_id {
                tracing::warn!(
                    "Starting workout {} while {} was still active; previous session pointer dropped",
                    workout_id,
                    previous
                );
            }
        }

        self.state.active_workout_id = Some(workout_id);
        self.state.is_minimized = false;
        self.save()
    }

    /// InProgress -> Minimized. A no-op from any other phase.
    pub fn minimize_workout(&mut self) -> Result<()> {
        if self.phase() != SessionPhase::InProgress {
            tracing::debug!("minimize_workout ignored in phase {:?}", self.phase());
            return Ok(());
        }
        self.state.is_minimized = true;
        self.save()
    }

    /// Minimized -> InProgress. A no-op from any other phase.
    pub fn resume_workout(&mut self) -> Result<()> {
        if self.phase() != SessionPhase::Minimized {
            tracing::debug!("resume_workout ignored in phase {:?}", self.phase());
            return Ok(());
        }
        self.state.is_minimized = false;
        self.save()
    }

    /// Clear the active session. Used for both completion and cancellation.
    /// A no-op when idle.
    pub fn complete_workout(&mut self) -> Result<()> {
        if self.phase() == SessionPhase::Idle {
            tracing::debug!("complete_workout ignored while idle");
            return Ok(());
        }
        self.state.active_workout_id = None;
        self.state.is_minimized = false;
        self.save()
    }

    /// Resolve the active id against the store.
    ///
    /// A stale pointer (workout deleted or already finished elsewhere)
    /// yields None; the caller falls back to "no active workout".
    pub fn get_active_workout<'a>(&self, store: &'a EntityStore) -> Option<&'a Workout> {
        let id = self.state.active_workout_id?;
        let workout = store.workout(id).filter(|w| w.is_active);
        if workout.is_none() {
            tracing::debug!("Active workout id {} is stale", id);
        }
        workout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Workout;

    fn temp_session() -> (tempfile::TempDir, SessionManager) {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionManager::load(dir.path().join("session.json"));
        (dir, session)
    }

    #[test]
    fn test_load_nonexistent_is_idle() {
        let (_dir, session) = temp_session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.has_active_workout());
    }

    #[test]
    fn test_start_workout_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let id = Uuid::new_v4();

        let mut session = SessionManager::load(&path);
        session.start_workout(id).unwrap();

        // Simulated process restart
        let reloaded = SessionManager::load(&path);
        assert_eq!(reloaded.active_workout_id(), Some(id));
        assert!(!reloaded.is_minimized());
        assert_eq!(reloaded.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn test_minimize_and_resume() {
        let (_dir, mut session) = temp_session();
        let id = Uuid::new_v4();

        session.start_workout(id).unwrap();
        session.minimize_workout().unwrap();
        assert_eq!(session.phase(), SessionPhase::Minimized);
        assert_eq!(session.active_workout_id(), Some(id));

        session.resume_workout().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn test_complete_clears_state() {
        let (_dir, mut session) = temp_session();
        session.start_workout(Uuid::new_v4()).unwrap();
        session.minimize_workout().unwrap();

        session.complete_workout().unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.active_workout_id().is_none());
        assert!(!session.is_minimized());
    }

    #[test]
    fn test_invalid_transitions_leave_state_unchanged() {
        let (_dir, mut session) = temp_session();

        // From Idle, only start_workout transitions
        session.minimize_workout().unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);
        session.resume_workout().unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);
        session.complete_workout().unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);

        // From InProgress, resume is not a transition
        let id = Uuid::new_v4();
        session.start_workout(id).unwrap();
        session.resume_workout().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.active_workout_id(), Some(id));
    }

    #[test]
    fn test_start_overwrites_previous_active() {
        let (_dir, mut session) = temp_session();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        session.start_workout(first).unwrap();
        session.minimize_workout().unwrap();
        session.start_workout(second).unwrap();

        assert_eq!(session.active_workout_id(), Some(second));
        assert!(!session.is_minimized());
    }

    #[test]
    fn test_corrupted_session_file_starts_idle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let session = SessionManager::load(&path);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_stale_id_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("store.json");
        let session_path = dir.path().join("session.json");

        let mut store = EntityStore::open(&store_path).unwrap();
        let workout = Workout::new("Leg Day", None);
        let id = workout.id;
        store
            .transact(|data| {
                data.workouts.push(workout.clone());
                Ok(())
            })
            .unwrap();

        let mut session = SessionManager::load(&session_path);
        session.start_workout(id).unwrap();
        assert!(session.get_active_workout(&store).is_some());

        // Finish the workout behind the session's back
        store
            .transact(|data| {
                let w = data.workout_mut(id).unwrap();
                w.is_active = false;
                w.completed_at = Some(chrono::Utc::now());
                Ok(())
            })
            .unwrap();

        assert!(session.get_active_workout(&store).is_none());

        // Deleted entirely is equally recoverable
        store.delete_workout(id).unwrap();
        assert!(session.get_active_workout(&store).is_none());
    }
}
