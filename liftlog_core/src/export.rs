//! CSV export of completed workout history.
//!
//! Rows are appended with header handling and fsynced before returning, so
//! a reported success means the data is on disk.

use crate::{EntityStore, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// One exported set
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    workout: String,
    completed_at: String,
    exercise: String,
    set: u32,
    weight: f64,
    reps: u32,
    completed: bool,
}

/// Export every set of every completed workout to CSV.
///
/// Appends to an existing file (headers are written only when the file is
/// empty) and returns the number of rows written.
pub fn export_history_csv(store: &EntityStore, csv_path: &Path) -> Result<usize> {
    let completed = store.completed_workouts();
    if completed.is_empty() {
        tracing::info!("No completed workouts to export");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut rows = 0;
    for workout in completed {
        let completed_at = workout
            .completed_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        for group in crate::history::group_sets_by_exercise(store.sets_for_workout(workout.id)) {
            for set in &group.sets {
                writer.serialize(CsvRow {
                    workout: workout.title.clone(),
                    completed_at: completed_at.clone(),
                    exercise: group.exercise_name.clone(),
                    set: set.order + 1,
                    weight: set.weight,
                    reps: set.reps,
                    completed: set.is_completed,
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} set rows to {:?}", rows, csv_path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{attach_exercise_set, create_workout, finish, toggle_completion, update_set_values},
        seed_if_empty, EntityStore, SessionManager,
    };

    fn finished_workout(store: &mut EntityStore, session: &mut SessionManager, title: &str) {
        let workout = create_workout(store, session, title, None).unwrap();
        let squat = store.exercise_by_name("Squat").unwrap().id;
        let set = attach_exercise_set(store, workout.id, squat).unwrap();
        attach_exercise_set(store, workout.id, squat).unwrap();
        update_set_values(store, set.id, "135", "5").unwrap();
        toggle_completion(store, set.id).unwrap();
        finish(store, session, workout.id).unwrap();
    }

    #[test]
    fn test_export_writes_one_row_per_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::open(dir.path().join("store.json")).unwrap();
        seed_if_empty(&mut store).unwrap();
        let mut session = SessionManager::load(dir.path().join("session.json"));

        finished_workout(&mut store, &mut session, "Leg Day");

        let csv_path = dir.path().join("history.csv");
        let rows = export_history_csv(&store, &csv_path).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.contains("workout,completed_at,exercise,set,weight,reps,completed"));
        assert!(contents.contains("Leg Day"));
        assert!(contents.contains("Squat"));
    }

    #[test]
    fn test_export_appends_without_duplicate_headers() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::open(dir.path().join("store.json")).unwrap();
        seed_if_empty(&mut store).unwrap();
        let mut session = SessionManager::load(dir.path().join("session.json"));

        finished_workout(&mut store, &mut session, "Leg Day");

        let csv_path = dir.path().join("history.csv");
        export_history_csv(&store, &csv_path).unwrap();
        export_history_csv(&store, &csv_path).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let header_count = contents
            .lines()
            .filter(|line| line.starts_with("workout,"))
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(contents.lines().count(), 1 + 4);
    }

    #[test]
    fn test_export_empty_history_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = EntityStore::open(dir.path().join("store.json")).unwrap();

        let csv_path = dir.path().join("history.csv");
        let rows = export_history_csv(&store, &csv_path).unwrap();
        assert_eq!(rows, 0);
        assert!(!csv_path.exists());
    }
}
