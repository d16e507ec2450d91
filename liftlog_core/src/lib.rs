#![forbid(unsafe_code)]

//! Core domain model and business logic for the LiftLog workout tracker.
//!
//! This crate provides:
//! - Entity types (bodyparts, exercises, workouts, exercise sets)
//! - A transactional, file-backed entity store
//! - Default exercise library seeding
//! - Restart-durable active-workout session tracking
//! - The workout builder (set ordering, completion, finish/cancel)
//! - History queries and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod seed;
pub mod session;
pub mod builder;
pub mod history;
pub mod export;
pub mod billing;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{EntityStore, StoreData};
pub use seed::{seed_if_empty, SeedReport};
pub use session::{SessionManager, SessionPhase};
pub use billing::{Subscription, SubscriptionTier};
pub use history::{group_sets_by_exercise, load_history, ExerciseGroup, HistoryEntry, WorkoutSummary};
pub use export::export_history_csv;
