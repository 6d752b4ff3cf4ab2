//! Progress store: user progress, workout history and the active-workout slot.
//!
//! Reads never fail. Missing or undecodable values come back as `None` or an
//! empty history (a corrupted record is treated like a first run). Writes
//! return the backend error so callers can log it; none of them are fatal.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{ActiveWorkout, CompletedWorkout, DayOfWeek, UserProgress, WeekCompletion, WorkoutHistory};
use crate::storage::{KeyValueStore, StoreError, StoreOp};

/// ---------------------------------------------------------------------------
/// Storage Keys
/// ---------------------------------------------------------------------------

pub const USER_PROGRESS_KEY: &str = "user_progress";
pub const WORKOUT_HISTORY_KEY: &str = "workout_history";
pub const ACTIVE_WORKOUT_KEY: &str = "active_workout";

pub struct ProgressStore<S> {
  store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn backend(&self) -> &S {
    &self.store
  }

  // -------------------------------------------------------------------------
  // User Progress
  // -------------------------------------------------------------------------

  pub async fn get_user_progress(&self) -> Option<UserProgress> {
    self.read_json(USER_PROGRESS_KEY).await
  }

  pub async fn save_user_progress(&self, progress: &UserProgress) -> Result<(), StoreError> {
    self.write_json(USER_PROGRESS_KEY, progress).await
  }

  /// Create progress on `program` week 1 unless some already exists
  pub async fn initialize_default_progress(
    &self,
    program: &str,
    now: DateTime<Utc>,
  ) -> Result<UserProgress, StoreError> {
    if let Some(existing) = self.get_user_progress().await {
      return Ok(existing);
    }
    let progress = UserProgress::new(program, now);
    self.save_user_progress(&progress).await?;
    Ok(progress)
  }

  // -------------------------------------------------------------------------
  // Workout History
  // -------------------------------------------------------------------------

  pub async fn get_workout_history(&self) -> WorkoutHistory {
    self.read_json(WORKOUT_HISTORY_KEY).await.unwrap_or_default()
  }

  /// Insert a completed workout, replacing any earlier one for the same
  /// (week, day). The whole history is rewritten.
  pub async fn add_completed_workout(&self, workout: &CompletedWorkout) -> Result<(), StoreError> {
    let mut history = self.get_workout_history().await;
    history.upsert(workout.clone());
    self.write_json(WORKOUT_HISTORY_KEY, &history).await
  }

  /// Add a completed workout and empty the active slot in one batch
  pub async fn record_completion(&self, workout: &CompletedWorkout) -> Result<(), StoreError> {
    let mut history = self.get_workout_history().await;
    history.upsert(workout.clone());

    self
      .store
      .write_batch(vec![
        StoreOp::Set {
          key: WORKOUT_HISTORY_KEY.to_string(),
          value: serde_json::to_string(&history)?,
        },
        StoreOp::Delete {
          key: ACTIVE_WORKOUT_KEY.to_string(),
        },
      ])
      .await
  }

  pub async fn get_completed_workout(&self, week: u32, day: DayOfWeek) -> Option<CompletedWorkout> {
    self.get_workout_history().await.find(week, day).cloned()
  }

  pub async fn is_workout_completed(&self, week: u32, day: DayOfWeek) -> bool {
    self.get_completed_workout(week, day).await.is_some()
  }

  pub async fn get_week_completion_status(&self, week: u32) -> WeekCompletion {
    WeekCompletion::new(
      self.is_workout_completed(week, DayOfWeek::Monday).await,
      self.is_workout_completed(week, DayOfWeek::Wednesday).await,
      self.is_workout_completed(week, DayOfWeek::Friday).await,
    )
  }

  // -------------------------------------------------------------------------
  // Active Workout
  // -------------------------------------------------------------------------

  pub async fn get_active_workout(&self) -> Option<ActiveWorkout> {
    self.read_json(ACTIVE_WORKOUT_KEY).await
  }

  pub async fn save_active_workout(&self, workout: &ActiveWorkout) -> Result<(), StoreError> {
    self.write_json(ACTIVE_WORKOUT_KEY, workout).await
  }

  pub async fn clear_active_workout(&self) -> Result<(), StoreError> {
    self.store.delete(ACTIVE_WORKOUT_KEY).await
  }

  /// Forget everything: progress, history and any active workout
  pub async fn reset_all(&self) -> Result<(), StoreError> {
    self.store.clear_all().await
  }

  // -------------------------------------------------------------------------
  // JSON helpers
  // -------------------------------------------------------------------------

  async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let raw = match self.store.get(key).await {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        tracing::error!("Error reading {}: {}", key, e);
        return None;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(value) => Some(value),
      Err(e) => {
        tracing::warn!("Discarding unreadable {}: {}", key, e);
        None
      }
    }
  }

  async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    self.store.set(key, &json).await
  }
}
