//! Test utilities shared by the unit tests
//!
//! - Database setup/teardown
//! - Mock catalog and workout factories
//! - A store backend that always fails

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::catalog::ProgramCatalog;
use crate::models::{ActiveWorkout, CompletedSet, CompletedWorkout, DayOfWeek, WorkoutSet};
use crate::reps::RepTarget;
use crate::storage::{KeyValueStore, StoreError};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database with migrations applied
///
/// Uses max_connections(1) so every query sees the same in-memory database
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Backend whose every operation fails
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
  async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
    Err(StoreError::Unavailable("get".into()))
  }

  async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
    Err(StoreError::Unavailable("set".into()))
  }

  async fn delete(&self, _key: &str) -> Result<(), StoreError> {
    Err(StoreError::Unavailable("delete".into()))
  }

  async fn clear_all(&self) -> Result<(), StoreError> {
    Err(StoreError::Unavailable("clear_all".into()))
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

const MOCK_CATALOG: &str = r#"{
  "programs": [
    {
      "name": "Beginner 1",
      "description": "Mock starter program",
      "initialTestMin": 1,
      "initialTestMax": 3,
      "restBetweenSets": 45,
      "weeks": [
        {"week": 1, "monday": [10, 10, "8+"], "wednesday": [10, 12, "10+"], "friday": [12, 12, "10+"]},
        {"week": 2, "monday": [12, 12, "10+"], "wednesday": [12, 14, "12+"], "friday": [14, 14, "12+"]}
      ]
    },
    {
      "name": "Beginner 2",
      "initialTestMin": 4,
      "initialTestMax": null,
      "restBetweenSets": 60,
      "weeks": [
        {"week": 1, "monday": [15, 15, "12+"], "wednesday": [15, 17, "15+"]}
      ]
    }
  ]
}"#;

/// Two-program catalog: "Beginner 1" (1..=3, 45s rest, weeks 1-2) and an
/// open-ended "Beginner 2" (4..) whose week 1 has no Friday
pub fn mock_catalog() -> ProgramCatalog {
  ProgramCatalog::from_json(MOCK_CATALOG).expect("Mock catalog should validate")
}

pub fn datetime_minutes_ago(minutes: i64) -> DateTime<Utc> {
  Utc::now() - Duration::minutes(minutes)
}

/// Fresh week 1 workout for "Beginner 1": sets 10, 10, 8+
pub fn mock_active_workout(day: DayOfWeek) -> ActiveWorkout {
  let sets = vec![
    WorkoutSet {
      set_number: 1,
      target_reps: RepTarget::Fixed(10),
    },
    WorkoutSet {
      set_number: 2,
      target_reps: RepTarget::Fixed(10),
    },
    WorkoutSet {
      set_number: 3,
      target_reps: RepTarget::Minimum(8),
    },
  ];
  ActiveWorkout::new("Beginner 1", 1, day, 45, sets, datetime_minutes_ago(10))
}

/// Finished "Beginner 1" workout of 10, 10, 11 reps
pub fn mock_completed_workout(week: u32, day: DayOfWeek, completed_at: DateTime<Utc>) -> CompletedWorkout {
  let targets = [RepTarget::Fixed(10), RepTarget::Fixed(10), RepTarget::Minimum(8)];
  let actual = [10, 10, 11];
  let sets: Vec<CompletedSet> = targets
    .iter()
    .zip(actual)
    .enumerate()
    .map(|(idx, (target, reps))| CompletedSet {
      set_number: idx as u32 + 1,
      target_reps: *target,
      actual_reps: reps,
      completed_at: completed_at - Duration::minutes(3 - idx as i64),
    })
    .collect();

  CompletedWorkout {
    id: format!("workout-{}-{}", week, day.as_str()),
    program_name: "Beginner 1".to_string(),
    week,
    day,
    completed_at,
    total_reps: actual.iter().map(|&reps| u64::from(reps)).sum(),
    sets,
    duration_seconds: 420,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_test_db() {
    let pool = setup_test_db().await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
      .fetch_one(&pool)
      .await
      .expect("kv_store table should exist");
    assert_eq!(count, 0);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_catalog_shape() {
    let catalog = mock_catalog();
    assert_eq!(catalog.programs().len(), 2);
    assert_eq!(catalog.max_week("Beginner 1"), 2);
    assert!(catalog.load_workout_for_day("Beginner 2", 1, DayOfWeek::Friday).is_empty());
  }

  #[test]
  fn test_mock_completed_workout_totals() {
    let workout = mock_completed_workout(2, DayOfWeek::Friday, Utc::now());
    assert_eq!(workout.total_reps, 31);
    assert_eq!(workout.sets.len(), 3);
    assert!(workout.sets.iter().all(|s| s.completed_at <= workout.completed_at));
  }
}
