use super::{require_progress, AppState};
use crate::aggregation::{can_advance_week, load_home_overview, HomeOverview};
use crate::models::{CompletedWorkout, DayOfWeek, UserProgress, WorkoutHistory};
use crate::storage::KeyValueStore;

/// Home screen state; None until onboarding is done
pub async fn get_home_overview<S: KeyValueStore>(state: &AppState<S>) -> Result<Option<HomeOverview>, String> {
  Ok(load_home_overview(&state.store, &state.catalog).await)
}

pub async fn get_history<S: KeyValueStore>(state: &AppState<S>) -> Result<WorkoutHistory, String> {
  Ok(state.store.get_workout_history().await)
}

pub async fn get_completed_workout<S: KeyValueStore>(
  state: &AppState<S>,
  week: u32,
  day: DayOfWeek,
) -> Result<Option<CompletedWorkout>, String> {
  Ok(state.store.get_completed_workout(week, day).await)
}

/// Move to the next week once all three days of the current one are done
pub async fn advance_week<S: KeyValueStore>(state: &AppState<S>) -> Result<UserProgress, String> {
  let mut progress = require_progress(state).await?;
  let completion = state.store.get_week_completion_status(progress.current_week).await;
  let max_week = state.catalog.max_week(&progress.current_program);

  if !can_advance_week(&progress, &completion, max_week) {
    return Err(if completion.all_completed {
      format!("Week {} is the last week of {}", progress.current_week, progress.current_program)
    } else {
      format!("Finish every workout in week {} first", progress.current_week)
    });
  }

  progress.current_week += 1;
  save(state, &progress).await?;
  tracing::info!("Advanced to week {}", progress.current_week);
  Ok(progress)
}

/// Go back to any week already reached
pub async fn rewind_week<S: KeyValueStore>(state: &AppState<S>, week: u32) -> Result<UserProgress, String> {
  let mut progress = require_progress(state).await?;

  if week == 0 || week > progress.current_week {
    return Err(format!("Week must be between 1 and {}", progress.current_week));
  }

  progress.current_week = week;
  save(state, &progress).await?;
  tracing::info!("Moved back to week {}", week);
  Ok(progress)
}

/// Wipe progress, history and any active workout
pub async fn reset_progress<S: KeyValueStore>(state: &AppState<S>) -> Result<(), String> {
  state
    .store
    .reset_all()
    .await
    .map_err(|e| format!("Failed to reset progress: {}", e))?;
  tracing::info!("Progress reset");
  Ok(())
}

async fn save<S: KeyValueStore>(state: &AppState<S>, progress: &UserProgress) -> Result<(), String> {
  state
    .store
    .save_user_progress(progress)
    .await
    .map_err(|e| format!("Failed to save progress: {}", e))
}
