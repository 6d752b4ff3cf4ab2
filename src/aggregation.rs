//! Derived state for the home screen: next workout, week completion,
//! lifetime totals. Always recomputed from persisted history.

use serde::Serialize;

use crate::catalog::ProgramCatalog;
use crate::models::{DayOfWeek, UserProgress, WeekCompletion, WorkoutHistory};
use crate::progress::ProgressStore;
use crate::storage::KeyValueStore;

/// First incomplete day in program order (Mon, Wed, Fri)
pub fn earliest_uncompleted_day(completion: &WeekCompletion) -> Option<DayOfWeek> {
  DayOfWeek::ALL.into_iter().find(|day| !completion.is_completed(*day))
}

pub fn lifetime_total_reps(history: &WorkoutHistory) -> u64 {
  history.workouts.iter().map(|w| w.total_reps).sum()
}

/// A finished week can move on unless it is already the program's last
pub fn can_advance_week(progress: &UserProgress, completion: &WeekCompletion, max_week: u32) -> bool {
  completion.all_completed && progress.current_week < max_week
}

/// Seconds as `M:SS`
pub fn format_duration(seconds: u64) -> String {
  format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// ---------------------------------------------------------------------------
/// Home Overview
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeOverview {
  pub progress: UserProgress,
  pub max_week: u32,
  pub week_completion: WeekCompletion,
  /// Day of a resumable workout, if one is in progress
  pub in_progress_day: Option<DayOfWeek>,
  /// Suggested next workout (only when nothing is in progress)
  pub next_up: Option<DayOfWeek>,
  pub can_advance: bool,
  pub total_reps: u64,
}

/// Build the home overview. None means onboarding has not happened yet.
///
/// An active workout whose (week, day) is already in history is stale (it
/// was finished elsewhere or re-done) and is cleared here.
pub async fn load_home_overview<S: KeyValueStore>(
  store: &ProgressStore<S>,
  catalog: &ProgramCatalog,
) -> Option<HomeOverview> {
  let progress = store.get_user_progress().await?;
  let history = store.get_workout_history().await;
  let week_completion = history.week_completion(progress.current_week);

  let in_progress_day = match store.get_active_workout().await {
    Some(active) if history.contains(active.week, active.day) => {
      tracing::info!(
        "Clearing stale active workout for week {} {}",
        active.week,
        active.day
      );
      if let Err(e) = store.clear_active_workout().await {
        tracing::error!("Error clearing active workout: {}", e);
      }
      None
    }
    Some(active) => Some(active.day),
    None => None,
  };

  let next_up = if in_progress_day.is_none() {
    earliest_uncompleted_day(&week_completion)
  } else {
    None
  };

  let max_week = catalog.max_week(&progress.current_program);

  Some(HomeOverview {
    can_advance: can_advance_week(&progress, &week_completion, max_week),
    total_reps: lifetime_total_reps(&history),
    max_week,
    week_completion,
    in_progress_day,
    next_up,
    progress,
  })
}
