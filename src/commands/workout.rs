use serde::Serialize;

use super::{require_progress, AppState};
use crate::aggregation::earliest_uncompleted_day;
use crate::catalog::WorkoutSummary;
use crate::models::DayOfWeek;
use crate::session::SessionRequest;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
  pub day: DayOfWeek,
  pub summary: WorkoutSummary,
  pub completed: bool,
  /// Reps logged when the day is done
  pub total_reps: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlanView {
  pub program: String,
  pub week: u32,
  pub max_week: u32,
  pub days: Vec<DayPlan>,
}

/// The three days of a week of the current program (default: current week)
pub async fn get_week_plan<S: KeyValueStore>(
  state: &AppState<S>,
  week: Option<u32>,
) -> Result<WeekPlanView, String> {
  let progress = require_progress(state).await?;
  let week = week.unwrap_or(progress.current_week);
  let program = progress.current_program;

  if !state.catalog.available_weeks(&program).contains(&week) {
    return Err(format!("{} has no week {}", program, week));
  }

  let history = state.store.get_workout_history().await;
  let days = DayOfWeek::ALL
    .into_iter()
    .map(|day| {
      let done = history.find(week, day);
      DayPlan {
        day,
        summary: state.catalog.workout_summary(&program, week, day),
        completed: done.is_some(),
        total_reps: done.map(|w| w.total_reps),
      }
    })
    .collect();

  Ok(WeekPlanView {
    max_week: state.catalog.max_week(&program),
    program,
    week,
    days,
  })
}

/// Work out which session to open.
///
/// With `resume` and a saved workout, that workout wins. Otherwise the given
/// day (or the next undone day) of the current week is started fresh.
pub async fn session_request_for<S: KeyValueStore>(
  state: &AppState<S>,
  day: Option<DayOfWeek>,
  resume: bool,
) -> Result<SessionRequest, String> {
  if resume {
    if let Some(active) = state.store.get_active_workout().await {
      return Ok(SessionRequest {
        program: active.program_name,
        week: active.week,
        day: active.day,
        resume: true,
      });
    }
  }

  let progress = require_progress(state).await?;
  let day = match day {
    Some(day) => day,
    None => {
      let completion = state.store.get_week_completion_status(progress.current_week).await;
      earliest_uncompleted_day(&completion)
        .ok_or_else(|| format!("Week {} is complete", progress.current_week))?
    }
  };

  Ok(SessionRequest {
    program: progress.current_program,
    week: progress.current_week,
    day,
    resume: false,
  })
}
