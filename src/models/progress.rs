use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workout::{CompletedWorkout, DayOfWeek};

/// Onboarding result: which program and week the athlete is on.
/// Absence of this record means onboarding still has to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
  pub current_program: String,
  pub current_week: u32,
  pub start_date: DateTime<Utc>,
}

impl UserProgress {
  pub fn new(program: &str, start_date: DateTime<Utc>) -> Self {
    Self {
      current_program: program.to_string(),
      current_week: 1,
      start_date,
    }
  }
}

/// Completed workouts, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutHistory {
  pub workouts: Vec<CompletedWorkout>,
}

impl WorkoutHistory {
  pub fn find(&self, week: u32, day: DayOfWeek) -> Option<&CompletedWorkout> {
    self.workouts.iter().find(|w| w.is_for(week, day))
  }

  pub fn contains(&self, week: u32, day: DayOfWeek) -> bool {
    self.find(week, day).is_some()
  }

  /// Replace any entry for the same (week, day), then restore newest-first order
  pub fn upsert(&mut self, workout: CompletedWorkout) {
    self.workouts.retain(|w| !w.is_for(workout.week, workout.day));
    self.workouts.push(workout);
    self.workouts.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
  }

  pub fn week_completion(&self, week: u32) -> WeekCompletion {
    WeekCompletion::new(
      self.contains(week, DayOfWeek::Monday),
      self.contains(week, DayOfWeek::Wednesday),
      self.contains(week, DayOfWeek::Friday),
    )
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCompletion {
  pub monday: bool,
  pub wednesday: bool,
  pub friday: bool,
  pub all_completed: bool,
}

impl WeekCompletion {
  pub fn new(monday: bool, wednesday: bool, friday: bool) -> Self {
    Self {
      monday,
      wednesday,
      friday,
      all_completed: monday && wednesday && friday,
    }
  }

  pub fn is_completed(&self, day: DayOfWeek) -> bool {
    match day {
      DayOfWeek::Monday => self.monday,
      DayOfWeek::Wednesday => self.wednesday,
      DayOfWeek::Friday => self.friday,
    }
  }
}
