use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::reps::RepTarget;

/// Scheduled training days, in program order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
  Monday,
  Wednesday,
  Friday,
}

impl DayOfWeek {
  pub const ALL: [DayOfWeek; 3] = [DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Friday];

  pub fn as_str(&self) -> &'static str {
    match self {
      DayOfWeek::Monday => "monday",
      DayOfWeek::Wednesday => "wednesday",
      DayOfWeek::Friday => "friday",
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      DayOfWeek::Monday => "Monday",
      DayOfWeek::Wednesday => "Wednesday",
      DayOfWeek::Friday => "Friday",
    }
  }

  pub fn short_name(&self) -> &'static str {
    match self {
      DayOfWeek::Monday => "Mon",
      DayOfWeek::Wednesday => "Wed",
      DayOfWeek::Friday => "Fri",
    }
  }
}

impl fmt::Display for DayOfWeek {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for DayOfWeek {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "monday" | "mon" => Ok(DayOfWeek::Monday),
      "wednesday" | "wed" => Ok(DayOfWeek::Wednesday),
      "friday" | "fri" => Ok(DayOfWeek::Friday),
      _ => Err(format!("Unknown training day: {}", s)),
    }
  }
}

/// One set in a session, derived from the catalog's rep target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
  /// 1-based position in the day's plan
  pub set_number: u32,
  pub target_reps: RepTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSet {
  pub set_number: u32,
  pub target_reps: RepTarget,
  pub actual_reps: u32,
  pub completed_at: DateTime<Utc>,
}

/// The single in-flight workout, persisted after every set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWorkout {
  pub program_name: String,
  pub week: u32,
  pub day: DayOfWeek,
  pub rest_between_sets_seconds: u32,
  pub sets: Vec<WorkoutSet>,
  pub current_set_index: usize,
  pub started_at: DateTime<Utc>,
  pub completed_sets: Vec<CompletedSet>,
}

impl ActiveWorkout {
  pub fn new(
    program_name: &str,
    week: u32,
    day: DayOfWeek,
    rest_between_sets_seconds: u32,
    sets: Vec<WorkoutSet>,
    started_at: DateTime<Utc>,
  ) -> Self {
    Self {
      program_name: program_name.to_string(),
      week,
      day,
      rest_between_sets_seconds,
      sets,
      current_set_index: 0,
      started_at,
      completed_sets: Vec::new(),
    }
  }

  /// Next set to perform (None once every set is done)
  pub fn current_set(&self) -> Option<&WorkoutSet> {
    self.sets.get(self.current_set_index)
  }

  pub fn is_complete(&self) -> bool {
    self.current_set_index >= self.sets.len()
  }

  pub fn total_reps(&self) -> u64 {
    self.completed_sets.iter().map(|s| u64::from(s.actual_reps)).sum()
  }
}

/// A finalized session. History holds at most one per (week, day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedWorkout {
  pub id: String,
  pub program_name: String,
  pub week: u32,
  pub day: DayOfWeek,
  pub completed_at: DateTime<Utc>,
  pub sets: Vec<CompletedSet>,
  pub total_reps: u64,
  pub duration_seconds: u64,
}

impl CompletedWorkout {
  pub fn is_for(&self, week: u32, day: DayOfWeek) -> bool {
    self.week == week && self.day == day
  }
}
