//! Program catalog: named multi-week plans with per-day rep targets.
//!
//! Loaded once at startup from JSON (the built-in catalog or a file named in
//! config), validated, and passed by reference to everything that needs it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::models::{DayOfWeek, WorkoutSet};
use crate::reps::{MalformedRepTarget, RawRepTarget, RepTarget};

/// Rest used when a program is not in the catalog
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// Week cap used when a program is not in the catalog
pub const DEFAULT_MAX_WEEK: u32 = 10;

const BUILTIN_CATALOG: &str = include_str!("../data/programs.json");

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("Failed to read catalog: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to parse catalog: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Catalog defines no programs")]
  Empty,

  #[error("Duplicate program: {0}")]
  DuplicateProgram(String),

  #[error("Program {0} defines no weeks")]
  NoWeeks(String),

  #[error("Program {program}: expected week {expected}, found week {found}")]
  NonContiguousWeeks {
    program: String,
    expected: u32,
    found: u32,
  },

  #[error("Program {program} week {week} {day}: {source}")]
  MalformedRepTarget {
    program: String,
    week: u32,
    day: DayOfWeek,
    #[source]
    source: MalformedRepTarget,
  },

  #[error("Program {program} week {week} {day}: rep targets must be positive")]
  NonPositiveTarget {
    program: String,
    week: u32,
    day: DayOfWeek,
  },
}

/// ---------------------------------------------------------------------------
/// Input Format
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawCatalog {
  programs: Vec<RawProgram>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProgram {
  name: String,
  #[serde(default)]
  description: Option<String>,
  initial_test_min: u32,
  #[serde(default)]
  initial_test_max: Option<u32>,
  rest_between_sets: u32,
  weeks: Vec<RawWeek>,
}

#[derive(Debug, Deserialize)]
struct RawWeek {
  week: u32,
  #[serde(default)]
  monday: Vec<RawRepTarget>,
  #[serde(default)]
  wednesday: Vec<RawRepTarget>,
  #[serde(default)]
  friday: Vec<RawRepTarget>,
}

/// ---------------------------------------------------------------------------
/// Catalog Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
  pub name: String,
  pub description: String,
  pub initial_test_min: u32,
  /// None means unbounded above
  pub initial_test_max: Option<u32>,
  pub rest_between_sets_seconds: u32,
  pub weeks: Vec<WeekPlan>,
}

impl Program {
  /// Whether an initial-test count falls in this program's range
  pub fn accepts_count(&self, count: u32) -> bool {
    count >= self.initial_test_min && self.initial_test_max.is_none_or(|max| count <= max)
  }

  pub fn week(&self, week_number: u32) -> Option<&WeekPlan> {
    self.weeks.iter().find(|w| w.week_number == week_number)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPlan {
  pub week_number: u32,
  pub monday: Vec<RepTarget>,
  pub wednesday: Vec<RepTarget>,
  pub friday: Vec<RepTarget>,
}

impl WeekPlan {
  pub fn day(&self, day: DayOfWeek) -> &[RepTarget] {
    match day {
      DayOfWeek::Monday => &self.monday,
      DayOfWeek::Wednesday => &self.wednesday,
      DayOfWeek::Friday => &self.friday,
    }
  }
}

/// Preview of one day's workout for plan listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
  pub total_sets: usize,
  /// e.g. "10, 10, 8+"
  pub reps_preview: String,
  pub rest_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramCatalog {
  programs: Vec<Program>,
}

impl ProgramCatalog {
  /// Catalog compiled into the binary
  pub fn builtin() -> Result<Self, CatalogError> {
    Self::from_json(BUILTIN_CATALOG)
  }

  pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json(&json)
  }

  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    let raw: RawCatalog = serde_json::from_str(json)?;
    Self::validate(raw)
  }

  fn validate(raw: RawCatalog) -> Result<Self, CatalogError> {
    if raw.programs.is_empty() {
      return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    let mut programs = Vec::with_capacity(raw.programs.len());

    for program in raw.programs {
      if !seen.insert(program.name.clone()) {
        return Err(CatalogError::DuplicateProgram(program.name));
      }
      if program.weeks.is_empty() {
        return Err(CatalogError::NoWeeks(program.name));
      }

      let mut weeks = Vec::with_capacity(program.weeks.len());
      for (idx, week) in program.weeks.into_iter().enumerate() {
        let expected = idx as u32 + 1;
        if week.week != expected {
          return Err(CatalogError::NonContiguousWeeks {
            program: program.name,
            expected,
            found: week.week,
          });
        }

        let parse_day = |day: DayOfWeek, targets: &[RawRepTarget]| -> Result<Vec<RepTarget>, CatalogError> {
          targets
            .iter()
            .map(|raw| {
              let target = RepTarget::try_parse(raw).map_err(|source| CatalogError::MalformedRepTarget {
                program: program.name.clone(),
                week: week.week,
                day,
                source,
              })?;
              if target.value() == 0 {
                return Err(CatalogError::NonPositiveTarget {
                  program: program.name.clone(),
                  week: week.week,
                  day,
                });
              }
              Ok(target)
            })
            .collect()
        };

        weeks.push(WeekPlan {
          week_number: week.week,
          monday: parse_day(DayOfWeek::Monday, &week.monday)?,
          wednesday: parse_day(DayOfWeek::Wednesday, &week.wednesday)?,
          friday: parse_day(DayOfWeek::Friday, &week.friday)?,
        });
      }

      programs.push(Program {
        name: program.name,
        description: program.description.unwrap_or_default(),
        initial_test_min: program.initial_test_min,
        initial_test_max: program.initial_test_max,
        rest_between_sets_seconds: program.rest_between_sets,
        weeks,
      });
    }

    warn_on_overlapping_ranges(&programs);

    Ok(Self { programs })
  }

  pub fn programs(&self) -> &[Program] {
    &self.programs
  }

  pub fn program(&self, name: &str) -> Option<&Program> {
    self.programs.iter().find(|p| p.name == name)
  }

  /// Designated beginner program: the first entry in catalog order
  pub fn beginner_program(&self) -> &Program {
    // validate() rejects empty catalogs
    &self.programs[0]
  }

  pub fn default_program_name(&self) -> &str {
    &self.beginner_program().name
  }

  /// Sets for one day of a program week, numbered from 1.
  /// An unknown program, week or day yields an empty list.
  pub fn load_workout_for_day(&self, program_name: &str, week: u32, day: DayOfWeek) -> Vec<WorkoutSet> {
    let Some(program) = self.program(program_name) else {
      tracing::warn!("Program {} not found", program_name);
      return Vec::new();
    };
    let Some(week_plan) = program.week(week) else {
      tracing::warn!("Week {} not found in program {}", week, program_name);
      return Vec::new();
    };

    let targets = week_plan.day(day);
    if targets.is_empty() {
      tracing::warn!("Day {} not found in week {} of {}", day, week, program_name);
    }

    targets
      .iter()
      .enumerate()
      .map(|(idx, target)| WorkoutSet {
        set_number: idx as u32 + 1,
        target_reps: *target,
      })
      .collect()
  }

  pub fn rest_between_sets(&self, program_name: &str) -> u32 {
    self
      .program(program_name)
      .map(|p| p.rest_between_sets_seconds)
      .unwrap_or(DEFAULT_REST_SECONDS)
  }

  /// Week numbers in catalog order
  pub fn available_weeks(&self, program_name: &str) -> Vec<u32> {
    self
      .program(program_name)
      .map(|p| p.weeks.iter().map(|w| w.week_number).collect())
      .unwrap_or_default()
  }

  pub fn max_week(&self, program_name: &str) -> u32 {
    self
      .available_weeks(program_name)
      .into_iter()
      .max()
      .unwrap_or(DEFAULT_MAX_WEEK)
  }

  pub fn workout_summary(&self, program_name: &str, week: u32, day: DayOfWeek) -> WorkoutSummary {
    let sets = self.load_workout_for_day(program_name, week, day);
    let reps_preview = sets
      .iter()
      .map(|s| s.target_reps.to_string())
      .collect::<Vec<_>>()
      .join(", ");

    WorkoutSummary {
      total_sets: sets.len(),
      reps_preview,
      rest_seconds: self.rest_between_sets(program_name),
    }
  }
}

/// The matcher trusts catalog order; flag ranges that overlap or run backwards
fn warn_on_overlapping_ranges(programs: &[Program]) {
  for pair in programs.windows(2) {
    let (prev, next) = (&pair[0], &pair[1]);
    match prev.initial_test_max {
      Some(max) if next.initial_test_min <= max => tracing::warn!(
        "Initial test ranges overlap: {} ends at {}, {} starts at {}",
        prev.name,
        max,
        next.name,
        next.initial_test_min
      ),
      None => tracing::warn!(
        "{} is unbounded above, so {} can never be recommended",
        prev.name,
        next.name
      ),
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::mock_catalog;

  #[test]
  fn test_builtin_catalog_loads() {
    let catalog = ProgramCatalog::builtin().expect("built-in catalog should validate");
    assert_eq!(catalog.programs().len(), 6);
    assert_eq!(catalog.default_program_name(), "Beginner 1");
    for program in catalog.programs() {
      assert_eq!(catalog.max_week(&program.name), 10);
      for week in 1..=10 {
        for day in DayOfWeek::ALL {
          assert!(!catalog.load_workout_for_day(&program.name, week, day).is_empty());
        }
      }
    }
  }

  #[test]
  fn test_load_workout_numbers_sets_in_order() {
    let catalog = mock_catalog();
    let sets = catalog.load_workout_for_day("Beginner 1", 1, DayOfWeek::Monday);

    assert_eq!(sets.len(), 3);
    assert_eq!(sets[0].set_number, 1);
    assert_eq!(sets[0].target_reps, RepTarget::Fixed(10));
    assert_eq!(sets[2].set_number, 3);
    assert_eq!(sets[2].target_reps, RepTarget::Minimum(8));
    assert!(sets[2].target_reps.is_minimum());
  }

  #[test]
  fn test_load_workout_missing_pieces_is_empty() {
    let catalog = mock_catalog();
    assert!(catalog.load_workout_for_day("Nope", 1, DayOfWeek::Monday).is_empty());
    assert!(catalog.load_workout_for_day("Beginner 1", 42, DayOfWeek::Monday).is_empty());
    assert!(catalog.load_workout_for_day("Beginner 2", 1, DayOfWeek::Friday).is_empty());
  }

  #[test]
  fn test_rest_between_sets_falls_back() {
    let catalog = mock_catalog();
    assert_eq!(catalog.rest_between_sets("Beginner 1"), 45);
    assert_eq!(catalog.rest_between_sets("Unknown"), DEFAULT_REST_SECONDS);
  }

  #[test]
  fn test_available_weeks_keep_catalog_order() {
    let catalog = mock_catalog();
    assert_eq!(catalog.available_weeks("Beginner 1"), vec![1, 2]);
    assert!(catalog.available_weeks("Unknown").is_empty());
    assert_eq!(catalog.max_week("Unknown"), DEFAULT_MAX_WEEK);
  }

  #[test]
  fn test_workout_summary() {
    let catalog = mock_catalog();
    let summary = catalog.workout_summary("Beginner 1", 1, DayOfWeek::Monday);
    assert_eq!(summary.total_sets, 3);
    assert_eq!(summary.reps_preview, "10, 10, 8+");
    assert_eq!(summary.rest_seconds, 45);
  }

  #[test]
  fn test_rejects_malformed_targets() {
    let json = r#"{"programs":[{"name":"P","initialTestMin":1,"initialTestMax":null,
      "restBetweenSets":60,"weeks":[{"week":1,"monday":[5,"lots"]}]}]}"#;
    match ProgramCatalog::from_json(json) {
      Err(CatalogError::MalformedRepTarget { week, day, source, .. }) => {
        assert_eq!(week, 1);
        assert_eq!(day, DayOfWeek::Monday);
        assert_eq!(source.raw, "lots");
      }
      other => panic!("expected malformed target error, got {:?}", other),
    }
  }

  #[test]
  fn test_rejects_zero_targets() {
    let json = r#"{"programs":[{"name":"P","initialTestMin":1,
      "restBetweenSets":60,"weeks":[{"week":1,"friday":["0+"]}]}]}"#;
    assert!(matches!(
      ProgramCatalog::from_json(json),
      Err(CatalogError::NonPositiveTarget { day: DayOfWeek::Friday, .. })
    ));
  }

  #[test]
  fn test_rejects_gapped_weeks() {
    let json = r#"{"programs":[{"name":"P","initialTestMin":1,
      "restBetweenSets":60,"weeks":[{"week":1},{"week":3}]}]}"#;
    assert!(matches!(
      ProgramCatalog::from_json(json),
      Err(CatalogError::NonContiguousWeeks { expected: 2, found: 3, .. })
    ));
  }

  #[test]
  fn test_rejects_empty_and_duplicate_programs() {
    assert!(matches!(ProgramCatalog::from_json(r#"{"programs":[]}"#), Err(CatalogError::Empty)));

    let json = r#"{"programs":[
      {"name":"P","initialTestMin":1,"initialTestMax":2,"restBetweenSets":60,"weeks":[{"week":1}]},
      {"name":"P","initialTestMin":3,"restBetweenSets":60,"weeks":[{"week":1}]}]}"#;
    assert!(matches!(
      ProgramCatalog::from_json(json),
      Err(CatalogError::DuplicateProgram(name)) if name == "P"
    ));
  }

  #[test]
  fn test_accepts_count() {
    let catalog = mock_catalog();
    let beginner = catalog.program("Beginner 1").unwrap();
    assert!(beginner.accepts_count(1));
    assert!(beginner.accepts_count(3));
    assert!(!beginner.accepts_count(4));

    let open_ended = catalog.program("Beginner 2").unwrap();
    assert!(open_ended.accepts_count(4));
    assert!(open_ended.accepts_count(500));
  }
}
