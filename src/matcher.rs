//! Initial-test → program recommendation.
//!
//! First match in catalog order wins. The catalog is expected to list
//! disjoint, ascending ranges; nothing here checks that.

use serde::{Deserialize, Serialize};

use crate::catalog::{Program, ProgramCatalog};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecommendation {
  pub name: String,
  pub description: String,
  pub initial_test_min: u32,
  pub initial_test_max: Option<u32>,
}

impl From<&Program> for ProgramRecommendation {
  fn from(program: &Program) -> Self {
    Self {
      name: program.name.clone(),
      description: program.description.clone(),
      initial_test_min: program.initial_test_min,
      initial_test_max: program.initial_test_max,
    }
  }
}

/// Recommend a program for an initial max-rep count.
///
/// Counts below every range (or in a gap between ranges) get the beginner
/// program, so there is always a recommendation.
pub fn find_program_for_count(catalog: &ProgramCatalog, count: u32) -> ProgramRecommendation {
  match catalog.programs().iter().find(|p| p.accepts_count(count)) {
    Some(program) => program.into(),
    None => {
      let fallback = catalog.beginner_program();
      tracing::info!(
        "No program range contains {} reps, recommending {}",
        count,
        fallback.name
      );
      fallback.into()
    }
  }
}

/// Every program, in catalog order
pub fn all_programs(catalog: &ProgramCatalog) -> Vec<ProgramRecommendation> {
  catalog.programs().iter().map(ProgramRecommendation::from).collect()
}
