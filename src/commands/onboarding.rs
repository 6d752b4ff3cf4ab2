use chrono::Utc;
use serde::Serialize;

use super::AppState;
use crate::matcher::{all_programs, find_program_for_count, ProgramRecommendation};
use crate::models::UserProgress;
use crate::storage::KeyValueStore;

/// Every program, in catalog order
pub async fn list_programs<S: KeyValueStore>(
  state: &AppState<S>,
) -> Result<Vec<ProgramRecommendation>, String> {
  Ok(all_programs(&state.catalog))
}

/// Program for an initial max-push-up test. Counts below 1 count as 1.
pub async fn recommend_program<S: KeyValueStore>(
  state: &AppState<S>,
  test_count: u32,
) -> Result<ProgramRecommendation, String> {
  Ok(find_program_for_count(&state.catalog, test_count.max(1)))
}

pub async fn needs_onboarding<S: KeyValueStore>(state: &AppState<S>) -> Result<bool, String> {
  Ok(state.store.get_user_progress().await.is_none())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOutcome {
  pub progress: UserProgress,
  pub program: ProgramRecommendation,
}

/// Start the recommended program at week 1. Replaces any earlier progress;
/// history is kept.
pub async fn complete_onboarding<S: KeyValueStore>(
  state: &AppState<S>,
  test_count: u32,
) -> Result<OnboardingOutcome, String> {
  let program = recommend_program(state, test_count).await?;
  let progress = UserProgress::new(&program.name, Utc::now());

  state
    .store
    .save_user_progress(&progress)
    .await
    .map_err(|e| format!("Failed to save progress: {}", e))?;

  tracing::info!(
    "Onboarded with {} push-ups onto {}",
    test_count,
    progress.current_program
  );
  Ok(OnboardingOutcome { progress, program })
}

/// Beginner program at week 1, unless progress already exists
pub async fn initialize_default_progress<S: KeyValueStore>(
  state: &AppState<S>,
) -> Result<UserProgress, String> {
  state
    .store
    .initialize_default_progress(state.catalog.default_program_name(), Utc::now())
    .await
    .map_err(|e| format!("Failed to save progress: {}", e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::storage::MemoryStore;
  use crate::test_utils::{mock_catalog, FailingStore};

  fn app() -> AppState<MemoryStore> {
    AppState::new(MemoryStore::new(), mock_catalog(), AppConfig::default())
  }

  #[tokio::test]
  async fn test_onboarding_flow() {
    let state = app();
    assert!(needs_onboarding(&state).await.unwrap());

    let OnboardingOutcome { progress, program } = complete_onboarding(&state, 12).await.unwrap();
    assert_eq!(progress.current_program, "Beginner 2");
    assert_eq!(progress.current_week, 1);
    assert_eq!(program, recommend_program(&state, 12).await.unwrap());

    assert!(!needs_onboarding(&state).await.unwrap());
    assert_eq!(state.store.get_user_progress().await, Some(progress));
  }

  #[tokio::test]
  async fn test_zero_count_is_clamped() {
    let state = app();
    assert_eq!(recommend_program(&state, 0).await.unwrap().name, "Beginner 1");
  }

  #[tokio::test]
  async fn test_initialize_default_progress_uses_beginner() {
    let state = app();
    let progress = initialize_default_progress(&state).await.unwrap();
    assert_eq!(progress.current_program, "Beginner 1");

    complete_onboarding(&state, 40).await.unwrap();
    let again = initialize_default_progress(&state).await.unwrap();
    assert_eq!(again.current_program, "Beginner 2");
  }

  #[tokio::test]
  async fn test_list_programs() {
    let names: Vec<String> = list_programs(&app())
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.name)
      .collect();
    assert_eq!(names, vec!["Beginner 1", "Beginner 2"]);
  }

  #[tokio::test]
  async fn test_save_failure_is_reported() {
    let state = AppState::new(FailingStore, mock_catalog(), AppConfig::default());
    let err = complete_onboarding(&state, 2).await.unwrap_err();
    assert!(err.starts_with("Failed to save progress"));
  }
}
