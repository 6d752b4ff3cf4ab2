//! Front-end facing operations. Each returns `Result<T, String>` with a
//! message fit to show the user.

pub mod onboarding;
pub mod progress;
pub mod workout;

use crate::catalog::ProgramCatalog;
use crate::config::AppConfig;
use crate::models::UserProgress;
use crate::progress::ProgressStore;
use crate::storage::KeyValueStore;

/// Everything a command needs, built once at startup
pub struct AppState<S> {
  pub store: ProgressStore<S>,
  pub catalog: ProgramCatalog,
  pub config: AppConfig,
}

impl<S: KeyValueStore> AppState<S> {
  pub fn new(store: S, catalog: ProgramCatalog, config: AppConfig) -> Self {
    Self {
      store: ProgressStore::new(store),
      catalog,
      config,
    }
  }
}

/// Current progress, or the message shown before onboarding
async fn require_progress<S: KeyValueStore>(state: &AppState<S>) -> Result<UserProgress, String> {
  state
    .store
    .get_user_progress()
    .await
    .ok_or_else(|| "No program selected yet. Run onboarding first.".to_string())
}
