pub mod aggregation;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod progress;
pub mod reps;
pub mod session;
pub mod storage;

#[cfg(test)]
mod test_utils;

use catalog::{CatalogError, ProgramCatalog};
use commands::AppState;
use config::AppConfig;
use db::SqliteStore;
use storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// Load the catalog, open the database and build the shared state
pub async fn initialize_app(config: AppConfig) -> Result<AppState<SqliteStore>, InitError> {
  let catalog = load_catalog(&config)?;
  tracing::debug!("Loaded {} programs", catalog.programs().len());

  let db_path = db::get_db_path(&config)?;
  let pool = db::initialize_db(&db_path).await?;

  Ok(AppState::new(SqliteStore::new(pool), catalog, config))
}

pub fn load_catalog(config: &AppConfig) -> Result<ProgramCatalog, CatalogError> {
  match &config.catalog_path {
    Some(path) => {
      tracing::info!("Loading program catalog from {}", path.display());
      ProgramCatalog::from_path(path)
    }
    None => ProgramCatalog::builtin(),
  }
}
