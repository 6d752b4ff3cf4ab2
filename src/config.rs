use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DATA_DIR_VAR: &str = "PUSHUP_LOG_DATA_DIR";
const DB_PATH_VAR: &str = "PUSHUP_LOG_DB";
const CATALOG_PATH_VAR: &str = "PUSHUP_LOG_CATALOG";
const FINISH_DELAY_VAR: &str = "PUSHUP_LOG_FINISH_DELAY_MS";
const LOG_LEVEL_VAR: &str = "PUSHUP_LOG_LEVEL";

const DEFAULT_DB_FILE: &str = "pushup-log.db";
const DEFAULT_FINISH_DELAY_MS: u64 = 500;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub data_dir: PathBuf,
  /// Explicit database file; overrides `data_dir`
  pub db_path: Option<PathBuf>,
  /// Program catalog JSON; None uses the built-in catalog
  pub catalog_path: Option<PathBuf>,
  /// Pause between the last set and finalizing the workout
  pub finish_delay: Duration,
  pub log_level: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      data_dir: PathBuf::from("."),
      db_path: None,
      catalog_path: None,
      finish_delay: Duration::from_millis(DEFAULT_FINISH_DELAY_MS),
      log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
  }
}

impl AppConfig {
  /// Read configuration from the environment. Call `dotenvy::dotenv()` first
  /// to pick up a `.env` file.
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let finish_delay = match non_empty_var(FINISH_DELAY_VAR) {
      Some(raw) => {
        let ms: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
          key: FINISH_DELAY_VAR.into(),
          value: raw.clone(),
        })?;
        Duration::from_millis(ms)
      }
      None => defaults.finish_delay,
    };

    Ok(Self {
      data_dir: non_empty_var(DATA_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or(defaults.data_dir),
      db_path: non_empty_var(DB_PATH_VAR).map(PathBuf::from),
      catalog_path: non_empty_var(CATALOG_PATH_VAR).map(PathBuf::from),
      finish_delay,
      log_level: non_empty_var(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
    })
  }

  pub fn db_path(&self) -> PathBuf {
    self
      .db_path
      .clone()
      .unwrap_or_else(|| self.data_dir.join(DEFAULT_DB_FILE))
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_VARS: [&str; 5] = [
    DATA_DIR_VAR,
    DB_PATH_VAR,
    CATALOG_PATH_VAR,
    FINISH_DELAY_VAR,
    LOG_LEVEL_VAR,
  ];

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset(ALL_VARS, || {
      let config = AppConfig::from_env().expect("defaults should load");
      assert_eq!(config, AppConfig::default());
      assert_eq!(config.db_path(), PathBuf::from("./pushup-log.db"));
      assert_eq!(config.finish_delay, Duration::from_millis(500));
    });
  }

  #[test]
  #[serial]
  fn test_reads_overrides() {
    temp_env::with_vars(
      [
        (DATA_DIR_VAR, Some("/tmp/pushups")),
        (DB_PATH_VAR, None),
        (CATALOG_PATH_VAR, Some("/etc/programs.json")),
        (FINISH_DELAY_VAR, Some("0")),
        (LOG_LEVEL_VAR, Some("debug")),
      ],
      || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.db_path(), PathBuf::from("/tmp/pushups/pushup-log.db"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/programs.json")));
        assert_eq!(config.finish_delay, Duration::ZERO);
        assert_eq!(config.log_level, "debug");
      },
    );
  }

  #[test]
  #[serial]
  fn test_explicit_db_path_wins() {
    temp_env::with_vars(
      [
        (DATA_DIR_VAR, Some("/tmp/ignored")),
        (DB_PATH_VAR, Some("/var/lib/pushups.db")),
      ],
      || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/pushups.db"));
      },
    );
  }

  #[test]
  #[serial]
  fn test_invalid_delay_is_rejected() {
    temp_env::with_var(FINISH_DELAY_VAR, Some("soon"), || {
      assert_eq!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid {
          key: FINISH_DELAY_VAR.into(),
          value: "soon".into(),
        })
      );
    });
  }
}
