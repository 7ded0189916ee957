pub use verbosity::*;


// Global control over verbose messaging.
pub(crate) mod verbosity {
  use std::{
    env,
    io::{stdout, Stdout, Write},
    sync::{
      atomic::{AtomicI32, Ordering},
      Mutex,
      MutexGuard
    }
  };
  use lazy_static::lazy_static;
  use thiserror::Error;

  pub const VERBOSITY_ENV_VAR: &str = "RIIID_VERBOSITY";

  static VERBOSITY: AtomicI32 = AtomicI32::new(0);
  lazy_static! {
    static ref VERBOSE_STREAM: Mutex<Stdout> = Mutex::new(stdout());
  }

  #[derive(Clone, Debug, PartialEq, Eq, Error)]
  pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    Missing(String),
    #[error("environment variable `{variable}` has non-integer verbosity `{value}`")]
    Invalid {
      variable: String,
      value   : String
    },
  }

  fn verbosity_is_at_least(lvl: i32) -> bool {
    VERBOSITY.load(Ordering::Relaxed) >= lvl
  }

  pub fn verbosity() -> i32 {
    VERBOSITY.load(Ordering::Relaxed)
  }

  pub fn set_verbosity(new_value: i32) {
    VERBOSITY.store(new_value, Ordering::Relaxed);
  }

  /// Reads the verbosity from `variable`. On failure the current verbosity is left alone.
  pub fn verbosity_from_env(variable: &str) -> Result<i32, ConfigError> {
    let value = env::var(variable).map_err(|_| ConfigError::Missing(variable.to_string()))?;
    let level = value.trim().parse::<i32>().map_err(|_| ConfigError::Invalid {
      variable: variable.to_string(),
      value
    })?;
    set_verbosity(level);
    Ok(level)
  }

  pub fn init_verbosity_from_env() -> Result<i32, ConfigError> {
    verbosity_from_env(VERBOSITY_ENV_VAR)
  }

  fn verbose_stream() -> MutexGuard<'static, Stdout> {
    // A writer that panicked mid-message leaves nothing worth protecting.
    VERBOSE_STREAM.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  pub(crate) fn verbose_emit(msg: &str) {
    let mut stream = verbose_stream();
    let _ = stream.write_all(msg.as_bytes());
    let _ = stream.write_all(b"\n");
  }

  /// Only emits a message if the verbosity level is at least `level`.
  pub fn log_at_level(level: i32, msg: &str) {
    if verbosity_is_at_least(level) {
      verbose_emit(msg);
    }
  }


}
