use failure::{Error, Fail};

pub const ARRANGER_LOG_CONFIG: &'static str = "ARRANGER_LOG_CONFIG";
pub const DEFAULT_ARRANGER_LOG_CONFIG: &'static str = "log4rs.yaml";

#[derive(Debug, Fail)]
enum LoggingError {
  #[fail(display = "Failed to init logging: {}", cause)]
  Init { cause: String },
}

/// Host-app bootstrap: initialises log4rs from the YAML file named by the
/// `ARRANGER_LOG_CONFIG` environment variable, falling back to
/// `log4rs.yaml` next to the executable.
pub fn init() -> Result<(), Error> {
  let log_config_path = std::env::var(ARRANGER_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_ARRANGER_LOG_CONFIG.to_string());

  init_from_file(log_config_path.as_str())
}

pub fn init_from_file(path: &str) -> Result<(), Error> {
  log4rs::init_file(path, Default::default()).map_err(|err| LoggingError::Init {
    cause: err.to_string(),
  })?;

  Ok(())
}
