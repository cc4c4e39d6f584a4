use flexi_logger::{Logger, LoggerHandle};
use log::info;

use crate::LabError;

/// Starts logging to stderr.
///
/// `spec` is a `log`-style filter such as `"info"` or `"statelab=debug"`;
/// `RUST_LOG` takes precedence when set. Keep the returned handle alive for as
/// long as logging is needed.
pub fn init_logging(spec: &str) -> Result<LoggerHandle, LabError> {
    let handle = Logger::try_with_env_or_str(spec)
        .and_then(|logger| logger.start())
        .map_err(|e| LabError::Logger {
            message: e.to_string(),
        })?;
    info!(
        "event=app_start version={} spec={spec}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}
