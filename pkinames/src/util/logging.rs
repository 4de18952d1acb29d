//! Logging support

use log::{debug, error, info, warn};

use crate::DistinguishedName;

/// Enum that describes level associated with a log message
#[derive(Debug, Eq, PartialEq)]
pub enum NameLogLevels {
    /// Common error logging level
    NameError,
    /// Common info logging level
    NameInfo,
    /// Common warn logging level
    NameWarn,
    /// Common debug logging level
    NameDebug,
}

/// `log_message` emits a message via the `log` facade at the given level.
pub fn log_message(level: &NameLogLevels, message: &str) {
    match level {
        NameLogLevels::NameError => error!("{}", message),
        NameLogLevels::NameWarn => warn!("{}", message),
        NameLogLevels::NameInfo => info!("{}", message),
        NameLogLevels::NameDebug => debug!("{}", message),
    }
}

/// `log_error_for_name` logs a message with the RFC 2253 form of the given name appended
pub fn log_error_for_name(name: &DistinguishedName, msg: &str) {
    log_message(
        &NameLogLevels::NameError,
        format!("{} for {}", msg, name.to_rfc2253_string()).as_str(),
    );
}
