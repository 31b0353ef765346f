//! Logging setup.

/// Initializes the `env_logger` backend for the `log` facade.
///
/// Safe to call more than once; only the first call installs the logger.
/// Verbosity is controlled through `RUST_LOG` as usual.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("meshprep logging initialized");
    }
}
