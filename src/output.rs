//! Global output configuration.
//!
//! Replies and command feedback go to stdout, errors and logs to stderr.
//! Colors are disabled by the `NO_COLOR` environment variable or when stdout
//! is not a terminal.

use std::io::IsTerminal;
use std::sync::OnceLock;

/// Global output configuration.
static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

/// Output configuration settings.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Disable colored output.
    pub no_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            // https://no-color.org/
            no_color: std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

impl OutputConfig {
    /// Detects settings from the environment and the attached stdout.
    pub fn detect() -> Self {
        let default = Self::default();
        Self {
            no_color: default.no_color || !std::io::stdout().is_terminal(),
        }
    }
}

/// Initialize the global output configuration.
///
/// Subsequent calls are ignored.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

/// Get the current output configuration.
pub fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(OutputConfig::default)
}

/// Check if colors are disabled.
pub fn is_no_color() -> bool {
    config().no_color
}
