//! Tracing/logging initialization.
//!
//! Logs always go to stderr: stdout belongs to command output.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted before falling back to the default directive.
pub const ENV_FILTER: &str = "RUST_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    /// Human-readable single-line output.
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Directive used when `RUST_LOG` is unset or invalid.
    pub default_directive: String,
    pub format: LogFormat,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LogOptions {
    /// Options for a given verbosity count (`-v`, `-vv`, ...).
    pub fn verbosity(level: u8) -> Self {
        let directive = match level {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            default_directive: directive.to_string(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(ENV_FILTER)
            .unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }
}

/// Install the global subscriber.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(options: LogOptions) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(options.filter())
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match options.format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_directives() {
        assert_eq!(LogOptions::verbosity(0).default_directive, "warn");
        assert_eq!(LogOptions::verbosity(2).default_directive, "debug");
        assert_eq!(LogOptions::verbosity(9).default_directive, "trace");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init(LogOptions::default());
        init(LogOptions::verbosity(3).with_format(LogFormat::Compact));
    }
}
