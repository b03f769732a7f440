use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub program: ProgramConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings applied to every started program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Tag of the element wrapping the view (default: "div").
    #[serde(default = "default_root_tag")]
    pub root_tag: String,
    /// Delay between a redraw request and the redraw when frames come from
    /// tokio timers (default: 16).
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl ProgramConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Tracing output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Log file base path. Logging is off when neither this nor `FLOWDOM_LOG`
    /// is set.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_root_tag() -> String {
    "div".to_string()
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            root_tag: default_root_tag(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}
