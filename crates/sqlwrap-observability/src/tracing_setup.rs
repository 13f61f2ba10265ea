//! Subscriber setup for processes that use SqlWrap.
//!
//! The wrappers and the registry only emit `tracing` events; nothing is
//! printed until a subscriber is installed, typically with [`init_tracing`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Which SqlWrap events reach the log, and in what format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level for every target without an override. `TracingObserver`
    /// reports successful operations at `debug`, so the default hides them.
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: crate name → level (e.g. "sqlwrap-core" → "debug")
    #[serde(default)]
    pub components: HashMap<String, String>,
    /// One JSON object per event instead of text lines.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: HashMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Filter directives, e.g. `"info,sqlwrap_core=debug"`. Components are
    /// sorted so the output is stable.
    pub fn directives(&self) -> String {
        let mut components: Vec<_> = self.components.iter().collect();
        components.sort();

        let mut directives = self.level.clone();
        for (component, level) in components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

/// Install the process-wide subscriber described by `config`.
///
/// Invalid directives fall back to `info`. Fails if a global subscriber is
/// already set, so a host application's own setup is never replaced.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    }
}
