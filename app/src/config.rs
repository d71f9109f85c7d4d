//! Application configuration.
//!
//! Read from environment variables, falling back to defaults for anything
//! unset:
//!
//! | Variable | Default |
//! |---|---|
//! | `TODOAPP_STORAGE_DIR` | `./.todoapp` |
//! | `TODOAPP_LOG` | `todoapp=info,todoapp_runtime=info` |
//! | `TODOAPP_LATENCY_SCALE` | `1.0` |
//! | `TODOAPP_ORDERING` | `serialized` |

use anyhow::{Context, bail};
use std::path::PathBuf;
use todoapp_auth::{AuthConfig, AuthLatencies};
use todoapp_runtime::OperationOrdering;
use todoapp_todos::{TodoConfig, TodoLatencies};

/// Default storage directory.
pub const DEFAULT_STORAGE_DIR: &str = "./.todoapp";

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "todoapp=info,todoapp_runtime=info";

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the persisted slices.
    pub storage_dir: PathBuf,

    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,

    /// Multiplier applied to every simulated latency. `0.0` makes the
    /// simulated backends answer immediately.
    pub latency_scale: f64,

    /// How overlapping operations are admitted by both containers.
    pub ordering: OperationOrdering,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            latency_scale: 1.0,
            ordering: OperationOrdering::Serialized,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let storage_dir = lookup("TODOAPP_STORAGE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or(defaults.storage_dir, PathBuf::from);

        let log_filter = lookup("TODOAPP_LOG")
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let latency_scale = match lookup("TODOAPP_LATENCY_SCALE") {
            Some(raw) => {
                let scale: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("TODOAPP_LATENCY_SCALE is not a number: {raw:?}"))?;
                if !scale.is_finite() || scale < 0.0 {
                    bail!("TODOAPP_LATENCY_SCALE must be a non-negative number, got {raw:?}");
                }
                if AuthLatencies::default().checked_scaled(scale).is_none()
                    || TodoLatencies::default().checked_scaled(scale).is_none()
                {
                    bail!("TODOAPP_LATENCY_SCALE is too large, got {raw:?}");
                }
                scale
            },
            None => defaults.latency_scale,
        };

        let ordering = match lookup("TODOAPP_ORDERING").as_deref().map(str::trim) {
            None | Some("") => defaults.ordering,
            Some(raw) => parse_ordering(raw)?,
        };

        Ok(Self {
            storage_dir,
            log_filter,
            latency_scale,
            ordering,
        })
    }

    /// Set the storage directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Set the latency multiplier.
    #[must_use]
    pub const fn with_latency_scale(mut self, scale: f64) -> Self {
        self.latency_scale = scale;
        self
    }

    /// Set operation ordering.
    #[must_use]
    pub const fn with_ordering(mut self, ordering: OperationOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Configuration for the auth container.
    #[must_use]
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new()
            .with_latencies(AuthLatencies::default().scaled(self.latency_scale))
            .with_ordering(self.ordering)
    }

    /// Configuration for the todo container.
    #[must_use]
    pub fn todo_config(&self) -> TodoConfig {
        TodoConfig::new()
            .with_latencies(TodoLatencies::default().scaled(self.latency_scale))
            .with_ordering(self.ordering)
    }
}

fn parse_ordering(raw: &str) -> anyhow::Result<OperationOrdering> {
    match raw.to_ascii_lowercase().as_str() {
        "serialized" => Ok(OperationOrdering::Serialized),
        "concurrent" => Ok(OperationOrdering::Concurrent),
        _ => bail!("TODOAPP_ORDERING must be `serialized` or `concurrent`, got {raw:?}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_dir, PathBuf::from("./.todoapp"));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TODOAPP_STORAGE_DIR", "/tmp/todo"),
            ("TODOAPP_LOG", "debug"),
            ("TODOAPP_LATENCY_SCALE", " 0.5 "),
            ("TODOAPP_ORDERING", "Concurrent"),
        ]))
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/tmp/todo"));
        assert_eq!(config.log_filter, "debug");
        assert!((config.latency_scale - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.ordering, OperationOrdering::Concurrent);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[("TODOAPP_LATENCY_SCALE", "fast")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("TODOAPP_LATENCY_SCALE", "-1")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("TODOAPP_ORDERING", "random")])).is_err());
    }

    #[test]
    fn test_rejects_scale_that_overflows_latencies() {
        let error = AppConfig::from_lookup(lookup(&[("TODOAPP_LATENCY_SCALE", "1e20")]))
            .unwrap_err()
            .to_string();
        assert!(error.contains("too large"), "{error}");

        assert!(AppConfig::from_lookup(lookup(&[("TODOAPP_LATENCY_SCALE", "1000")])).is_ok());
    }

    #[test]
    fn test_oversized_builder_scale_does_not_panic() {
        let config = AppConfig::default().with_latency_scale(1e20);
        assert_eq!(config.auth_config().latencies.sign_in, Duration::MAX);
        assert_eq!(config.todo_config().latencies.add, Duration::MAX);
    }

    #[test]
    fn test_scale_flows_into_container_configs() {
        let config = AppConfig::default()
            .with_latency_scale(0.0)
            .with_ordering(OperationOrdering::Concurrent);

        let auth = config.auth_config();
        assert_eq!(auth.latencies, AuthLatencies::uniform(Duration::ZERO));
        assert_eq!(auth.ordering, OperationOrdering::Concurrent);

        let todos = config.todo_config();
        assert_eq!(todos.latencies.add, Duration::ZERO);
        assert_eq!(todos.ordering, OperationOrdering::Concurrent);
    }
}
