use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use hotswap_engine::{resolve_app_paths, AppPaths, HostVersion, HostVersionError, StartupError};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_FILE_NAME: &str = "hotswap.json";
const HOST_VERSION_ENV_VAR: &str = "HOTSWAP_HOST_VERSION";
const POLL_MS_ENV_VAR: &str = "HOTSWAP_POLL_MS";
const MAX_POLLS_ENV_VAR: &str = "HOTSWAP_MAX_POLLS";
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HostConfig {
    pub(crate) host_version: HostVersion,
    pub(crate) content_dir: Option<PathBuf>,
    pub(crate) poll_interval_ms: u64,
    // `None` polls until the process is stopped.
    pub(crate) max_polls: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host_version: HostVersion::default(),
            content_dir: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to read config file {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {var}: {source}")]
    HostVersion {
        var: &'static str,
        #[source]
        source: HostVersionError,
    },
    #[error("invalid {var} value '{value}': expected a non-negative integer")]
    InvalidNumber { var: &'static str, value: String },
}

pub(crate) struct AppWiring {
    pub(crate) paths: AppPaths,
    pub(crate) config: HostConfig,
}

impl AppWiring {
    pub(crate) fn content_dir(&self) -> PathBuf {
        match &self.config.content_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.paths.root.join(dir),
            None => self.paths.content_dir.clone(),
        }
    }
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Hotswap Startup ===");

    let paths = resolve_app_paths()?;
    let config = load_host_config(&paths.root, |var| env::var(var).ok())?;
    info!(
        root = %paths.root.display(),
        host_version = %config.host_version,
        poll_interval_ms = config.poll_interval_ms,
        max_polls = ?config.max_polls,
        "host_config_loaded"
    );
    Ok(AppWiring { paths, config })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub(crate) fn load_host_config(
    root: &Path,
    lookup: impl Fn(&'static str) -> Option<String>,
) -> Result<HostConfig, BootstrapError> {
    let path = root.join(CONFIG_FILE_NAME);
    let mut config = if path.is_file() {
        let raw = fs::read_to_string(&path).map_err(|source| BootstrapError::ReadConfig {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str::<HostConfig>(&raw)
            .map_err(|source| BootstrapError::ParseConfig { path, source })?
    } else {
        HostConfig::default()
    };

    if let Some(raw) = lookup(HOST_VERSION_ENV_VAR) {
        config.host_version = raw.parse().map_err(|source| BootstrapError::HostVersion {
            var: HOST_VERSION_ENV_VAR,
            source,
        })?;
    }
    if let Some(raw) = lookup(POLL_MS_ENV_VAR) {
        config.poll_interval_ms = parse_count(POLL_MS_ENV_VAR, &raw)?;
    }
    if let Some(raw) = lookup(MAX_POLLS_ENV_VAR) {
        config.max_polls = Some(parse_count(MAX_POLLS_ENV_VAR, &raw)?);
    }
    Ok(config)
}

fn parse_count(var: &'static str, raw: &str) -> Result<u64, BootstrapError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| BootstrapError::InvalidNumber {
            var,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn no_env(_: &'static str) -> Option<String> {
        None
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let temp = TempDir::new().expect("temp");
        let config = load_host_config(temp.path(), no_env).expect("config");
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.host_version, HostVersion::Modern);
    }

    #[test]
    fn config_file_is_read_and_env_overrides_it() {
        let temp = TempDir::new().expect("temp");
        let raw = json!({
            "host_version": "1.2",
            "content_dir": "assets/content",
            "poll_interval_ms": 50
        });
        fs::write(temp.path().join(CONFIG_FILE_NAME), raw.to_string()).expect("write");

        let from_file = load_host_config(temp.path(), no_env).expect("file");
        assert_eq!(from_file.host_version, HostVersion::Legacy);
        assert_eq!(from_file.content_dir, Some(PathBuf::from("assets/content")));
        assert_eq!(from_file.poll_interval_ms, 50);
        assert_eq!(from_file.max_polls, None);

        let env = HashMap::from([
            (HOST_VERSION_ENV_VAR, "modern".to_string()),
            (MAX_POLLS_ENV_VAR, " 3 ".to_string()),
        ]);
        let overridden =
            load_host_config(temp.path(), |var| env.get(var).cloned()).expect("overridden");
        assert_eq!(overridden.host_version, HostVersion::Modern);
        assert_eq!(overridden.max_polls, Some(3));
        assert_eq!(overridden.poll_interval_ms, 50);
    }

    #[test]
    fn unknown_config_field_is_rejected() {
        let temp = TempDir::new().expect("temp");
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            json!({ "poll_ms": 10 }).to_string(),
        )
        .expect("write");
        let error = load_host_config(temp.path(), no_env).expect_err("unknown field");
        assert!(matches!(error, BootstrapError::ParseConfig { .. }));
    }

    #[test]
    fn bad_env_values_are_reported_with_their_variable() {
        let temp = TempDir::new().expect("temp");
        let version = load_host_config(temp.path(), |var| {
            (var == HOST_VERSION_ENV_VAR).then(|| "1.4".to_string())
        })
        .expect_err("version");
        assert!(matches!(
            version,
            BootstrapError::HostVersion {
                var: HOST_VERSION_ENV_VAR,
                ..
            }
        ));

        let poll = load_host_config(temp.path(), |var| {
            (var == POLL_MS_ENV_VAR).then(|| "-5".to_string())
        })
        .expect_err("poll");
        assert!(matches!(poll, BootstrapError::InvalidNumber { .. }));
    }
}
