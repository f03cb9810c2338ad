//! Host configuration loaded from JSON, overridden by command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::Cli;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ehost.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Render area size in logical points.
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub toolbar_height: f64,
    pub side_inset: f64,
    pub bottom_inset: f64,
    pub engine_library: Option<PathBuf>,
    pub autostart: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: 1152,
            height: 648,
            title: "Embedded Engine Host".to_string(),
            toolbar_height: 40.0,
            side_inset: 0.0,
            bottom_inset: 0.0,
            engine_library: None,
            autostart: true,
        }
    }
}

impl HostConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// `--config` if given (must exist), else `ehost.json` if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::info!("Loading config from {}", path.display());
            return Self::load_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::info!("Loading config from {}", fallback.display());
            return Self::load_file(fallback);
        }
        log::debug!("No config file; using defaults");
        Ok(Self::default())
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(library) = &cli.engine_library {
            self.engine_library = Some(library.clone());
        }
        if cli.no_autostart {
            self.autostart = false;
        }
    }

    /// Engine library to load: configured path, else the platform default
    /// name next to the executable.
    pub fn engine_library_path(&self) -> PathBuf {
        if let Some(path) = &self.engine_library {
            return path.clone();
        }
        let name = ehost_engine::args::default_library_name();
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(&name)))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = HostConfig::from_json(Path::new("t.json"), "{}").unwrap();
        assert_eq!(config, HostConfig::default());
        assert!(config.autostart);
        assert!((config.toolbar_height - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_config_overrides_only_named_fields() {
        let json = r#"{ "width": 640, "title": "Demo", "engine_library": "/opt/engine.so" }"#;
        let config = HostConfig::from_json(Path::new("t.json"), json).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 648);
        assert_eq!(config.title, "Demo");
        assert_eq!(config.engine_library_path(), PathBuf::from("/opt/engine.so"));
    }

    #[test]
    fn test_malformed_config_reports_path() {
        let err = HostConfig::from_json(Path::new("bad.json"), "{ width: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == Path::new("bad.json")));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = HostConfig::resolve(Some(Path::new("/nonexistent/ehost.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "ehost",
            "--height",
            "300",
            "--engine-library",
            "custom.so",
            "--no-autostart",
        ]);
        let mut config = HostConfig::default();
        config.apply_cli(&cli);
        assert_eq!(config.width, 1152);
        assert_eq!(config.height, 300);
        assert!(!config.autostart);
        assert_eq!(config.engine_library, Some(PathBuf::from("custom.so")));
    }

    #[test]
    fn test_default_library_sits_next_to_executable() {
        let path = HostConfig::default().engine_library_path();
        assert!(path.ends_with(ehost_engine::args::default_library_name()));
    }
}
