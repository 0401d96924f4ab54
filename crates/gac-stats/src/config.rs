// Configuration loading and parsing (config/gac.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::metrics::SwingScoreScale;

const CONFIG_FILE: &str = "gac.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative data paths are resolved against.
    pub base_dir: PathBuf,
    pub data_paths: DataPaths,
    pub swing_score: SwingScoreScale,
    pub logging: LoggingConfig,
}

/// Raw deserialization target for gac.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data_paths: DataPaths,
    #[serde(default)]
    swing_score: SwingScoreScale,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub hitting: String,
    pub pitching: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            hitting: "data/hitting.csv".into(),
            pitching: "data/pitching.csv".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "gac_stats=info,gac_hub=info,warn".into(),
        }
    }
}

impl Config {
    /// Built-in defaults, used when neither config/ nor defaults/ exists.
    pub fn with_defaults(base_dir: &Path) -> Self {
        Config {
            base_dir: base_dir.to_path_buf(),
            data_paths: DataPaths::default(),
            swing_score: SwingScoreScale::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn hitting_path(&self) -> PathBuf {
        self.base_dir.join(&self.data_paths.hitting)
    }

    pub fn pitching_path(&self) -> PathBuf {
        self.base_dir.join(&self.data_paths.pitching)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/gac.toml` under `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        data_paths: file.data_paths,
        swing_score: file.swing_score,
        logging: file.logging,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/gac.toml` to `config/gac.toml` unless it already exists.
/// Returns the path written, if any.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if !source.is_file() || target.exists() {
        return Ok(None);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            })?;
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Load config relative to `base_dir`, copying defaults first. Falls back to
/// built-in defaults when no config file is available at all.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    if let Some(copied) = ensure_config_files(base_dir)? {
        info!("copied default config to {}", copied.display());
    }
    if !base_dir.join("config").join(CONFIG_FILE).exists() {
        info!(
            "no config/{} under {}; using built-in defaults",
            CONFIG_FILE,
            base_dir.display()
        );
        return Ok(Config::with_defaults(base_dir));
    }
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let paths: &[(&str, &str)] = &[
        ("data_paths.hitting", config.data_paths.hitting.as_str()),
        ("data_paths.pitching", config.data_paths.pitching.as_str()),
    ];
    for (name, value) in paths {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if let Err(e) = config.swing_score.validate() {
        return Err(ConfigError::ValidationError {
            field: "swing_score".into(),
            message: e.to_string(),
        });
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where defaults/ lives.
    fn project_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    fn write_config(dir: &Path, body: &str) {
        fs::create_dir_all(dir.join("config")).unwrap();
        fs::write(dir.join("config").join(CONFIG_FILE), body).unwrap();
    }

    #[test]
    fn defaults_file_loads() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.path().join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        let config = load_config(tmp.path()).expect("should load copied defaults");
        assert!(tmp.path().join("config").join(CONFIG_FILE).exists());
        assert_eq!(config.data_paths.hitting, "data/hitting.csv");
        assert_eq!(config.data_paths.pitching, "data/pitching.csv");
        assert_eq!(config.swing_score, SwingScoreScale::default());
        assert_eq!(config.logging.filter, "gac_stats=info,gac_hub=info,warn");
        assert_eq!(config.hitting_path(), tmp.path().join("data/hitting.csv"));
    }

    #[test]
    fn existing_config_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("defaults")).unwrap();
        fs::write(
            tmp.path().join("defaults").join(CONFIG_FILE),
            "[data_paths]\nhitting = \"d/h.csv\"\npitching = \"d/p.csv\"\n",
        )
        .unwrap();
        write_config(
            tmp.path(),
            "[data_paths]\nhitting = \"mine/h.csv\"\npitching = \"mine/p.csv\"\n",
        );

        assert_eq!(ensure_config_files(tmp.path()).unwrap(), None);
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.data_paths.hitting, "mine/h.csv");
    }

    #[test]
    fn no_config_anywhere_uses_builtin_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.data_paths.hitting, "data/hitting.csv");
        assert!(!tmp.path().join("config").exists());
    }

    #[test]
    fn optional_sections_default() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(
            tmp.path(),
            "[data_paths]\nhitting = \"h.csv\"\npitching = \"p.csv\"\n",
        );
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.swing_score, SwingScoreScale::default());
        assert_eq!(config.logging.filter, LoggingConfig::default().filter);
    }

    #[test]
    fn custom_swing_scale() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(
            tmp.path(),
            "\
[data_paths]
hitting = \"h.csv\"
pitching = \"p.csv\"

[swing_score]
min_acceleration = 12.0
max_acceleration = 28.0
",
        );
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.swing_score.min_acceleration, 12.0);
        assert_eq!(config.swing_score.max_acceleration, 28.0);
    }

    #[test]
    fn inverted_swing_scale_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(
            tmp.path(),
            "\
[data_paths]
hitting = \"h.csv\"
pitching = \"p.csv\"

[swing_score]
min_acceleration = 30.0
max_acceleration = 15.0
",
        );
        let err = load_config_from(tmp.path()).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "swing_score"),
            other => panic!("expected ValidationError, got: {other:?}"),
        }
    }

    #[test]
    fn empty_data_path_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(
            tmp.path(),
            "[data_paths]\nhitting = \"  \"\npitching = \"p.csv\"\n",
        );
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("data_paths.hitting"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_config(tmp.path(), "[data_paths\nhitting = ");
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
