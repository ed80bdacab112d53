//! Pipeline configuration
//!
//! A run is described by a small YAML document:
//!
//! ```yaml
//! sigfigs: 7
//! id_strategy: deterministic
//! database: /data/biostar.db
//! inputs:
//!   - source: vertnet
//!     path: dumps/vertnet_mammals.txt
//!   - source: ebird
//!     path: dumps/ebd_sample.txt
//!     skip_header: true
//! ```

use crate::clean::DEFAULT_SIGFIGS;
use crate::source::SourceKind;
use crate::star::IdStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest rounding precision that still fits an f64's significant digits
pub const MAX_SIGFIGS: usize = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One raw dump to ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    pub source: SourceKind,
    pub path: PathBuf,
    /// Drop the first line of the file
    #[serde(default)]
    pub skip_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_sigfigs")]
    pub sigfigs: usize,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    /// Database file; `None` means [`default_db_path`]
    #[serde(default)]
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
}

fn default_sigfigs() -> usize {
    DEFAULT_SIGFIGS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sigfigs: DEFAULT_SIGFIGS,
            id_strategy: IdStrategy::default(),
            database: None,
            inputs: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Read and validate a config file.
    ///
    /// Relative input paths are resolved against the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&text)?;
        if let Some(base) = path.parent() {
            for input in &mut config.inputs {
                if input.path.is_relative() {
                    input.path = base.join(&input.path);
                }
            }
            if let Some(db) = config.database.as_mut().filter(|db| db.is_relative()) {
                *db = base.join(&*db);
            }
        }
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inputs.is_empty() {
            return Err(ConfigError::Invalid("no inputs configured".into()));
        }
        validate_sigfigs(self.sigfigs)
    }

    /// Configured database, or the per-user default
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_db_path)
    }
}

/// Reject a rounding precision above [`MAX_SIGFIGS`]
pub fn validate_sigfigs(sigfigs: usize) -> Result<(), ConfigError> {
    if sigfigs > MAX_SIGFIGS {
        return Err(ConfigError::Invalid(format!(
            "sigfigs {} exceeds maximum of {}",
            sigfigs, MAX_SIGFIGS
        )));
    }
    Ok(())
}

/// Get the default database path (~/.local/share/biostar/biostar.db)
pub fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("biostar").join("biostar.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_takes_defaults() {
        let config = PipelineConfig::from_yaml_str(
            "inputs:\n  - source: gbif\n    path: occurrence.txt\n",
        )
        .unwrap();
        assert_eq!(config.sigfigs, 7);
        assert_eq!(config.id_strategy, IdStrategy::Random);
        assert_eq!(config.database, None);
        assert_eq!(
            config.inputs,
            vec![InputConfig {
                source: SourceKind::Gbif,
                path: "occurrence.txt".into(),
                skip_header: false,
            }]
        );
    }

    #[test]
    fn test_full_config() {
        let config = PipelineConfig::from_yaml_str(
            r#"
sigfigs: 5
id_strategy: deterministic
database: /tmp/star.db
inputs:
  - source: vertnet
    path: a.txt
  - source: ebird
    path: b.txt
    skip_header: true
"#,
        )
        .unwrap();
        assert_eq!(config.sigfigs, 5);
        assert_eq!(config.id_strategy, IdStrategy::Deterministic);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/star.db"));
        assert!(config.inputs[1].skip_header);
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let err = PipelineConfig::from_yaml_str("sigfigs: 7\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_excessive_sigfigs() {
        let err = PipelineConfig::from_yaml_str(
            "sigfigs: 16\ninputs:\n  - source: gbif\n    path: x\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_sigfigs_bound() {
        assert!(validate_sigfigs(0).is_ok());
        assert!(validate_sigfigs(MAX_SIGFIGS).is_ok());
        assert!(matches!(
            validate_sigfigs(MAX_SIGFIGS + 1),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_source() {
        let err = PipelineConfig::from_yaml_str(
            "inputs:\n  - source: inaturalist\n    path: x\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("run.yaml");
        std::fs::write(
            &file,
            "database: star.db\ninputs:\n  - source: vertnet\n    path: raw/v.txt\n",
        )
        .unwrap();

        let config = PipelineConfig::load(&file).unwrap();
        assert_eq!(config.inputs[0].path, dir.path().join("raw/v.txt"));
        assert_eq!(config.database_path(), dir.path().join("star.db"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineConfig::load("/nonexistent/biostar.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
