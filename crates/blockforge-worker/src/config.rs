//! Worker configuration management

use std::path::PathBuf;

use blockforge_registry::ComposerConfig;

use crate::error::{Result, WorkerError};

/// Worker configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Composer configuration file; built-in defaults when absent
    pub config_path: Option<PathBuf>,

    /// Directory holding `*.json` block declarations
    pub blocks_dir: PathBuf,

    /// Where composed field groups are written; stdout when absent
    pub output_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            config_path: non_empty("BLOCKFORGE_CONFIG").map(PathBuf::from),
            blocks_dir: non_empty("BLOCKFORGE_BLOCKS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("blocks")),
            output_dir: non_empty("BLOCKFORGE_OUTPUT_DIR").map(PathBuf::from),
            pretty: match non_empty("BLOCKFORGE_PRETTY") {
                Some(value) => parse_bool(&value).ok_or_else(|| {
                    WorkerError::Config(format!("Invalid BLOCKFORGE_PRETTY value: {}", value))
                })?,
                None => true,
            },
        })
    }

    /// The composer configuration this worker runs with
    pub fn composer_config(&self) -> Result<ComposerConfig> {
        match &self.config_path {
            Some(path) => Ok(ComposerConfig::from_file(path)?),
            None => Ok(ComposerConfig::default()),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            blocks_dir: PathBuf::from("blocks"),
            output_dir: None,
            pretty: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, WorkerConfig::default());
    }

    #[test]
    fn test_all_variables() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("BLOCKFORGE_CONFIG", "acf.json"),
            ("BLOCKFORGE_BLOCKS_DIR", "resources/blocks"),
            ("BLOCKFORGE_OUTPUT_DIR", "build"),
            ("BLOCKFORGE_PRETTY", "false"),
        ]))
        .unwrap();

        assert_eq!(config.config_path, Some(PathBuf::from("acf.json")));
        assert_eq!(config.blocks_dir, PathBuf::from("resources/blocks"));
        assert_eq!(config.output_dir, Some(PathBuf::from("build")));
        assert!(!config.pretty);
    }

    #[test]
    fn test_invalid_pretty() {
        let err = WorkerConfig::from_lookup(lookup(&[("BLOCKFORGE_PRETTY", "sometimes")])).unwrap_err();
        assert!(matches!(err, WorkerError::Config(_)));
    }

    #[test]
    fn test_empty_output_dir_means_stdout() {
        let config = WorkerConfig::from_lookup(lookup(&[("BLOCKFORGE_OUTPUT_DIR", "")])).unwrap();
        assert!(config.output_dir.is_none());
    }
}
