//! Configuration file loader for jarsigner-command
//!
//! This module provides configuration loading and merging.

use super::config::JarSignerConfig;
use crate::core::error::JarSignerError;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name
pub const CONFIG_FILENAME: &str = ".jarsigner.yaml";

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// Project path to load `.jarsigner.yaml` from
    pub project_path: PathBuf,

    /// Explicit config file; replaces the project config and must exist
    pub config_file: Option<PathBuf>,

    /// CLI arguments (highest priority)
    pub cli_args: Option<JarSignerConfig>,

    /// Environment variables
    pub env: HashMap<String, String>,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Explicit config file, or the project config (./.jarsigner.yaml)
    /// 4. Default values
    pub fn load(options: ConfigLoadOptions) -> Result<JarSignerConfig, JarSignerError> {
        let mut configs: Vec<JarSignerConfig> = Vec::new();

        let file_config = match &options.config_file {
            Some(path) => Some(Self::load_config_file(path)?.ok_or_else(|| {
                JarSignerError::ConfigLoad {
                    path: path.clone(),
                    message: "file does not exist".to_string(),
                }
            })?),
            None => Self::load_config_file(&options.project_path.join(CONFIG_FILENAME))?,
        };
        if let Some(file_config) = file_config {
            configs.push(file_config);
        }

        if let Some(env_config) = Self::load_env_config(&options.env) {
            configs.push(env_config);
        }

        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        Ok(Self::merge_configs(configs))
    }

    /// Load configuration from a YAML file, `None` if it does not exist
    fn load_config_file(file_path: &Path) -> Result<Option<JarSignerConfig>, JarSignerError> {
        if !file_path.exists() {
            debug!("No configuration file at {}", file_path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(file_path).map_err(|e| JarSignerError::ConfigLoad {
            path: file_path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: JarSignerConfig =
            serde_yaml::from_str(&content).map_err(|e| JarSignerError::ConfigLoad {
                path: file_path.to_path_buf(),
                message: format!("Failed to parse YAML config: {}", e),
            })?;

        debug!("Loaded configuration from {}", file_path.display());
        Ok(Some(config))
    }

    /// Load configuration from environment variables
    fn load_env_config(env: &HashMap<String, String>) -> Option<JarSignerConfig> {
        let get = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

        let config = JarSignerConfig {
            executable: get("JARSIGNER_EXECUTABLE").map(PathBuf::from),
            java_home: get("JAVA_HOME").map(PathBuf::from),
            keystore: get("JARSIGNER_KEYSTORE"),
            storetype: get("JARSIGNER_STORETYPE"),
            alias: get("JARSIGNER_ALIAS"),
            tsa: get("JARSIGNER_TSA"),
            max_memory: None,
            verbose: None,
        };

        if config == JarSignerConfig::default() {
            None
        } else {
            Some(config)
        }
    }

    /// Merge multiple configurations with priority
    fn merge_configs(configs: Vec<JarSignerConfig>) -> JarSignerConfig {
        let mut result = JarSignerConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    /// Merge source config into target
    fn merge_into(target: &mut JarSignerConfig, source: JarSignerConfig) {
        if source.executable.is_some() {
            target.executable = source.executable;
        }
        if source.java_home.is_some() {
            target.java_home = source.java_home;
        }
        if source.keystore.is_some() {
            target.keystore = source.keystore;
        }
        if source.storetype.is_some() {
            target.storetype = source.storetype;
        }
        if source.alias.is_some() {
            target.alias = source.alias;
        }
        if source.tsa.is_some() {
            target.tsa = source.tsa;
        }
        if source.max_memory.is_some() {
            target.max_memory = source.max_memory;
        }
        if source.verbose.is_some() {
            target.verbose = source.verbose;
        }
    }
}
