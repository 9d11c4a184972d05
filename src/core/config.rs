//! Configuration structures for jarsigner-command
//!
//! This module provides the serde model of `.jarsigner.yaml` and the lookup of the
//! jarsigner executable.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the jarsigner executable on this platform
#[cfg(target_os = "windows")]
pub const JARSIGNER_FILENAME: &str = "jarsigner.exe";

/// File name of the jarsigner executable on this platform
#[cfg(not(target_os = "windows"))]
pub const JARSIGNER_FILENAME: &str = "jarsigner";

/// Root configuration object
///
/// Passwords are deliberately absent; they are only read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct JarSignerConfig {
    /// Explicit path of the jarsigner executable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,

    /// JDK installation used to locate jarsigner when no executable is set
    #[serde(skip_serializing_if = "Option::is_none", rename = "javaHome")]
    pub java_home: Option<PathBuf>,

    /// Default keystore location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore: Option<String>,

    /// Default keystore type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storetype: Option<String>,

    /// Default keystore alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Default Time Stamping Authority URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsa: Option<String>,

    /// Default maximum heap of the jarsigner JVM
    #[serde(skip_serializing_if = "Option::is_none", rename = "maxMemory")]
    pub max_memory: Option<String>,

    /// Enable verbose jarsigner output (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl JarSignerConfig {
    /// Resolves the jarsigner executable
    ///
    /// Order: explicit `executable`, `<javaHome>/bin/jarsigner` if that file exists,
    /// then the bare file name to be looked up on `PATH`.
    pub fn resolve_executable(&self) -> PathBuf {
        if let Some(executable) = &self.executable {
            return executable.clone();
        }

        if let Some(candidate) = self.java_home.as_deref().map(jarsigner_in_java_home)
            && candidate.is_file()
        {
            return candidate;
        }

        PathBuf::from(JARSIGNER_FILENAME)
    }
}

fn jarsigner_in_java_home(java_home: &Path) -> PathBuf {
    java_home.join("bin").join(JARSIGNER_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
javaHome: /usr/lib/jvm/default
keystore: release.p12
storetype: PKCS12
maxMemory: 512m
verbose: true
"#;
        let config: JarSignerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.java_home, Some(PathBuf::from("/usr/lib/jvm/default")));
        assert_eq!(config.storetype.as_deref(), Some("PKCS12"));
        assert_eq!(config.max_memory.as_deref(), Some("512m"));
        assert_eq!(config.verbose, Some(true));
        assert!(config.executable.is_none());
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let config = JarSignerConfig {
            tsa: Some("http://tsa.example.com".to_string()),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.starts_with("tsa:"));
        assert!(!yaml.contains("executable"));
        assert!(!yaml.contains("javaHome"));
    }

    #[test]
    fn test_resolve_explicit_executable() {
        let config = JarSignerConfig {
            executable: Some(PathBuf::from("/opt/jdk/bin/jarsigner")),
            java_home: Some(PathBuf::from("/usr/lib/jvm/other")),
            ..Default::default()
        };
        assert_eq!(config.resolve_executable(), PathBuf::from("/opt/jdk/bin/jarsigner"));
    }

    #[test]
    fn test_resolve_from_java_home() {
        let java_home = TempDir::new().unwrap();
        std::fs::create_dir(java_home.path().join("bin")).unwrap();
        let jarsigner = java_home.path().join("bin").join(JARSIGNER_FILENAME);
        std::fs::write(&jarsigner, "").unwrap();

        let config = JarSignerConfig {
            java_home: Some(java_home.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(config.resolve_executable(), jarsigner);
    }

    #[test]
    fn test_resolve_falls_back_to_path_lookup() {
        let java_home = TempDir::new().unwrap();
        let config = JarSignerConfig {
            java_home: Some(java_home.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(config.resolve_executable(), PathBuf::from(JARSIGNER_FILENAME));
    }
}
