use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names searched for, in order, when discovering a configuration file
pub const CONFIG_FILE_NAMES: [&str; 2] = [".bazel-cmake.json", "bazel-cmake.json"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct ConverterConfig {
    /// Declaration file names, first match wins (default: BUILD.bazel, BUILD)
    pub build_file_names: Vec<String>,

    /// Workspace file names, first match wins (default: WORKSPACE.bazel, WORKSPACE)
    pub workspace_file_names: Vec<String>,

    /// cc_library names that never produce output
    pub suppressed_targets: Vec<String>,

    /// File suffixes that make a library a compiled one
    pub compiled_source_suffixes: Vec<String>,

    /// copts prefix marking an include path (default: "-I")
    pub include_flag_prefix: String,

    /// Directory name prefixes that are not descended into
    pub skip_dir_prefixes: Vec<String>,

    /// Skip `load()` of external repositories instead of failing
    pub ignore_external_loads: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            build_file_names: vec!["BUILD.bazel".to_string(), "BUILD".to_string()],
            workspace_file_names: vec!["WORKSPACE.bazel".to_string(), "WORKSPACE".to_string()],
            suppressed_targets: vec!["amalgamation".to_string(), "upbc_generator".to_string()],
            compiled_source_suffixes: vec![".c".to_string(), ".cc".to_string(), ".cpp".to_string()],
            include_flag_prefix: "-I".to_string(),
            skip_dir_prefixes: vec!["bazel-".to_string(), ".".to_string()],
            ignore_external_loads: false,
        }
    }
}

impl ConverterConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the nearest configuration file at or above `start_path`, or the defaults
    pub fn discover(start_path: &Path) -> Result<Self> {
        match Self::find_config_file(start_path) {
            Some(path) => {
                tracing::debug!("Loading configuration from {:?}", path);
                Self::load_from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.build_file_names.iter().all(|name| name.trim().is_empty()) {
            return Err(Error::ConfigError(
                "build_file_names must contain at least one file name".to_string(),
            ));
        }
        if self.include_flag_prefix.is_empty() {
            return Err(Error::ConfigError(
                "include_flag_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_suppressed(&self, target: &str) -> bool {
        self.suppressed_targets.iter().any(|name| name == target)
    }

    pub fn is_compiled_source(&self, file: &str) -> bool {
        self.compiled_source_suffixes
            .iter()
            .any(|suffix| file.ends_with(suffix.as_str()))
    }

    pub fn skips_dir(&self, dir_name: &str) -> bool {
        self.skip_dir_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && dir_name.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{ "suppressed_targets": ["gen"] }"#).unwrap();

        assert_eq!(config.suppressed_targets, vec!["gen"]);
        assert_eq!(config.build_file_names, vec!["BUILD.bazel", "BUILD"]);
        assert_eq!(config.include_flag_prefix, "-I");
        assert!(!config.ignore_external_loads);
    }

    #[test]
    fn test_compiled_source_matches_suffix_only() {
        let config = ConverterConfig::default();

        assert!(config.is_compiled_source("upb/decode.c"));
        assert!(config.is_compiled_source("core.cc"));
        assert!(config.is_compiled_source("main.cpp"));
        assert!(!config.is_compiled_source("core.h"));
        assert!(!config.is_compiled_source("port_def.inc"));
        assert!(!config.is_compiled_source("file.cc.in"));
    }

    #[test]
    fn test_discover_walks_up_to_ancestor() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp.path().join(".bazel-cmake.json"),
            r#"{ "ignore_external_loads": true }"#,
        )
        .unwrap();

        let config = ConverterConfig::discover(&nested).unwrap();
        assert!(config.ignore_external_loads);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bazel-cmake.json");
        std::fs::write(&path, r#"{ "include_flag_prefix": "" }"#).unwrap();

        let err = ConverterConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_skip_prefixes() {
        let config = ConverterConfig::default();
        assert!(config.skips_dir("bazel-out"));
        assert!(config.skips_dir(".git"));
        assert!(!config.skips_dir("upb"));
    }
}
