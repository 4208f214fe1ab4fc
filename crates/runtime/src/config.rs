// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Loader configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! model_path = "./models/add.pte"   # optional, bundled model when absent
//! method_name = "forward"
//! num_inputs = 2
//! num_outputs = 1
//! method_pool = "16K"
//! temp_pool = "2K"
//! enable_profiling = true
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use crate::LoaderError;
use memory_manager::MemoryBudget;
use std::path::{Path, PathBuf};

/// Configuration for a [`ProgramLoader`](crate::ProgramLoader).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Program file to load; the bundled model is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    /// Entry point to instantiate.
    pub method_name: String,
    /// Number of inputs the entry point must declare.
    pub num_inputs: usize,
    /// Number of outputs the entry point must declare.
    pub num_outputs: usize,
    /// Method arena size (human-readable, e.g. `"16K"`).
    pub method_pool: String,
    /// Temp arena size (human-readable, e.g. `"2K"`).
    pub temp_pool: String,
    /// Whether to record per-call timing metrics.
    pub enable_profiling: bool,
}

impl LoaderConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, LoaderError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoaderError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, LoaderError> {
        toml::from_str(toml_str).map_err(|e| LoaderError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, LoaderError> {
        toml::to_string_pretty(self)
            .map_err(|e| LoaderError::Config(format!("TOML serialise error: {e}")))
    }

    /// Parses the method pool size.
    pub fn method_budget(&self) -> Result<MemoryBudget, LoaderError> {
        MemoryBudget::parse(&self.method_pool)
            .map_err(|e| LoaderError::Config(format!("invalid method_pool: {e}")))
    }

    /// Parses the temp pool size.
    pub fn temp_budget(&self) -> Result<MemoryBudget, LoaderError> {
        MemoryBudget::parse(&self.temp_pool)
            .map_err(|e| LoaderError::Config(format!("invalid temp_pool: {e}")))
    }

    /// Checks that the configuration can drive a loader.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.method_name.is_empty() {
            return Err(LoaderError::Config("method_name must not be empty".into()));
        }
        if self.num_outputs == 0 {
            return Err(LoaderError::Config("num_outputs must be at least 1".into()));
        }
        self.method_budget()?;
        self.temp_budget()?;
        Ok(())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            method_name: "forward".to_string(),
            num_inputs: 2,
            num_outputs: 1,
            method_pool: "16K".to_string(),
            temp_pool: "2K".to_string(),
            enable_profiling: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = LoaderConfig::default();
        assert_eq!(c.method_name, "forward");
        assert_eq!(c.num_inputs, 2);
        assert_eq!(c.num_outputs, 1);
        assert_eq!(c.method_budget().unwrap().as_bytes(), 16 * 1024);
        assert_eq!(c.temp_budget().unwrap().as_bytes(), 2 * 1024);
        assert!(c.model_path.is_none());
        assert!(c.enable_profiling);
        c.validate().unwrap();
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
model_path = "/tmp/model.pte"
method_name = "predict"
num_inputs = 3
method_pool = "64K"
enable_profiling = false
"#;
        let c = LoaderConfig::from_toml(toml).unwrap();
        assert_eq!(c.model_path, Some(PathBuf::from("/tmp/model.pte")));
        assert_eq!(c.method_name, "predict");
        assert_eq!(c.num_inputs, 3);
        assert_eq!(c.num_outputs, 1);
        assert_eq!(c.method_budget().unwrap().as_kb(), 64);
        assert_eq!(c.temp_pool, "2K");
        assert!(!c.enable_profiling);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(LoaderConfig::from_toml("").unwrap(), LoaderConfig::default());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = LoaderConfig {
            model_path: Some(PathBuf::from("models/add.pte")),
            temp_pool: "4K".into(),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        assert_eq!(LoaderConfig::from_toml(&toml).unwrap(), c);

        let default_toml = LoaderConfig::default().to_toml().unwrap();
        assert!(!default_toml.contains("model_path"));
    }

    #[test]
    fn test_invalid_budget() {
        let c = LoaderConfig {
            method_pool: "lots".into(),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(LoaderError::Config(msg)) if msg.contains("method_pool")));
    }

    #[test]
    fn test_zero_outputs_rejected() {
        let c = LoaderConfig {
            num_outputs: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loader.toml");
        std::fs::write(&path, "temp_pool = \"512\"\n").unwrap();
        let c = LoaderConfig::from_file(&path).unwrap();
        assert_eq!(c.temp_budget().unwrap().as_bytes(), 512);

        assert!(LoaderConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
