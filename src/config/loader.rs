//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::classification::ClassificationTable;
use crate::error::{EngineError, EngineResult};
use crate::workbook::SheetLayout;

use super::types::EngineConfig;

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml   # dialect, doctorate policy, roster columns, server
/// └── layout.yaml   # sheet layout (optional, built-in layout otherwise)
/// ```
///
/// # Example
///
/// ```no_run
/// use grade_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Formula dialect: {:?}", loader.engine().dialect);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    engine: EngineConfig,
    layout: SheetLayout,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - Any file contains invalid YAML
    /// - The sheet layout fails validation
    ///
    /// # Example
    ///
    /// ```no_run
    /// use grade_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), grade_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine = Self::load_yaml::<EngineConfig>(&path.join("engine.yaml"))?;

        let layout_path = path.join("layout.yaml");
        let layout = if layout_path.exists() {
            Self::load_yaml::<SheetLayout>(&layout_path)?
        } else {
            SheetLayout::default()
        };
        layout.validate()?;

        info!(
            path = %path.display(),
            dialect = ?engine.dialect,
            doctorate_policy = ?engine.doctorate_policy,
            "configuration loaded"
        );

        Ok(Self { engine, layout })
    }

    /// Builds a loader from already parsed parts.
    pub fn from_parts(engine: EngineConfig, layout: SheetLayout) -> EngineResult<Self> {
        layout.validate()?;
        Ok(Self { engine, layout })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns the sheet layout.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    /// The classification table resolved with the configured doctorate policy.
    pub fn table(&self) -> ClassificationTable {
        ClassificationTable::with_policy(self.engine.doctorate_policy)
    }
}
