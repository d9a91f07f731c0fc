// -- imports
use serde::Deserialize;
use std::path::Path;

use crate::curate::CurateArgs;
use crate::dataset::SampleArgs;
use crate::error::{AppError, Result};
use crate::sheet::SheetConfigs;

// -- config

/// Parsed configuration for one curation run.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CuratorConfig {
    pub curate: CurateArgs,
    pub sample: SampleArgs,
    pub sheet: SheetConfigs,
}

impl CuratorConfig {
    /// Parse TOML config file with explicit project root for path resolution.
    ///
    /// # Arguments
    ///
    /// * `toml_path` - Path to the TOML config file
    /// * `project_root` - Base directory for resolving relative paths
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - The path is not a valid toml file
    /// - File read fails
    /// - TOML parsing fails
    pub fn from_toml(toml_path: &Path, project_root: &Path) -> Result<Self> {
        if !toml_path.is_file() || toml_path.extension().map_or(false, |ext| ext != "toml") {
            return Err(AppError::Config(format!(
                "TOML config path is not a valid .toml file: {:?}",
                toml_path
            )));
        }

        let content = std::fs::read_to_string(toml_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.resolve_paths(project_root);

        Ok(config)
    }

    /// Resolve relative paths against project root
    fn resolve_paths(&mut self, project_root: &Path) {
        // Resolve dataset root (skip if unset)
        if !self.curate.dataset_dir.as_os_str().is_empty() && !self.curate.dataset_dir.is_absolute()
        {
            self.curate.dataset_dir = project_root.join(&self.curate.dataset_dir);
        }

        // Resolve sheet output directory
        if let Some(ref mut save_dir) = self.sheet.save_dir {
            if !save_dir.is_absolute() {
                *save_dir = project_root.join(save_dir.as_path());
            }
        }

        // Resolve caption font
        if let Some(ref mut font) = self.sheet.font {
            if !font.is_absolute() {
                *font = project_root.join(font.as_path());
            }
        }
    }
}

// -- public API

/// Parse TOML config file and return the typed curator configuration.
///
/// # Arguments
///
/// * `toml_path` - Path to the TOML config file
/// * `project_root` - Base directory for resolving relative paths
///
/// # Errors
///
/// Returns `AppError` if TOML parsing or path resolution fails.
pub fn parse_toml(toml_path: &Path, project_root: &Path) -> Result<CuratorConfig> {
    CuratorConfig::from_toml(toml_path, project_root)
}

// -- tests
