use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::scenario_config::{
    load_scenario_config, ResolvedScenario, ScenarioCatalog, ScenarioConfigError,
};

/// Lookup failure for a scenario name absent from the loaded configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("scenario '{name}' not found")]
pub struct ScenarioNotFound {
    pub name: String,
}

/// Read-mostly view of the configured scenarios.
///
/// The catalog is loaded once and only replaced by an explicit [`reload`].
///
/// [`reload`]: ScenarioRegistry::reload
#[derive(Debug)]
pub struct ScenarioRegistry {
    config_path: Option<PathBuf>,
    catalog: ArcSwap<ScenarioCatalog>,
}

impl ScenarioRegistry {
    pub fn load(config_path: &Path) -> Result<Self, ScenarioConfigError> {
        let catalog = load_scenario_config(config_path)?;
        tracing::info!(
            config = %config_path.display(),
            scenarios = catalog.len(),
            "loaded scenario configuration"
        );
        Ok(Self {
            config_path: Some(config_path.to_path_buf()),
            catalog: ArcSwap::from_pointee(catalog),
        })
    }

    /// Builds a registry that has no backing document; [`Self::reload`] is a no-op.
    pub fn from_catalog(catalog: ScenarioCatalog) -> Self {
        Self {
            config_path: None,
            catalog: ArcSwap::from_pointee(catalog),
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn catalog(&self) -> Arc<ScenarioCatalog> {
        self.catalog.load_full()
    }

    pub fn get(&self, name: &str) -> Result<ResolvedScenario, ScenarioNotFound> {
        self.catalog
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| ScenarioNotFound {
                name: name.to_string(),
            })
    }

    pub fn scenarios(&self) -> Vec<ResolvedScenario> {
        self.catalog.load().scenarios().to_vec()
    }

    pub fn len(&self) -> usize {
        self.catalog.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.load().is_empty()
    }

    /// Re-reads the configuration document and swaps it in.
    ///
    /// On failure the previously loaded catalog stays active.
    pub fn reload(&self) -> Result<usize, ScenarioConfigError> {
        let Some(config_path) = self.config_path.as_deref() else {
            return Ok(self.len());
        };
        let catalog = load_scenario_config(config_path)?;
        let count = catalog.len();
        self.catalog.store(Arc::new(catalog));
        tracing::info!(
            config = %config_path.display(),
            scenarios = count,
            "reloaded scenario configuration"
        );
        Ok(count)
    }
}
