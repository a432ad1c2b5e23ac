use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_RESULTS_ROOT: &str = "results";

fn default_results_root() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_ROOT)
}

/// Errors raised while loading the scenario configuration document.
#[derive(Debug, Error)]
pub enum ScenarioConfigError {
    #[error("failed to read scenario config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario config as toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse scenario config as json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scenario at index {index} has an empty name")]
    EmptyName { index: usize },
    #[error("duplicate scenario name '{0}'")]
    DuplicateName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioConfigFormat {
    Toml,
    Json,
}

impl ScenarioConfigFormat {
    /// Picks JSON for `*.json` paths and TOML for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// One configured allocation-pipeline run series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub total_units: Option<u64>,
    #[serde(default)]
    pub max_units_per_zone: Option<u64>,
    #[serde(default, skip_serializing)]
    pub results_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioConfigDocument {
    #[serde(default = "default_results_root")]
    pub results_root: PathBuf,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// A scenario paired with the directory its snapshots are read from.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedScenario {
    #[serde(flatten)]
    pub scenario: Scenario,
    pub results_dir: PathBuf,
}

impl ResolvedScenario {
    pub fn name(&self) -> &str {
        self.scenario.name.as_str()
    }
}

/// Immutable, validated view of one configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCatalog {
    results_root: PathBuf,
    scenarios: Vec<ResolvedScenario>,
    index: BTreeMap<String, usize>,
}

impl ScenarioCatalog {
    /// Validates `document` and resolves relative directories against `base_dir`.
    pub fn from_document(
        document: ScenarioConfigDocument,
        base_dir: &Path,
    ) -> Result<Self, ScenarioConfigError> {
        let results_root = resolve_relative(base_dir, &document.results_root);
        let mut scenarios = Vec::with_capacity(document.scenarios.len());
        let mut index = BTreeMap::new();
        for (position, scenario) in document.scenarios.into_iter().enumerate() {
            if scenario.name.trim().is_empty() {
                return Err(ScenarioConfigError::EmptyName { index: position });
            }
            if index.contains_key(&scenario.name) {
                return Err(ScenarioConfigError::DuplicateName(scenario.name));
            }
            let results_dir = match scenario.results_dir.as_deref() {
                Some(dir) => resolve_relative(base_dir, dir),
                None => results_root.join(&scenario.name),
            };
            index.insert(scenario.name.clone(), position);
            scenarios.push(ResolvedScenario {
                scenario,
                results_dir,
            });
        }
        Ok(Self {
            results_root,
            scenarios,
            index,
        })
    }

    pub fn results_root(&self) -> &Path {
        self.results_root.as_path()
    }

    pub fn scenarios(&self) -> &[ResolvedScenario] {
        self.scenarios.as_slice()
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedScenario> {
        self.index
            .get(name)
            .and_then(|position| self.scenarios.get(*position))
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

fn resolve_relative(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

pub fn parse_scenario_config(
    raw: &str,
    format: ScenarioConfigFormat,
) -> Result<ScenarioConfigDocument, ScenarioConfigError> {
    let document = match format {
        ScenarioConfigFormat::Toml => toml::from_str::<ScenarioConfigDocument>(raw)?,
        ScenarioConfigFormat::Json => serde_json::from_str::<ScenarioConfigDocument>(raw)?,
    };
    Ok(document)
}

/// Reads and validates the configuration document at `path`.
pub fn load_scenario_config(path: &Path) -> Result<ScenarioCatalog, ScenarioConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ScenarioConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_scenario_config(&raw, ScenarioConfigFormat::from_path(path))?;
    let base_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ScenarioCatalog::from_document(document, base_dir)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{
        load_scenario_config, parse_scenario_config, ScenarioCatalog, ScenarioConfigError,
        ScenarioConfigFormat,
    };

    const TOML_FIXTURE: &str = r#"
results_root = "runs"

[[scenarios]]
name = "baseline"
source_file = "data/gauges_2024.csv"
total_units = 500
max_units_per_zone = 80

[[scenarios]]
name = "levee-breach"
source_file = "data/breach.csv"
results_dir = "/srv/tide/levee"
"#;

    #[test]
    fn format_is_selected_by_extension() {
        assert_eq!(
            ScenarioConfigFormat::from_path(Path::new("config/scenarios.JSON")),
            ScenarioConfigFormat::Json
        );
        assert_eq!(
            ScenarioConfigFormat::from_path(Path::new("config/scenarios.toml")),
            ScenarioConfigFormat::Toml
        );
        assert_eq!(
            ScenarioConfigFormat::from_path(Path::new("scenarios")),
            ScenarioConfigFormat::Toml
        );
    }

    #[test]
    fn catalog_resolves_default_and_override_results_dirs() {
        let document =
            parse_scenario_config(TOML_FIXTURE, ScenarioConfigFormat::Toml).expect("parse");
        let catalog =
            ScenarioCatalog::from_document(document, Path::new("/etc/tide")).expect("catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.results_root(), Path::new("/etc/tide/runs"));

        let baseline = catalog.get("baseline").expect("baseline");
        assert_eq!(baseline.results_dir, PathBuf::from("/etc/tide/runs/baseline"));
        assert_eq!(baseline.scenario.total_units, Some(500));
        assert_eq!(baseline.scenario.max_units_per_zone, Some(80));

        let levee = catalog.get("levee-breach").expect("levee");
        assert_eq!(levee.results_dir, PathBuf::from("/srv/tide/levee"));
        assert_eq!(levee.scenario.total_units, None);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn json_document_uses_default_results_root() {
        let document = parse_scenario_config(
            r#"{"scenarios":[{"name":"baseline","source_file":"in.csv"}]}"#,
            ScenarioConfigFormat::Json,
        )
        .expect("parse");
        let catalog = ScenarioCatalog::from_document(document, Path::new("cfg")).expect("catalog");
        assert_eq!(
            catalog.get("baseline").expect("baseline").results_dir,
            PathBuf::from("cfg/results/baseline")
        );
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let duplicate = parse_scenario_config(
            "[[scenarios]]\nname = \"a\"\n[[scenarios]]\nname = \"a\"\n",
            ScenarioConfigFormat::Toml,
        )
        .expect("parse");
        let error = ScenarioCatalog::from_document(duplicate, Path::new(".")).expect_err("dup");
        assert!(matches!(error, ScenarioConfigError::DuplicateName(name) if name == "a"));

        let empty = parse_scenario_config(
            "[[scenarios]]\nname = \"  \"\n",
            ScenarioConfigFormat::Toml,
        )
        .expect("parse");
        let error = ScenarioCatalog::from_document(empty, Path::new(".")).expect_err("empty");
        assert!(matches!(error, ScenarioConfigError::EmptyName { index: 0 }));
    }

    #[test]
    fn empty_scenario_list_is_valid() {
        let document = parse_scenario_config("", ScenarioConfigFormat::Toml).expect("parse");
        let catalog = ScenarioCatalog::from_document(document, Path::new(".")).expect("catalog");
        assert!(catalog.is_empty());
    }

    #[test]
    fn load_reports_missing_and_malformed_documents() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let missing = tempdir.path().join("absent.toml");
        assert!(matches!(
            load_scenario_config(&missing),
            Err(ScenarioConfigError::Read { .. })
        ));

        let malformed = tempdir.path().join("broken.json");
        std::fs::write(&malformed, "{\"scenarios\": [").expect("write");
        assert!(matches!(
            load_scenario_config(&malformed),
            Err(ScenarioConfigError::Json(_))
        ));

        let valid = tempdir.path().join("scenarios.toml");
        std::fs::write(&valid, TOML_FIXTURE).expect("write");
        let catalog = load_scenario_config(&valid).expect("load");
        assert_eq!(
            catalog.get("baseline").expect("baseline").results_dir,
            tempdir.path().join("runs").join("baseline")
        );
    }
}
