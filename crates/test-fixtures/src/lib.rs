//! Fixture loader for Vigil golden scenarios.
//!
//! Golden files live in the workspace-level `test-fixtures/` directory and
//! are shared by the tests of every crate.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of the fixture files.
fn fixtures_root() -> PathBuf {
    // Walk up from this crate to the directory holding `test-fixtures/golden`.
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let mut path = PathBuf::from(manifest_dir);
    while !path.join("test-fixtures").join("golden").is_dir() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures/golden from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// All JSON files in a fixture subdirectory, sorted by file name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

// ---------------------------------------------------------------------------
// Scenario schema
// ---------------------------------------------------------------------------

/// A watch evaluated over a sequence of ticks, with the expected outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub watch: ScenarioWatch,
    pub ticks: Vec<ScenarioTick>,
    pub expected_alerts: Vec<ExpectedAlert>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioWatch {
    pub name: String,
    pub series: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub red: Option<ScenarioCircumstance>,
    #[serde(default)]
    pub amber: Option<ScenarioCircumstance>,
    #[serde(default)]
    pub green: Option<ScenarioCircumstance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCircumstance {
    pub start: ScenarioCondition,
    #[serde(default)]
    pub stop: Option<ScenarioCondition>,
    #[serde(default)]
    pub suppress: Option<ScenarioSuppression>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCondition {
    pub operator: String,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub for_times: Option<usize>,
    #[serde(default)]
    pub for_millis: Option<u64>,
    #[serde(default)]
    pub on_average: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSuppression {
    pub series: String,
    pub condition: ScenarioCondition,
}

/// Samples ingested before a tick at `time`, then the expected level.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioTick {
    pub time: i64,
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default)]
    pub samples: Vec<(i64, f64)>,
    #[serde(default)]
    pub suppressing: Vec<(i64, f64)>,
    /// `null` means "no level".
    pub expected_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedAlert {
    pub serial: u64,
    pub level: String,
    pub started_at: i64,
    #[serde(default)]
    pub closed_at: Option<i64>,
}

/// Every golden scenario under `golden/scenarios`.
pub fn load_scenarios() -> Vec<Scenario> {
    list_fixtures("golden/scenarios")
        .into_iter()
        .map(|path| {
            let content = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
            serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
        })
        .collect()
}
