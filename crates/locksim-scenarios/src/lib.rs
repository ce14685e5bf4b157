//! # locksim-scenarios
//!
//! Scenario definitions for the locksim simulator: the built-in `tiny`,
//! `deadlock` and `medium` scenarios, plus a JSON document format so new
//! scenarios can be loaded from a file. A scenario is plain data; all
//! validation happens in the engine's load path.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builtin;

use locksim_engine::{EngineError, EngineResult, Policy, ProcessLoad, System};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Names of the built-in scenarios, in documentation order
pub const BUILTIN_NAMES: &[&str] = &["tiny", "deadlock", "medium"];

/// Scenario loading errors
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Name does not match any built-in scenario
    #[error("unknown scenario: {0}")]
    Unknown(String),

    /// Scenario file could not be read
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file is not valid JSON for the scenario document format
    #[error("failed to parse scenario file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Scenario data was rejected by the engine's load validation
    #[error("invalid scenario data: {0}")]
    Invalid(#[from] EngineError),
}

/// Initial ledger entry and script for one process
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Maximum claim per resource type
    pub max: Vec<u32>,
    /// Units held at load time
    pub allocation: Vec<u32>,
    /// Scripted requests, front first
    #[serde(default)]
    pub script: Vec<Vec<u32>>,
}

/// A complete scenario: the initial free pool and every process entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, used for reporting
    pub name: String,
    /// Initial free units per resource type
    pub available: Vec<u32>,
    /// Process entries in id order
    pub processes: Vec<ProcessSpec>,
}

impl Scenario {
    /// Number of processes
    pub fn n(&self) -> usize {
        self.processes.len()
    }

    /// Number of resource types
    pub fn m(&self) -> usize {
        self.available.len()
    }

    /// Look up a built-in scenario by name
    pub fn by_name(name: &str) -> Result<Self, ScenarioError> {
        match name {
            "tiny" => Ok(builtin::tiny()),
            "deadlock" => Ok(builtin::deadlock()),
            "medium" => Ok(builtin::medium()),
            other => Err(ScenarioError::Unknown(other.to_string())),
        }
    }

    /// Load a scenario document from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Build and load a [`System`] running this scenario under `policy`
    pub fn build_system(&self, policy: Policy) -> EngineResult<System> {
        let mut sys = System::new(self.n(), self.m(), policy)?;
        let loads = self
            .processes
            .iter()
            .map(|p| ProcessLoad {
                max: p.max.clone(),
                allocation: p.allocation.clone(),
                script: p.script.clone(),
            })
            .collect();
        sys.load(self.available.clone(), loads)?;
        Ok(sys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_lookup() {
        for name in BUILTIN_NAMES {
            let scenario = Scenario::by_name(name).unwrap();
            assert_eq!(&scenario.name, name);
            assert!(scenario.n() > 0);
        }
        assert!(matches!(
            Scenario::by_name("huge"),
            Err(ScenarioError::Unknown(_))
        ));
    }

    #[test]
    fn test_build_system() {
        let sys = Scenario::by_name("tiny")
            .unwrap()
            .build_system(Policy::Avoidance)
            .unwrap();
        assert_eq!(sys.process_count(), 2);
        assert_eq!(sys.resource_types(), 2);
        assert_eq!(sys.available(), &[3, 3]);
    }

    #[test]
    fn test_json_file_round_trip() {
        let scenario = Scenario::by_name("medium").unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string_pretty(&scenario).unwrap().as_bytes())
            .unwrap();

        let loaded = Scenario::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, scenario);
    }

    #[test]
    fn test_json_file_errors() {
        let missing = Path::new("/nonexistent/scenario.json");
        assert!(matches!(
            Scenario::from_json_file(missing),
            Err(ScenarioError::Io(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(
            Scenario::from_json_file(file.path()),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[test]
    fn test_script_field_is_optional_in_documents() {
        let doc = r#"{
            "name": "hold-only",
            "available": [1],
            "processes": [{"max": [1], "allocation": [1]}]
        }"#;
        let scenario: Scenario = serde_json::from_str(doc).unwrap();
        assert!(scenario.processes[0].script.is_empty());
        scenario.build_system(Policy::Permissive).unwrap();
    }
}
