//! CLI error types

use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Scenario lookup, parse or validation error
    #[error("Scenario error: {0}")]
    Scenario(#[from] locksim_scenarios::ScenarioError),

    /// Engine error while building or running the simulation
    #[error("Engine error: {0}")]
    Engine(#[from] locksim_engine::EngineError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Asking for a scenario that does not exist is the one case callers
    /// scripting around the binary need to tell apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Scenario(locksim_scenarios::ScenarioError::Unknown(_)) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locksim_scenarios::ScenarioError;

    #[test]
    fn test_exit_codes() {
        let unknown = CliError::Scenario(ScenarioError::Unknown("huge".into()));
        assert_eq!(unknown.exit_code(), 2);

        let io = CliError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk on fire",
        ));
        assert_eq!(io.exit_code(), 1);
    }
}
