use serde::{Deserialize, Serialize};

/// Where a worker is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Spawned, no events delivered yet
    Parsed,
    Installing,
    /// Installed and waiting to be activated
    Installed,
    Activating,
    /// Controls pages: fetches are intercepted, push and clicks delivered
    Activated,
    /// Installation failed, the worker will never run
    Redundant,
}

impl WorkerState {
    pub fn controls_pages(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Parsed => write!(f, "parsed"),
            WorkerState::Installing => write!(f, "installing"),
            WorkerState::Installed => write!(f, "installed"),
            WorkerState::Activating => write!(f, "activating"),
            WorkerState::Activated => write!(f, "activated"),
            WorkerState::Redundant => write!(f, "redundant"),
        }
    }
}
