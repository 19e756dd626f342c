// Poll-cycle error taxonomy

use crate::docker_repo::RuntimeError;
use crate::registry::PushError;
use thiserror::Error;

/// Why a poll cycle published nothing. Every variant is cycle-scoped; the
/// worker logs it and waits for the next tick.
#[derive(Error, Debug)]
pub enum CycleError {
    /// Listing or inspecting containers failed; no mapping was built.
    #[error("container acquisition failed: {0}")]
    Acquisition(#[from] RuntimeError),
    /// The mapping was built but no container qualified.
    #[error("Empty list of environments.")]
    EmptyMapping,
    /// The registry push failed; the mapping is discarded.
    #[error("registry push failed: {0}")]
    Transport(#[from] PushError),
}

impl CycleError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Acquisition(_) => "acquisition",
            CycleError::EmptyMapping => "policy",
            CycleError::Transport(_) => "transport",
        }
    }
}
