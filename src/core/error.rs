//=========================================================================
// Errors
//=========================================================================
//
// Error taxonomy for scene transitions.
//
//   SceneError       host-level load failures (fatal to a transition)
//   TransitionError  everything a transition entry point can return
//   ConfigError      RON parsing and validation of configuration
//   ConductorError   driver-level failures (spawn, tick budget)
//
// Policy lookup misses are not errors: they resolve to "inactive" or to a
// default-valued module.
//
//=========================================================================

//=== External Dependencies ===============================================

use futures::task::SpawnError;
use thiserror::Error;

//=== SceneError ==========================================================

/// Failure reported by the host scene engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The host does not know a scene by this name.
    #[error("scene not found: {0}")]
    NotFound(String),

    /// The host accepted the load but reported a failure while loading.
    #[error("scene {scene} failed to load: {reason}")]
    LoadFailed { scene: String, reason: String },

    /// `StartMode::Current` was requested outside an authoring context.
    #[error("no scene is open in an authoring context")]
    CurrentSceneUnavailable,
}

//=== TransitionError =====================================================

/// Error returned by the transition entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// The transition's cancel token was triggered at a suspension point.
    #[error("transition cancelled")]
    Cancelled,

    /// A transition hook reported a failure.
    #[error("transition hook failed: {0}")]
    Hook(String),

    /// A transition was requested while another one is in flight.
    #[error("a transition is already in flight")]
    Busy,
}

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

//=== ConductorError ======================================================

#[derive(Debug, Error)]
pub enum ConductorError {
    #[error("failed to spawn transition task: {0}")]
    Spawn(#[from] SpawnError),

    #[error("transitions still pending after {0} ticks")]
    TickBudgetExhausted(u64),
}
