//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use scene_conductor::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Driver
pub use crate::conductor::{Conductor, ConductorBuilder, RequestSender, TransitionOutcome};

// Errors
pub use crate::core::error::{ConductorError, ConfigError, SceneError, TransitionError};

// Policy
pub use crate::core::policy::{PolicyGate, PolicyModule, PolicySettings, SceneDebugPolicy, SceneRef, StartMode};

// Runtime
pub use crate::core::runtime::{CancelToken, FrameClock, TickExecutor};

// Scene transitions
pub use crate::core::scene::{
    FailurePolicy, FrameFader, LoadHandle, LoadMode, LoadStage, SceneHost, SceneRequirement,
    SceneTransitionConfig, TransitionHooks, TransitionOrchestrator, TransitionRequest,
    TransitionState, TransitionVisual, ACTIVATION_THRESHOLD,
};
