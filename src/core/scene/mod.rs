//=========================================================================
// Scene Transitions
//=========================================================================
//
// Takes the application from one scene set to another with a fade
// masking the load work.
//
// Architecture:
//   TransitionOrchestrator
//     ├─ gate: PolicyGate            (debug overrides)
//     ├─ hooks: dyn TransitionHooks  (target, stages, pre-reveal)
//     ├─ sequencer: SceneLoadSequencer
//     │    └─ host: dyn SceneHost    (engine load primitive)
//     └─ visual: dyn TransitionVisual
//
// Flow:
//   navigate_to_scene()
//     ├─ join(fade_out, load_sequence)
//     │        essential → policy-required → resolve → main
//     ├─ before_reveal()
//     └─ fade_in()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use async_trait::async_trait;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;

//=== Module Declarations =================================================

mod config;
mod fader;
mod hooks;
mod orchestrator;
mod sequencer;
mod transition_queue;

#[cfg(test)]
pub(crate) mod test_support;

//=== Public API ==========================================================

pub use config::{SceneRequirement, SceneTransitionConfig};
pub use fader::FrameFader;
pub use hooks::{determine_target_scene, run_stage, DefaultHooks, LoadStage, TransitionHooks, FALLBACK_SCENE};
pub use orchestrator::{FailurePolicy, TransitionOrchestrator, TransitionState};
pub use sequencer::{SceneLoadSequencer, ACTIVATION_THRESHOLD};
pub use transition_queue::{TransitionQueue, TransitionRequest};

//=== LoadMode ============================================================

/// How a scene load affects the scenes already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Added next to the loaded scenes.
    Additive,

    /// Replaces every loaded scene.
    Exclusive,
}

//=== LoadHandle Trait ====================================================

/// In-flight scene load reported by the host engine.
///
/// Handles are polled once per frame; the host advances them on its own
/// update loop.
pub trait LoadHandle {
    /// Load progress in `0.0..=1.0`.
    ///
    /// Loads with deferred activation stop short of completion (typically
    /// at 0.9) until [`allow_activation`](LoadHandle::allow_activation).
    fn progress(&self) -> f32;

    fn is_done(&self) -> bool;

    /// Lets a deferred load activate its scene and finish.
    fn allow_activation(&mut self);

    /// Failure reported by the engine, if the load has failed.
    fn failure(&self) -> Option<SceneError> {
        None
    }
}

//=== SceneHost Trait =====================================================

/// Scene loading primitive supplied by the host engine.
pub trait SceneHost {
    /// Starts an additive load.
    fn load_additive(&self, name: &str) -> Result<Box<dyn LoadHandle>, SceneError>;

    /// Starts an exclusive (replace-all) load.
    ///
    /// With `defer_activation` the handle holds before activating the scene
    /// until `allow_activation` is called.
    fn load_exclusive(
        &self,
        name: &str,
        defer_activation: bool,
    ) -> Result<Box<dyn LoadHandle>, SceneError>;

    fn is_loaded(&self, name: &str) -> bool;

    /// Name of the scene open in the authoring tool.
    ///
    /// Hosts outside an authoring context return `None`.
    fn current_scene_name(&self) -> Option<String> {
        None
    }
}

//=== TransitionVisual Trait ==============================================

/// Visual effect that masks scene loading.
///
/// Fades complete after their duration or when the effect signals it is
/// done; implementations suspend on the host's frame clock.
#[async_trait(?Send)]
pub trait TransitionVisual {
    /// Obscures the screen.
    async fn fade_out(&self, duration: Duration);

    /// Reveals the screen.
    async fn fade_in(&self, duration: Duration);

    /// Reports main scene load progress in `0.0..=1.0`.
    fn set_progress(&self, progress: f32);
}
