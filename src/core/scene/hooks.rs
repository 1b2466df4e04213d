//=========================================================================
// Transition Hooks
//=========================================================================
//
// Capability interface injected into the orchestrator to customise a
// transition without replacing it:
//
//   resolve_target   which scene to land on
//   load_stage       how each load stage runs
//   before_reveal    extra async work between load and fade-in
//
// Every method has a default that reproduces the standard behavior.
//
//=========================================================================

//=== External Dependencies ===============================================

use async_trait::async_trait;
use log::debug;

//=== Internal Dependencies ===============================================

use super::{SceneHost, SceneLoadSequencer, SceneRequirement};
use crate::core::error::{SceneError, TransitionError};
use crate::core::policy::{PolicyGate, SceneDebugPolicy, StartMode};

//=== Constants ===========================================================

/// Landing scene when neither policy nor caller names one.
pub const FALLBACK_SCENE: &str = "TitleScene";

//=== LoadStage ===========================================================

/// One step of the load sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage<'a> {
    /// Essential scenes, loaded incrementally.
    Essential(&'a [String]),

    /// Scenes required by the active scene debug policy, loaded incrementally.
    PolicyRequired(&'a [String]),

    /// The exclusive landing scene load.
    Main(&'a str),
}

//=== TransitionHooks Trait ===============================================

/// Customisation points of a transition.
///
/// # Example
///
/// ```rust
/// # use async_trait::async_trait;
/// # use scene_conductor::core::error::TransitionError;
/// # use scene_conductor::core::scene::{SceneRequirement, TransitionHooks};
/// struct FetchProfile;
///
/// #[async_trait(?Send)]
/// impl TransitionHooks for FetchProfile {
///     async fn before_reveal(
///         &self,
///         landed: &str,
///         requirement: Option<&SceneRequirement>,
///     ) -> Result<(), TransitionError> {
///         if requirement.is_some_and(|r| r.needs_user_data) {
///             // fetch user data for `landed` here
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait TransitionHooks {
    /// Picks the landing scene. Defaults to [`determine_target_scene`].
    fn resolve_target(
        &self,
        requested: Option<&str>,
        gate: &PolicyGate,
        host: &dyn SceneHost,
    ) -> Result<String, TransitionError> {
        determine_target_scene(requested, gate, host)
    }

    /// Runs one load stage. Defaults to [`run_stage`].
    async fn load_stage(
        &self,
        stage: LoadStage<'_>,
        sequencer: &SceneLoadSequencer,
    ) -> Result<(), TransitionError> {
        run_stage(stage, sequencer).await
    }

    /// Runs after loading completes and before the fade-in starts.
    ///
    /// `requirement` is the configured entry for `landed`, if any.
    async fn before_reveal(
        &self,
        _landed: &str,
        _requirement: Option<&SceneRequirement>,
    ) -> Result<(), TransitionError> {
        Ok(())
    }
}

/// Hooks with every default in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl TransitionHooks for DefaultHooks {}

//=== Default Behavior ====================================================

/// Standard stage execution: incremental loads for scene lists, the
/// deferred exclusive load for the main scene.
pub async fn run_stage(stage: LoadStage<'_>, sequencer: &SceneLoadSequencer) -> Result<(), TransitionError> {
    match stage {
        LoadStage::Essential(scenes) | LoadStage::PolicyRequired(scenes) => {
            sequencer.load_incremental(scenes).await.map(|_| ())
        }
        LoadStage::Main(scene) => sequencer.load_main(scene).await,
    }
}

/// Standard landing scene resolution.
///
/// With the scene debug policy active, `Designated` lands on the
/// designated scene when one is named and `Current` lands on the scene
/// open in the authoring tool (failing outside one). Everything else
/// lands on `requested`, or [`FALLBACK_SCENE`] when absent.
pub fn determine_target_scene(
    requested: Option<&str>,
    gate: &PolicyGate,
    host: &dyn SceneHost,
) -> Result<String, TransitionError> {
    if gate.is_active::<SceneDebugPolicy>() {
        let policy = gate.settings::<SceneDebugPolicy>();
        match policy.start_mode {
            StartMode::Designated if !policy.designated_scene_name.is_empty() => {
                debug!("Policy designates landing scene {}", policy.designated_scene_name);
                return Ok(policy.designated_scene_name.clone());
            }
            StartMode::Current => {
                let current = host
                    .current_scene_name()
                    .ok_or(SceneError::CurrentSceneUnavailable)?;
                debug!("Policy lands on the open scene {}", current);
                return Ok(current);
            }
            StartMode::Designated | StartMode::Default => {}
        }
    }

    Ok(requested.unwrap_or(FALLBACK_SCENE).to_string())
}

//=== Tests ===============================================================
