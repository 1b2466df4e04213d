//=========================================================================
// Transition Orchestrator
//=========================================================================
//
// State machine driving a scene transition.
//
// States:
//   Idle → [Bootstrapping] → FadingOutAndLoading → ResolvingTarget
//        → LoadingMain → FadingIn → Idle
//
// Fade-out and the load sequence run concurrently (joined); fade-in
// starts only after both have finished and the pre-reveal hook ran.
// Nothing is retried. On failure the error is returned to the caller;
// with `FailurePolicy::RevealOnFailure` the fade-in still runs first.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use futures::join;
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::{
    DefaultHooks, LoadStage, SceneHost, SceneLoadSequencer, SceneTransitionConfig,
    TransitionHooks, TransitionVisual,
};
use crate::core::error::TransitionError;
use crate::core::policy::{PolicyGate, SceneDebugPolicy};
use crate::core::runtime::{CancelToken, FrameClock};

//=== TransitionState =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Idle,

    /// Cold start: exclusive load of the master scene.
    Bootstrapping,

    /// Fade-out and the incremental loads in flight together.
    FadingOutAndLoading,

    ResolvingTarget,

    /// Main scene load in flight (fade-out may still be running).
    LoadingMain,

    FadingIn,
}

//=== FailurePolicy =======================================================

/// What happens to the visual when a transition fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Return the error immediately; the screen may stay obscured.
    #[default]
    Propagate,

    /// Run the fade-in before returning the error.
    RevealOnFailure,
}

//=== TransitionOrchestrator ==============================================

/// Sequences fades and scene loads for one application.
///
/// All entry points take `&self`; a second transition requested while
/// one is in flight fails with [`TransitionError::Busy`].
pub struct TransitionOrchestrator {
    config: SceneTransitionConfig,
    gate: PolicyGate,
    host: Rc<dyn SceneHost>,
    visual: Rc<dyn TransitionVisual>,
    hooks: Rc<dyn TransitionHooks>,
    sequencer: SceneLoadSequencer,
    cancel: CancelToken,
    failure_policy: FailurePolicy,
    state: Cell<TransitionState>,
}

impl TransitionOrchestrator {
    //--- Construction -----------------------------------------------------

    pub fn new(
        config: SceneTransitionConfig,
        gate: PolicyGate,
        host: Rc<dyn SceneHost>,
        visual: Rc<dyn TransitionVisual>,
        clock: FrameClock,
    ) -> Self {
        let cancel = CancelToken::new();
        let sequencer = SceneLoadSequencer::new(
            Rc::clone(&host),
            Rc::clone(&visual),
            clock,
            cancel.clone(),
        );

        Self {
            config,
            gate,
            host,
            visual,
            hooks: Rc::new(DefaultHooks),
            sequencer,
            cancel,
            failure_policy: FailurePolicy::default(),
            state: Cell::new(TransitionState::Idle),
        }
    }

    pub fn with_hooks(mut self, hooks: Rc<dyn TransitionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> TransitionState {
        self.state.get()
    }

    pub fn config(&self) -> &SceneTransitionConfig {
        &self.config
    }

    pub fn gate(&self) -> &PolicyGate {
        &self.gate
    }

    /// Token checked on load polls, after the fade-out/load join and around
    /// the pre-reveal hook. Fade-in is not a checkpoint.
    ///
    /// The token is reset when a transition starts.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    //--- Entry Points -----------------------------------------------------

    /// Cold-start entry point.
    ///
    /// Loads the master scene (first essential scene) exclusively so no
    /// half-initialised scenes survive, then runs a normal transition with
    /// no explicit target. Returns the landing scene.
    pub async fn initialize_first_scene(&self) -> Result<String, TransitionError> {
        self.begin(TransitionState::Bootstrapping)?;
        info!("Bootstrapping first scene");

        let result = self.bootstrap().await;
        self.finish(&result);
        result
    }

    /// Transitions to `target`, or to whatever the policy or fallback
    /// decides when `target` is `None`. Returns the landing scene.
    pub async fn navigate_to_scene(&self, target: Option<&str>) -> Result<String, TransitionError> {
        self.begin(TransitionState::FadingOutAndLoading)?;
        info!("Starting transition (requested: {:?})", target);

        let result = self.transition(target).await;
        self.finish(&result);
        result
    }

    /// Landing scene for a request, as decided by the hooks.
    pub fn determine_target_scene(&self, requested: Option<&str>) -> Result<String, TransitionError> {
        self.hooks.resolve_target(requested, &self.gate, self.host.as_ref())
    }

    //--- Stages -----------------------------------------------------------

    async fn bootstrap(&self) -> Result<String, TransitionError> {
        match self.config.master_scene() {
            Some(master) => self.sequencer.load_clean(master).await?,
            None => debug!("No essential scenes configured, skipping master scene load"),
        }

        self.transition(None).await
    }

    async fn transition(&self, target: Option<&str>) -> Result<String, TransitionError> {
        self.state.set(TransitionState::FadingOutAndLoading);

        let fade_out = self.visual.fade_out(self.config.fade_out());
        let load = self.load_sequence(target);
        let ((), loaded) = join!(fade_out, load);
        debug!("Fade-out and load sequence joined");

        let prepared = match loaded {
            Ok(landed) => self.prepare_reveal(landed).await,
            Err(err) => Err(err),
        };

        let landed = match prepared {
            Ok(landed) => landed,
            Err(err) => return self.recover(err).await,
        };

        self.state.set(TransitionState::FadingIn);
        self.visual.fade_in(self.config.fade_in()).await;
        Ok(landed)
    }

    async fn load_sequence(&self, target: Option<&str>) -> Result<String, TransitionError> {
        self.hooks
            .load_stage(LoadStage::Essential(&self.config.essential_scenes), &self.sequencer)
            .await?;

        if self.gate.is_active::<SceneDebugPolicy>() {
            let policy = self.gate.settings::<SceneDebugPolicy>();
            debug!(
                "Scene debug policy active, loading {} required scene(s)",
                policy.required_scene_names.len()
            );
            self.hooks
                .load_stage(LoadStage::PolicyRequired(&policy.required_scene_names), &self.sequencer)
                .await?;
        }

        self.state.set(TransitionState::ResolvingTarget);
        let landed = self.determine_target_scene(target)?;

        self.state.set(TransitionState::LoadingMain);
        self.hooks
            .load_stage(LoadStage::Main(&landed), &self.sequencer)
            .await?;

        Ok(landed)
    }

    async fn prepare_reveal(&self, landed: String) -> Result<String, TransitionError> {
        self.cancel.check()?;
        debug!("Running pre-reveal hook for {}", landed);
        let requirement = self.config.requirement(&landed);
        self.hooks.before_reveal(&landed, requirement).await?;
        self.cancel.check()?;
        Ok(landed)
    }

    async fn recover(&self, err: TransitionError) -> Result<String, TransitionError> {
        if self.failure_policy == FailurePolicy::RevealOnFailure {
            warn!("Transition failed ({}), revealing before reporting", err);
            self.state.set(TransitionState::FadingIn);
            self.visual.fade_in(self.config.fade_in()).await;
        }
        Err(err)
    }

    //--- Internal Helpers -------------------------------------------------

    fn begin(&self, state: TransitionState) -> Result<(), TransitionError> {
        if self.state.get() != TransitionState::Idle {
            warn!("Transition requested while {:?}", self.state.get());
            return Err(TransitionError::Busy);
        }

        self.cancel.reset();
        self.state.set(state);
        Ok(())
    }

    fn finish(&self, result: &Result<String, TransitionError>) {
        self.state.set(TransitionState::Idle);
        match result {
            Ok(landed) => info!("Transition finished on {}", landed),
            Err(err) => error!("Transition failed: {}", err),
        }
    }
}

//=== Tests ===============================================================
