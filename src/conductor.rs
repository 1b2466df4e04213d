//=========================================================================
// Conductor
//
// Host-facing driver for scene transitions.
//
// Architecture:
// ```text
//     ConductorBuilder  ──build()──>  Conductor  ──tick()──>  [per frame]
//         │                              │
//         ├─ with_policy()               ├─ drains requests (channel + queue)
//         ├─ with_hooks()                ├─ starts next transition when idle
//         ├─ with_failure_policy()       └─ advances the clock one frame
//         └─ with_request_capacity()
// ```
//
// The clock passed to the builder is the one the executor advances. Host
// and visual must suspend on that same clock.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::{ConductorError, TransitionError};
use crate::core::policy::{PolicyGate, PolicySettings};
use crate::core::runtime::{FrameClock, TickExecutor};
use crate::core::scene::{
    DefaultHooks, FailurePolicy, SceneHost, SceneTransitionConfig, TransitionHooks,
    TransitionOrchestrator, TransitionQueue, TransitionRequest, TransitionState, TransitionVisual,
};

//=== TransitionOutcome ===================================================

/// Result of one finished transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub request: TransitionRequest,

    /// Landing scene, or why the transition failed.
    pub result: Result<String, TransitionError>,
}

//=== RequestSender =======================================================

/// Thread-safe handle for queueing transition requests.
///
/// Requests sent here are picked up at the conductor's next tick.
#[derive(Debug, Clone)]
pub struct RequestSender {
    sender: Sender<TransitionRequest>,
}

impl RequestSender {
    /// Queues a request. Returns `false` if the request buffer is full or
    /// the conductor is gone.
    pub fn send(&self, request: TransitionRequest) -> bool {
        match self.sender.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(request)) => {
                warn!("Request buffer full, dropping {:?}", request);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn navigate_to(&self, target: Option<&str>) -> bool {
        self.send(TransitionRequest::NavigateTo(target.map(str::to_string)))
    }
}

//=== ConductorBuilder ====================================================

/// Builder for configuring and constructing a [`Conductor`].
///
/// # Default Values
///
/// - **Policy**: global switch on, no modules (every module inactive)
/// - **Hooks**: [`DefaultHooks`]
/// - **Failure policy**: [`FailurePolicy::Propagate`]
/// - **Request capacity**: 32
///
/// # Example
///
/// ```rust
/// # use std::rc::Rc;
/// # use scene_conductor::prelude::*;
/// # struct Host;
/// # impl SceneHost for Host {
/// #     fn load_additive(&self, n: &str) -> Result<Box<dyn LoadHandle>, SceneError> { Err(SceneError::NotFound(n.into())) }
/// #     fn load_exclusive(&self, n: &str, _: bool) -> Result<Box<dyn LoadHandle>, SceneError> { Err(SceneError::NotFound(n.into())) }
/// #     fn is_loaded(&self, _: &str) -> bool { false }
/// # }
/// let clock = FrameClock::new();
/// let fader = Rc::new(FrameFader::new(clock.clone(), 60.0));
///
/// let mut conductor = ConductorBuilder::new(SceneTransitionConfig::default(), clock, Rc::new(Host), fader)
///     .with_policy(PolicySettings::disabled())
///     .build();
///
/// conductor.bootstrap();
/// ```
pub struct ConductorBuilder {
    config: SceneTransitionConfig,
    policy: PolicySettings,
    host: Rc<dyn SceneHost>,
    visual: Rc<dyn TransitionVisual>,
    hooks: Rc<dyn TransitionHooks>,
    clock: FrameClock,
    failure_policy: FailurePolicy,
    request_capacity: usize,
}

impl ConductorBuilder {
    /// Creates a new builder with default settings.
    ///
    /// `clock` is advanced once per [`Conductor::tick`]; build the host and
    /// visual on a clone of it.
    pub fn new(
        config: SceneTransitionConfig,
        clock: FrameClock,
        host: Rc<dyn SceneHost>,
        visual: Rc<dyn TransitionVisual>,
    ) -> Self {
        Self {
            config,
            policy: PolicySettings::default(),
            host,
            visual,
            hooks: Rc::new(DefaultHooks),
            clock,
            failure_policy: FailurePolicy::default(),
            request_capacity: 32,
        }
    }

    /// Sets the active debug profile.
    pub fn with_policy(mut self, policy: PolicySettings) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hooks(mut self, hooks: Rc<dyn TransitionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Sets the buffer size of the cross-thread request channel.
    ///
    /// Default: 32
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_request_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Request capacity must be positive");
        self.request_capacity = capacity;
        self
    }

    /// Builds the conductor.
    pub fn build(self) -> Conductor {
        info!(
            "Building conductor ({} essential scene(s), policy {})",
            self.config.essential_scenes.len(),
            if self.policy.is_globally_enabled() { "on" } else { "off" }
        );

        let orchestrator = TransitionOrchestrator::new(
            self.config,
            PolicyGate::new(self.policy),
            self.host,
            self.visual,
            self.clock.clone(),
        )
        .with_hooks(self.hooks)
        .with_failure_policy(self.failure_policy);

        let (sender, receiver) = bounded(self.request_capacity);

        Conductor {
            orchestrator: Rc::new(orchestrator),
            executor: TickExecutor::with_clock(self.clock),
            queue: TransitionQueue::new(),
            sender,
            receiver,
            outcomes: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

//=== Conductor ===========================================================

/// Runs queued transitions on the host's frame loop.
pub struct Conductor {
    orchestrator: Rc<TransitionOrchestrator>,
    executor: TickExecutor,
    queue: TransitionQueue,
    sender: Sender<TransitionRequest>,
    receiver: Receiver<TransitionRequest>,
    outcomes: Rc<RefCell<Vec<TransitionOutcome>>>,
}

impl Conductor {
    //--- Requests ---------------------------------------------------------

    /// Queues the cold-start transition.
    pub fn bootstrap(&mut self) {
        self.queue.push(TransitionRequest::InitializeFirstScene);
    }

    /// Queues a transition to `target` (policy or fallback when `None`).
    pub fn request(&mut self, target: Option<&str>) {
        self.queue
            .push(TransitionRequest::NavigateTo(target.map(str::to_string)));
    }

    /// Handle for queueing requests from other threads.
    pub fn sender(&self) -> RequestSender {
        RequestSender {
            sender: self.sender.clone(),
        }
    }

    /// Cancels the in-flight transition at its next suspension point.
    pub fn cancel_current(&self) {
        self.orchestrator.cancel_token().cancel();
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> TransitionState {
        self.orchestrator.state()
    }

    pub fn frame(&self) -> u64 {
        self.executor.clock().frame()
    }

    pub fn orchestrator(&self) -> &TransitionOrchestrator {
        &self.orchestrator
    }

    /// Number of requests waiting to start.
    pub fn pending(&self) -> usize {
        self.queue.len() + self.receiver.len()
    }

    /// True when nothing is queued and no transition is in flight.
    pub fn is_idle(&self) -> bool {
        self.pending() == 0 && self.executor.is_idle()
    }

    /// Drains the outcomes of transitions finished so far.
    pub fn take_outcomes(&mut self) -> Vec<TransitionOutcome> {
        std::mem::take(&mut *self.outcomes.borrow_mut())
    }

    //--- Frame Loop -------------------------------------------------------

    /// Advances transitions by one host frame.
    ///
    /// Each tick:
    ///  1. Collects requests sent through [`RequestSender`]s
    ///  2. Starts the oldest queued request if no transition is in flight
    ///  3. Advances the executor one frame
    ///
    /// Returns the new frame number.
    pub fn tick(&mut self) -> Result<u64, ConductorError> {
        self.collect_requests();

        if self.executor.is_idle() {
            if let Some(request) = self.queue.pop_next() {
                self.start(request)?;
            }
        } else if !self.queue.is_empty() {
            debug!("{} request(s) waiting for the current transition", self.queue.len());
        }

        Ok(self.executor.tick())
    }

    /// Ticks until every queued transition has finished.
    ///
    /// Returns the number of ticks taken.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> Result<u64, ConductorError> {
        for ticks in 0..max_ticks {
            if self.is_idle() {
                return Ok(ticks);
            }
            self.tick()?;
        }

        if self.is_idle() {
            Ok(max_ticks)
        } else {
            Err(ConductorError::TickBudgetExhausted(max_ticks))
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn collect_requests(&mut self) {
        while let Ok(request) = self.receiver.try_recv() {
            self.queue.push(request);
        }
    }

    fn start(&mut self, request: TransitionRequest) -> Result<(), ConductorError> {
        debug!("Starting {:?} at frame {}", request, self.frame());

        let orchestrator = Rc::clone(&self.orchestrator);
        let outcomes = Rc::clone(&self.outcomes);

        self.executor.spawn(async move {
            let result = match &request {
                TransitionRequest::InitializeFirstScene => orchestrator.initialize_first_scene().await,
                TransitionRequest::NavigateTo(target) => {
                    orchestrator.navigate_to_scene(target.as_deref()).await
                }
            };
            outcomes.borrow_mut().push(TransitionOutcome { request, result });
        })?;

        Ok(())
    }
}

//=== Tests ===============================================================
