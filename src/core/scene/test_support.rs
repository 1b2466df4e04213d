//=========================================================================
// Test Support
//=========================================================================
//
// Scripted scene host and visual that record an ordered event log.
//
// Loads advance with the frame clock: a load issued at frame F with N
// load frames reports progress (frame - F) / N. Deferred loads hold at
// the activation threshold until activated and finish one frame later.
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use super::{LoadHandle, LoadMode, SceneHost, TransitionVisual, ACTIVATION_THRESHOLD};
use crate::core::error::SceneError;
use crate::core::runtime::{CancelToken, FrameClock, TickExecutor};

const MAX_TICKS: usize = 1_000;
const DEFAULT_LOAD_FRAMES: u64 = 2;
const DEFAULT_FADE_FRAMES: u64 = 3;

pub(crate) fn names(scenes: &[&str]) -> Vec<String> {
    scenes.iter().map(|s| s.to_string()).collect()
}

//=== Recorder ============================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recorded {
    Load { scene: String, mode: LoadMode, frame: u64 },
    Activated { scene: String, frame: u64 },
    Loaded { scene: String, frame: u64 },
    Progress(f32),
    FadeOutStart { frame: u64 },
    FadeOutEnd { frame: u64 },
    FadeInStart { frame: u64 },
    FadeInEnd { frame: u64 },
    Hook { scene: String, frame: u64 },
}

#[derive(Clone, Default)]
pub(crate) struct Recorder {
    events: Rc<RefCell<Vec<Recorded>>>,
}

impl Recorder {
    pub(crate) fn push(&self, event: Recorded) {
        self.events.borrow_mut().push(event);
    }

    pub(crate) fn events(&self) -> Vec<Recorded> {
        self.events.borrow().clone()
    }

    pub(crate) fn loads(&self) -> Vec<(String, LoadMode)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Recorded::Load { scene, mode, .. } => Some((scene.clone(), *mode)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn progress(&self) -> Vec<f32> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Recorded::Progress(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Index of the first event matching `predicate`.
    pub(crate) fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&Recorded) -> bool,
    {
        self.events.borrow().iter().position(predicate)
    }
}

//=== ScriptedHost ========================================================

struct HostState {
    loaded: RefCell<HashSet<String>>,
    load_frames: RefCell<HashMap<String, u64>>,
    failing: RefCell<HashSet<String>>,
    missing: RefCell<HashSet<String>>,
    current: RefCell<Option<String>>,
    recorder: Recorder,
}

pub(crate) struct ScriptedHost {
    clock: FrameClock,
    state: Rc<HostState>,
}

impl ScriptedHost {
    pub(crate) fn new(clock: FrameClock, recorder: Recorder) -> Self {
        Self {
            clock,
            state: Rc::new(HostState {
                loaded: RefCell::new(HashSet::new()),
                load_frames: RefCell::new(HashMap::new()),
                failing: RefCell::new(HashSet::new()),
                missing: RefCell::new(HashSet::new()),
                current: RefCell::new(None),
                recorder,
            }),
        }
    }

    pub(crate) fn preload(&self, scene: &str) {
        self.state.loaded.borrow_mut().insert(scene.to_string());
    }

    pub(crate) fn set_load_frames(&self, scene: &str, frames: u64) {
        self.state.load_frames.borrow_mut().insert(scene.to_string(), frames);
    }

    pub(crate) fn fail_scene(&self, scene: &str) {
        self.state.failing.borrow_mut().insert(scene.to_string());
    }

    pub(crate) fn forget_scene(&self, scene: &str) {
        self.state.missing.borrow_mut().insert(scene.to_string());
    }

    pub(crate) fn open_in_editor(&self, scene: &str) {
        *self.state.current.borrow_mut() = Some(scene.to_string());
    }

    fn start(&self, name: &str, mode: LoadMode, deferred: bool) -> Result<Box<dyn LoadHandle>, SceneError> {
        if self.state.missing.borrow().contains(name) {
            return Err(SceneError::NotFound(name.to_string()));
        }

        self.state.recorder.push(Recorded::Load {
            scene: name.to_string(),
            mode,
            frame: self.clock.frame(),
        });

        let frames = self
            .state
            .load_frames
            .borrow()
            .get(name)
            .copied()
            .unwrap_or(DEFAULT_LOAD_FRAMES);

        Ok(Box::new(ScriptedLoad {
            scene: name.to_string(),
            mode,
            clock: self.clock.clone(),
            state: Rc::clone(&self.state),
            started: self.clock.frame(),
            frames,
            deferred,
            fails: self.state.failing.borrow().contains(name),
            activated_at: None,
            finished: Cell::new(false),
        }))
    }
}

impl SceneHost for ScriptedHost {
    fn load_additive(&self, name: &str) -> Result<Box<dyn LoadHandle>, SceneError> {
        self.start(name, LoadMode::Additive, false)
    }

    fn load_exclusive(&self, name: &str, defer_activation: bool) -> Result<Box<dyn LoadHandle>, SceneError> {
        self.start(name, LoadMode::Exclusive, defer_activation)
    }

    fn is_loaded(&self, name: &str) -> bool {
        self.state.loaded.borrow().contains(name)
    }

    fn current_scene_name(&self) -> Option<String> {
        self.state.current.borrow().clone()
    }
}

//=== ScriptedLoad ========================================================

struct ScriptedLoad {
    scene: String,
    mode: LoadMode,
    clock: FrameClock,
    state: Rc<HostState>,
    started: u64,
    frames: u64,
    deferred: bool,
    fails: bool,
    activated_at: Option<u64>,
    finished: Cell<bool>,
}

impl ScriptedLoad {
    fn raw_progress(&self) -> f32 {
        if self.frames == 0 {
            return 1.0;
        }
        let elapsed = self.clock.frame().saturating_sub(self.started);
        (elapsed as f32 / self.frames as f32).min(1.0)
    }

    fn finish(&self) {
        if self.finished.replace(true) {
            return;
        }

        let mut loaded = self.state.loaded.borrow_mut();
        if self.mode == LoadMode::Exclusive {
            loaded.clear();
        }
        loaded.insert(self.scene.clone());

        self.state.recorder.push(Recorded::Loaded {
            scene: self.scene.clone(),
            frame: self.clock.frame(),
        });
    }
}

impl LoadHandle for ScriptedLoad {
    fn progress(&self) -> f32 {
        let raw = self.raw_progress();
        if self.deferred && self.activated_at.is_none() {
            raw.min(ACTIVATION_THRESHOLD)
        } else {
            raw
        }
    }

    fn is_done(&self) -> bool {
        if self.fails || self.raw_progress() < 1.0 {
            return false;
        }

        let done = match (self.deferred, self.activated_at) {
            (false, _) => true,
            (true, Some(frame)) => self.clock.frame() > frame,
            (true, None) => false,
        };

        if done {
            self.finish();
        }
        done
    }

    fn allow_activation(&mut self) {
        let frame = self.clock.frame();
        self.activated_at = Some(frame);
        self.state.recorder.push(Recorded::Activated {
            scene: self.scene.clone(),
            frame,
        });
    }

    fn failure(&self) -> Option<SceneError> {
        self.fails.then(|| SceneError::LoadFailed {
            scene: self.scene.clone(),
            reason: "scripted failure".to_string(),
        })
    }
}

//=== ScriptedVisual ======================================================

pub(crate) struct ScriptedVisual {
    clock: FrameClock,
    recorder: Recorder,
    fade_frames: Cell<u64>,
}

impl ScriptedVisual {
    pub(crate) fn new(clock: FrameClock, recorder: Recorder) -> Self {
        Self {
            clock,
            recorder,
            fade_frames: Cell::new(DEFAULT_FADE_FRAMES),
        }
    }

    pub(crate) fn set_fade_frames(&self, frames: u64) {
        self.fade_frames.set(frames);
    }
}

#[async_trait(?Send)]
impl TransitionVisual for ScriptedVisual {
    async fn fade_out(&self, _duration: Duration) {
        self.recorder.push(Recorded::FadeOutStart { frame: self.clock.frame() });
        self.clock.frames(self.fade_frames.get()).await;
        self.recorder.push(Recorded::FadeOutEnd { frame: self.clock.frame() });
    }

    async fn fade_in(&self, _duration: Duration) {
        self.recorder.push(Recorded::FadeInStart { frame: self.clock.frame() });
        self.clock.frames(self.fade_frames.get()).await;
        self.recorder.push(Recorded::FadeInEnd { frame: self.clock.frame() });
    }

    fn set_progress(&self, progress: f32) {
        self.recorder.push(Recorded::Progress(progress));
    }
}

//=== Fixture =============================================================

pub(crate) struct Fixture {
    pub(crate) executor: TickExecutor,
    pub(crate) clock: FrameClock,
    pub(crate) cancel: CancelToken,
    pub(crate) recorder: Recorder,
    pub(crate) host: Rc<ScriptedHost>,
    pub(crate) visual: Rc<ScriptedVisual>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let executor = TickExecutor::new();
        let clock = executor.clock().clone();
        let recorder = Recorder::default();

        Self {
            host: Rc::new(ScriptedHost::new(clock.clone(), recorder.clone())),
            visual: Rc::new(ScriptedVisual::new(clock.clone(), recorder.clone())),
            cancel: CancelToken::new(),
            executor,
            clock,
            recorder,
        }
    }

    /// Drives `future` to completion on the fixture's executor.
    pub(crate) fn run<F, T>(&mut self, future: F) -> T
    where
        F: Future<Output = T> + 'static,
        T: 'static,
    {
        let slot = Rc::new(RefCell::new(None));
        let output = Rc::clone(&slot);
        self.executor
            .spawn(async move {
                *output.borrow_mut() = Some(future.await);
            })
            .expect("spawn test task");

        self.executor.run_until_stalled();
        for _ in 0..MAX_TICKS {
            let value = slot.borrow_mut().take();
            if let Some(value) = value {
                return value;
            }
            self.executor.tick();
        }
        panic!("test task did not finish within {MAX_TICKS} ticks");
    }
}
