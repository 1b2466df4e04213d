//=========================================================================
// Transition Demo
//
// Runs a cold start and two navigations against a simulated scene host,
// printing the overlay state every few frames.
//
// Run with:
//   RUST_LOG=debug cargo run --example transition_demo
//
//=========================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use async_trait::async_trait;
use log::info;
use scene_conductor::prelude::*;

//=== Simulated Host ======================================================

/// Every load takes `frames_per_load` frames.
struct SimulatedHost {
    clock: FrameClock,
    frames_per_load: u64,
    loaded: Rc<RefCell<HashSet<String>>>,
}

struct SimulatedLoad {
    name: String,
    exclusive: bool,
    deferred: bool,
    activated: bool,
    started: u64,
    frames: u64,
    clock: FrameClock,
    loaded: Rc<RefCell<HashSet<String>>>,
}

impl SimulatedHost {
    fn begin(&self, name: &str, exclusive: bool, deferred: bool) -> Box<dyn LoadHandle> {
        Box::new(SimulatedLoad {
            name: name.to_string(),
            exclusive,
            deferred,
            activated: false,
            started: self.clock.frame(),
            frames: self.frames_per_load,
            clock: self.clock.clone(),
            loaded: Rc::clone(&self.loaded),
        })
    }
}

impl SceneHost for SimulatedHost {
    fn load_additive(&self, name: &str) -> Result<Box<dyn LoadHandle>, SceneError> {
        Ok(self.begin(name, false, false))
    }

    fn load_exclusive(&self, name: &str, defer_activation: bool) -> Result<Box<dyn LoadHandle>, SceneError> {
        Ok(self.begin(name, true, defer_activation))
    }

    fn is_loaded(&self, name: &str) -> bool {
        self.loaded.borrow().contains(name)
    }
}

impl LoadHandle for SimulatedLoad {
    fn progress(&self) -> f32 {
        let raw = ((self.clock.frame() - self.started) as f32 / self.frames as f32).min(1.0);
        if self.deferred && !self.activated {
            raw.min(ACTIVATION_THRESHOLD)
        } else {
            raw
        }
    }

    fn is_done(&self) -> bool {
        if self.progress() < 1.0 {
            return false;
        }
        let mut loaded = self.loaded.borrow_mut();
        if self.exclusive && !loaded.contains(&self.name) {
            loaded.clear();
        }
        loaded.insert(self.name.clone());
        true
    }

    fn allow_activation(&mut self) {
        self.activated = true;
    }
}

//=== Hooks ===============================================================

/// Logs which data the landing scene asks for.
struct RequirementReport;

#[async_trait(?Send)]
impl TransitionHooks for RequirementReport {
    async fn before_reveal(
        &self,
        landed: &str,
        requirement: Option<&SceneRequirement>,
    ) -> Result<(), TransitionError> {
        match requirement {
            Some(req) => info!(
                "{} needs user data: {}, master data: {}",
                landed, req.needs_user_data, req.needs_master_data
            ),
            None => info!("{} has no data requirements", landed),
        }
        Ok(())
    }
}

//=== Main ================================================================

const CONFIG: &str = r#"(
    essential_scenes: ["Master", "Audio"],
    fade_out_duration: 0.25,
    fade_in_duration: 0.25,
    requirements: {
        "Game": (needs_user_data: true, needs_master_data: true),
    },
)"#;

const PROFILE: &str = r#"(
    global_enabled: true,
    modules: [
        Scene((required_scene_names: ["DebugHUD"])),
    ],
)"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SceneTransitionConfig::from_ron_str(CONFIG)?;
    let profile = PolicySettings::from_ron_str(PROFILE)?;

    let clock = FrameClock::new();
    let host = Rc::new(SimulatedHost {
        clock: clock.clone(),
        frames_per_load: 6,
        loaded: Rc::new(RefCell::new(HashSet::new())),
    });
    let fader = Rc::new(FrameFader::new(clock.clone(), 30.0));
    let hooks = Rc::new(RequirementReport);

    let mut conductor = ConductorBuilder::new(config, clock, host, fader.clone())
        .with_policy(profile)
        .with_hooks(hooks)
        .build();

    conductor.bootstrap();
    conductor.request(Some("Game"));
    conductor.sender().navigate_to(Some("Credits"));

    while !conductor.is_idle() {
        let frame = conductor.tick()?;
        if frame % 5 == 0 {
            println!(
                "frame {:>4}  {:<20} alpha {:.2}  progress {:.2}",
                frame,
                format!("{:?}", conductor.state()),
                fader.alpha(),
                fader.progress()
            );
        }
    }

    for outcome in conductor.take_outcomes() {
        println!("{:?} -> {:?}", outcome.request, outcome.result);
    }

    Ok(())
}
