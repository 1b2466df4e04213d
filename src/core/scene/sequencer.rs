//=========================================================================
// Scene Load Sequencer
//=========================================================================
//
// Ordered scene loading on top of the host's load primitive.
//
//   load_incremental  additive, one at a time, skips loaded/empty names
//   load_main         exclusive, deferred activation, progress reporting
//   load_clean        exclusive, immediate activation (cold start)
//
// Every poll that finds a load unfinished checks the cancel token and
// yields one frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{LoadHandle, SceneHost, TransitionVisual};
use crate::core::error::TransitionError;
use crate::core::runtime::{CancelToken, FrameClock};

//=== Constants ===========================================================

/// Progress at which a deferred main load is ready to activate.
pub const ACTIVATION_THRESHOLD: f32 = 0.9;

//=== SceneLoadSequencer ==================================================

pub struct SceneLoadSequencer {
    host: Rc<dyn SceneHost>,
    visual: Rc<dyn TransitionVisual>,
    clock: FrameClock,
    cancel: CancelToken,
}

impl SceneLoadSequencer {
    pub fn new(
        host: Rc<dyn SceneHost>,
        visual: Rc<dyn TransitionVisual>,
        clock: FrameClock,
        cancel: CancelToken,
    ) -> Self {
        Self {
            host,
            visual,
            clock,
            cancel,
        }
    }

    //--- Loading ----------------------------------------------------------

    /// Loads each scene additively, in order, waiting for each load to
    /// finish before starting the next.
    ///
    /// Empty names and scenes the host already reports as loaded are
    /// skipped, so duplicates load once. Returns the number of loads issued.
    pub async fn load_incremental(&self, names: &[String]) -> Result<usize, TransitionError> {
        let mut issued = 0;

        for name in names {
            if name.is_empty() {
                debug!("Skipping empty scene name");
                continue;
            }
            if self.host.is_loaded(name) {
                debug!("Scene {} already loaded, skipping", name);
                continue;
            }

            debug!("Loading scene {} additively", name);
            let handle = self.host.load_additive(name)?;
            self.wait_until_done(handle.as_ref()).await?;
            issued += 1;
        }

        Ok(issued)
    }

    /// Loads the landing scene exclusively with deferred activation.
    ///
    /// Progress is forwarded to the visual every frame until the load
    /// reaches [`ACTIVATION_THRESHOLD`]; then progress is reported as
    /// complete, activation is allowed, and the call waits for the host
    /// to finish.
    pub async fn load_main(&self, name: &str) -> Result<(), TransitionError> {
        debug!("Loading main scene {}", name);
        let mut handle = self.host.load_exclusive(name, true)?;

        loop {
            if let Some(failure) = handle.failure() {
                return Err(failure.into());
            }

            let progress = handle.progress();
            if progress >= ACTIVATION_THRESHOLD {
                break;
            }

            self.visual.set_progress(progress);
            self.cancel.check()?;
            self.clock.next_frame().await;
        }

        self.visual.set_progress(1.0);
        debug!("Activating main scene {}", name);
        handle.allow_activation();

        self.wait_until_done(handle.as_ref()).await
    }

    /// Loads a scene exclusively and waits for it, replacing whatever was
    /// open.
    pub async fn load_clean(&self, name: &str) -> Result<(), TransitionError> {
        debug!("Loading scene {} exclusively", name);
        let handle = self.host.load_exclusive(name, false)?;
        self.wait_until_done(handle.as_ref()).await
    }

    //--- Internal Helpers -------------------------------------------------

    async fn wait_until_done(&self, handle: &dyn LoadHandle) -> Result<(), TransitionError> {
        loop {
            if let Some(failure) = handle.failure() {
                return Err(failure.into());
            }
            if handle.is_done() {
                return Ok(());
            }

            self.cancel.check()?;
            self.clock.next_frame().await;
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SceneError;
    use crate::core::scene::test_support::{names, Fixture, Recorded};
    use crate::core::scene::LoadMode;

    fn sequencer(fixture: &Fixture) -> SceneLoadSequencer {
        SceneLoadSequencer::new(
            fixture.host.clone(),
            fixture.visual.clone(),
            fixture.clock.clone(),
            fixture.cancel.clone(),
        )
    }

    //--- load_incremental Tests -------------------------------------------

    #[test]
    fn incremental_loads_in_order_once_per_distinct_name() {
        let mut fixture = Fixture::new();
        fixture.host.preload("Lobby");
        let sequencer = Rc::new(sequencer(&fixture));

        let result = fixture.run({
            let sequencer = Rc::clone(&sequencer);
            async move {
                sequencer
                    .load_incremental(&names(&["Master", "Lobby", "", "Hud", "Master"]))
                    .await
            }
        });

        assert_eq!(result, Ok(2));
        assert_eq!(
            fixture.recorder.loads(),
            vec![
                ("Master".to_string(), LoadMode::Additive),
                ("Hud".to_string(), LoadMode::Additive),
            ]
        );
    }

    #[test]
    fn incremental_loads_are_strictly_sequential() {
        let mut fixture = Fixture::new();
        fixture.host.set_load_frames("A", 3);
        let sequencer = Rc::new(sequencer(&fixture));

        fixture
            .run({
                let sequencer = Rc::clone(&sequencer);
                async move { sequencer.load_incremental(&names(&["A", "B"])).await }
            })
            .unwrap();

        let events = fixture.recorder.events();
        let a_done = events
            .iter()
            .position(|e| matches!(e, Recorded::Loaded { scene, .. } if scene == "A"))
            .unwrap();
        let b_start = events
            .iter()
            .position(|e| matches!(e, Recorded::Load { scene, .. } if scene == "B"))
            .unwrap();
        assert!(a_done < b_start);
    }

    #[test]
    fn second_incremental_pass_issues_no_loads() {
        let mut fixture = Fixture::new();
        let sequencer = Rc::new(sequencer(&fixture));
        let scenes = names(&["Master", "Lobby"]);

        let first = fixture.run({
            let sequencer = Rc::clone(&sequencer);
            let scenes = scenes.clone();
            async move { sequencer.load_incremental(&scenes).await }
        });
        let second = fixture.run({
            let sequencer = Rc::clone(&sequencer);
            async move { sequencer.load_incremental(&scenes).await }
        });

        assert_eq!(first, Ok(2));
        assert_eq!(second, Ok(0));
        assert_eq!(fixture.recorder.loads().len(), 2);
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        let mut fixture = Fixture::new();
        let sequencer = Rc::new(sequencer(&fixture));

        let result = fixture.run({
            let sequencer = Rc::clone(&sequencer);
            async move { sequencer.load_incremental(&[]).await }
        });

        assert_eq!(result, Ok(0));
        assert!(fixture.recorder.events().is_empty());
    }

    #[test]
    fn incremental_failure_stops_the_sequence() {
        let mut fixture = Fixture::new();
        fixture.host.fail_scene("Broken");
        let sequencer = Rc::new(sequencer(&fixture));

        let result = fixture.run({
            let sequencer = Rc::clone(&sequencer);
            async move { sequencer.load_incremental(&names(&["Broken", "After"])).await }
        });

        assert!(matches!(
            result,
            Err(TransitionError::Scene(SceneError::LoadFailed { .. }))
        ));
        assert_eq!(fixture.recorder.loads().len(), 1);
    }

    //--- load_main Tests --------------------------------------------------

    #[test]
    fn main_load_reports_progress_then_completes() {
        let mut fixture = Fixture::new();
        fixture.host.set_load_frames("Game", 4);
        let sequencer = Rc::new(sequencer(&fixture));

        fixture
            .run({
                let sequencer = Rc::clone(&sequencer);
                async move { sequencer.load_main("Game").await }
            })
            .unwrap();

        let progress = fixture.recorder.progress();
        assert_eq!(progress, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(fixture.recorder.loads(), vec![("Game".to_string(), LoadMode::Exclusive)]);
        assert!(fixture.host.is_loaded("Game"));
    }

    #[test]
    fn main_load_activates_only_after_full_progress_reported() {
        let mut fixture = Fixture::new();
        let sequencer = Rc::new(sequencer(&fixture));

        fixture
            .run({
                let sequencer = Rc::clone(&sequencer);
                async move { sequencer.load_main("Game").await }
            })
            .unwrap();

        let events = fixture.recorder.events();
        let full = events
            .iter()
            .position(|e| matches!(e, Recorded::Progress(p) if *p == 1.0))
            .unwrap();
        let activated = events
            .iter()
            .position(|e| matches!(e, Recorded::Activated { .. }))
            .unwrap();
        let loaded = events
            .iter()
            .position(|e| matches!(e, Recorded::Loaded { .. }))
            .unwrap();
        assert!(full < activated);
        assert!(activated < loaded);
    }

    #[test]
    fn main_load_replaces_loaded_scenes() {
        let mut fixture = Fixture::new();
        fixture.host.preload("Old");
        let sequencer = Rc::new(sequencer(&fixture));

        fixture
            .run({
                let sequencer = Rc::clone(&sequencer);
                async move { sequencer.load_main("New").await }
            })
            .unwrap();

        assert!(!fixture.host.is_loaded("Old"));
        assert!(fixture.host.is_loaded("New"));
    }

    #[test]
    fn unknown_main_scene_fails_fast() {
        let mut fixture = Fixture::new();
        fixture.host.forget_scene("Nowhere");
        let sequencer = Rc::new(sequencer(&fixture));

        let result = fixture.run({
            let sequencer = Rc::clone(&sequencer);
            async move { sequencer.load_main("Nowhere").await }
        });

        assert_eq!(
            result,
            Err(TransitionError::Scene(SceneError::NotFound("Nowhere".to_string())))
        );
    }

    #[test]
    fn cancellation_stops_polling() {
        let mut fixture = Fixture::new();
        fixture.host.set_load_frames("Slow", 10);
        fixture.cancel.cancel();
        let sequencer = Rc::new(sequencer(&fixture));

        let result = fixture.run({
            let sequencer = Rc::clone(&sequencer);
            async move { sequencer.load_main("Slow").await }
        });

        assert_eq!(result, Err(TransitionError::Cancelled));
    }
}
