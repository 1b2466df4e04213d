//=========================================================================
// Frame Fader
//=========================================================================
//
// Reference `TransitionVisual` that interpolates an overlay alpha over
// whole frames. Hosts read `alpha()` and `progress()` when drawing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

//=== Internal Dependencies ===============================================

use super::TransitionVisual;
use crate::core::runtime::FrameClock;

//=== FrameFader ==========================================================

/// Frame-stepped fade overlay.
///
/// Alpha is `0.0` when the scene is fully visible and `1.0` when fully
/// obscured. A fade of duration `d` at frame rate `r` takes `ceil(d * r)`
/// frames.
pub struct FrameFader {
    clock: FrameClock,
    frame_rate: f32,
    alpha: Cell<f32>,
    progress: Cell<f32>,
}

impl FrameFader {
    /// Creates a fader starting fully visible.
    ///
    /// # Panics
    ///
    /// Panics if `frame_rate` is not a positive finite number.
    pub fn new(clock: FrameClock, frame_rate: f32) -> Self {
        assert!(
            frame_rate.is_finite() && frame_rate > 0.0,
            "Frame rate must be positive, got {}",
            frame_rate
        );

        Self {
            clock,
            frame_rate,
            alpha: Cell::new(0.0),
            progress: Cell::new(0.0),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha.get()
    }

    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    /// Number of frames a fade of `duration` spans.
    pub fn frames_for(&self, duration: Duration) -> u64 {
        (duration.as_secs_f32() * self.frame_rate).ceil() as u64
    }

    async fn fade_to(&self, target: f32, duration: Duration) {
        let start = self.alpha.get();
        let frames = self.frames_for(duration);

        for step in 1..=frames {
            self.clock.next_frame().await;
            let t = step as f32 / frames as f32;
            self.alpha.set(start + (target - start) * t);
        }

        self.alpha.set(target);
    }
}

#[async_trait(?Send)]
impl TransitionVisual for FrameFader {
    async fn fade_out(&self, duration: Duration) {
        debug!("Fading out over {} frame(s)", self.frames_for(duration));
        self.progress.set(0.0);
        self.fade_to(1.0, duration).await;
    }

    async fn fade_in(&self, duration: Duration) {
        debug!("Fading in over {} frame(s)", self.frames_for(duration));
        self.fade_to(0.0, duration).await;
    }

    fn set_progress(&self, progress: f32) {
        self.progress.set(progress.clamp(0.0, 1.0));
    }
}

//=== Tests ===============================================================
