//=========================================================================
// Frame Clock
//=========================================================================
//
// Shared frame counter used as the yield primitive of the runtime.
//
// Tasks await `next_frame()` to give up the rest of the current tick.
// The executor advances the clock once per host frame and wakes every
// parked task.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

//=== FrameClock ==========================================================

/// Cloneable handle to a single-threaded frame counter.
///
/// All clones observe the same counter. The clock is advanced by
/// [`TickExecutor::tick`](super::TickExecutor::tick); hosts that drive
/// their own executor may call [`FrameClock::advance`] directly.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<ClockState>,
}

#[derive(Default)]
struct ClockState {
    frame: Cell<u64>,
    parked: RefCell<Vec<Waker>>,
}

impl FrameClock {
    /// Creates a clock at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current frame number.
    pub fn frame(&self) -> u64 {
        self.inner.frame.get()
    }

    /// Advances the clock by one frame and wakes every parked task.
    ///
    /// Returns the new frame number.
    pub fn advance(&self) -> u64 {
        let next = self.inner.frame.get() + 1;
        self.inner.frame.set(next);

        let parked = std::mem::take(&mut *self.inner.parked.borrow_mut());
        for waker in parked {
            waker.wake();
        }

        next
    }

    /// Returns a future that completes on the next frame.
    pub fn next_frame(&self) -> NextFrame {
        self.frames(1)
    }

    /// Returns a future that completes once `count` frames have elapsed.
    ///
    /// `frames(0)` completes immediately.
    pub fn frames(&self, count: u64) -> NextFrame {
        NextFrame {
            clock: self.clone(),
            target: self.frame() + count,
        }
    }

    /// Number of wakers currently parked on the clock.
    pub fn parked(&self) -> usize {
        self.inner.parked.borrow().len()
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("frame", &self.frame())
            .field("parked", &self.parked())
            .finish()
    }
}

//=== NextFrame ===========================================================

/// Future returned by [`FrameClock::next_frame`] and [`FrameClock::frames`].
#[must_use = "futures do nothing unless awaited"]
pub struct NextFrame {
    clock: FrameClock,
    target: u64,
}

impl Future for NextFrame {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.clock.frame() >= self.target {
            return Poll::Ready(());
        }

        self.clock.inner.parked.borrow_mut().push(cx.waker().clone());
        Poll::Pending
    }
}

//=== Tests ===============================================================
