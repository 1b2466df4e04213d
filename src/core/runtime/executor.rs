//=========================================================================
// Tick Executor
//=========================================================================
//
// Advances suspended transition tasks once per host frame.
//
// Each tick:
//  1. Advances the frame clock (wakes tasks parked on it)
//  2. Polls every ready task until the pool stalls
//
// Nothing runs between ticks, so the host keeps full control over when
// transition work happens relative to the rest of its frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::{LocalSpawnExt, SpawnError};

//=== Internal Dependencies ===============================================

use super::FrameClock;

//=== TickExecutor ========================================================

/// Frame-stepped executor for `!Send` transition tasks.
pub struct TickExecutor {
    pool: LocalPool,
    spawner: LocalSpawner,
    clock: FrameClock,
    in_flight: Rc<Cell<usize>>,
}

impl TickExecutor {
    //--- Construction -----------------------------------------------------

    /// Creates an executor with its own frame clock.
    pub fn new() -> Self {
        Self::with_clock(FrameClock::new())
    }

    /// Creates an executor driving an existing clock.
    ///
    /// Use this when collaborators (faders, scene hosts) were built
    /// against the clock before the executor existed.
    pub fn with_clock(clock: FrameClock) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool,
            spawner,
            clock,
            in_flight: Rc::new(Cell::new(0)),
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Number of spawned tasks that have not completed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.get() == 0
    }

    //--- Scheduling -------------------------------------------------------

    /// Registers a task. It is first polled on the next `tick()` or
    /// `run_until_stalled()`.
    pub fn spawn<F>(&self, task: F) -> Result<(), SpawnError>
    where
        F: Future<Output = ()> + 'static,
    {
        let in_flight = Rc::clone(&self.in_flight);
        in_flight.set(in_flight.get() + 1);

        let counter = Rc::clone(&in_flight);
        let result = self.spawner.spawn_local(async move {
            task.await;
            counter.set(counter.get() - 1);
        });

        if result.is_err() {
            in_flight.set(in_flight.get() - 1);
        }
        result
    }

    /// Polls ready tasks without advancing the clock.
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Advances the clock one frame and runs every task that became ready.
    ///
    /// Returns the new frame number.
    pub fn tick(&mut self) -> u64 {
        let frame = self.clock.advance();
        self.pool.run_until_stalled();
        frame
    }
}

impl Default for TickExecutor {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================
