//=========================================================================
// Cooperative Runtime
//=========================================================================
//
// Single-threaded task scheduling layered on the host's update loop.
//
// Architecture:
//   TickExecutor
//     ├─ pool: LocalPool (ready tasks)
//     └─ clock: FrameClock (frame counter + parked wakers)
//
// Flow:
//   host frame → tick() → clock.advance() → wake parked tasks
//                       → run_until_stalled()
//
// "Concurrent" means several suspend-capable operations are in flight
// on the same pool, never on separate threads.
//
//=========================================================================

//=== Module Declarations =================================================

mod cancel;
mod executor;
mod frame_clock;

//=== Public API ==========================================================

pub use cancel::CancelToken;
pub use executor::TickExecutor;
pub use frame_clock::{FrameClock, NextFrame};
