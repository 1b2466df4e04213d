//=========================================================================
// Scene Conductor — Library Root
//
// Ordered, policy-aware scene transitions for frame-driven hosts.
//
// Responsibilities:
// - Expose the transition core (`core`): policy lookup, load sequencing,
//   the transition state machine, and the cooperative runtime
// - Expose the host-facing driver (`Conductor`) that runs queued
//   transitions one frame at a time
//
// Typical usage:
// ```ignore
// use scene_conductor::prelude::*;
//
// let mut conductor = ConductorBuilder::new(config, clock, host, fader)
//     .with_policy(profile)
//     .build();
//
// conductor.bootstrap();
// loop {
//     conductor.tick()?;   // once per host frame
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every transition subsystem. Hosts that drive their own
// executor can use `core::scene::TransitionOrchestrator` directly.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `conductor` wires the orchestrator to a tick executor and a request
// queue.
//
mod conductor;

//--- Public Exports ------------------------------------------------------

pub use conductor::{Conductor, ConductorBuilder, RequestSender, TransitionOutcome};
