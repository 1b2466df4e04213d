//=========================================================================
// Transition Core
//
// Subsystems behind a scene transition, leaves first:
//
//   policy   debug policy modules, lookup table, activation gate
//   runtime  frame clock, tick executor, cancellation
//   scene    host/visual interfaces, load sequencer, orchestrator
//   error    error taxonomy shared by all of the above
//
// Control flow:
//   TransitionOrchestrator → PolicyGate (decisions)
//                          → SceneLoadSequencer → SceneHost (I/O)
//                          → TransitionVisual (presentation)
//
//=========================================================================

pub mod error;
pub mod policy;
pub mod runtime;
pub mod scene;
