//! The rummage turn loop: prompt builder, router, and loop controller.
//!
//! The branching logic lives in two places by design: the model decides
//! WHICH tool to call (guided by the system prompt), and the router only
//! maps that decision onto `Finish` or `RunTools`. The loop controller
//! drives the cycle and guarantees termination with a step ceiling.

pub mod prompt;
pub mod router;
pub mod turn;

#[cfg(test)]
pub(crate) mod test_support;

pub use router::Action;
pub use turn::{TurnOutcome, TurnRunner, NO_SOURCE_LABEL, STEP_LIMIT_MESSAGE};
