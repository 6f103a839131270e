//! Provide the test plan model and the signal vocabulary shared by the tapline engine and test suites.
//!
//! Test suites only need this crate: they build [`Plan`]s, register [`TestPoint`]s on them, and return
//! [`Signal`]s from their entry points. The engine that runs plans and reports TAP lives in `tapline`.
//!
//! ## Notes
//!
//! - This is a data-model crate: **no IO**, no global state.
//! - Entry points communicate their result through [`PointResult`] instead of unwinding; panics are still
//!   tolerated by the engine and reported as unexpected faults.

#![deny(clippy::unwrap_used)]

pub mod plan;
pub mod signal;
pub mod testing;

pub use plan::{Plan, Registrar, TestPoint, build_plan};
pub use signal::{Outcome, PointResult, Signal};
