#![forbid(unsafe_code)]
//! tapline: a streaming TAP 14 test execution engine
//!
//! Test suites describe their work as [`Plan`]s of [`TestPoint`]s (see the `tapline_core` crate). This crate
//! discovers those plans, runs them in order and streams the results as TAP version 14, one flushed line at a
//! time, so a partial report stays valid if the process dies mid-run.
//!
//! ```no_run
//! use tapline::{build_plan, execute_test_plans_stdout, Signal};
//!
//! let mut plan = build_plan("gpio", false);
//! plan.add_test_point(|| Ok(()), "pin toggles")
//!     .add_test_point(|| Err(Signal::todo("not wired yet")), "interrupts fire");
//!
//! let summary = execute_test_plans_stdout(&[plan])?;
//! assert_eq!(summary.executed, 2);
//! # Ok::<(), tapline::TapError>(())
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`; `clippy::unwrap_used` is denied.
//! - **Test points**: panics are caught by the engine and reported as `not ok` with a `panic` fault.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

#![deny(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod tap;

pub use tapline_core::{Outcome, Plan, PointResult, Registrar, Signal, TestPoint, build_plan, testing};

pub use config::{DiagnosticStyle, DiscoveryConfig, ReporterConfig};
pub use discovery::{Discovery, FnRegistry, ManifestLoader, PlanLoader, find_test_plans};
pub use engine::{Engine, SessionSummary, execute_test_plans, execute_test_plans_stdout, run_with};
pub use error::{DiscoveryError, LoadError, TapError};
pub use tap::{Reporter, TapReporter};
