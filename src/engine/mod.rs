//! Execution engine.
//!
//! Runs test plans strictly in order on the calling thread and drives a [`Reporter`] as each outcome becomes
//! known. The total point count is fixed before the first point runs, so the plan line can be written up front.
//!
//! ## Guarantees
//!
//! - Result lines carry a gapless, 1-based index that spans all plans.
//! - Points of a skipped plan are reported as `ok ... # SKIP <plan description>` and never invoked.
//! - A point-level failure (signal, error, panic) never escapes the engine; it becomes report lines.
//! - `BailOut` stops the run immediately. Nothing after the `Bail out!` line is invoked or reported.
//! - Reporter errors (a broken sink) abort the run and are returned to the caller.

mod invoke;
mod session;

use std::io::{self, Write};
use std::time::Instant;

use tapline_core::{Outcome, Plan};

use crate::config::ReporterConfig;
use crate::error::TapError;
use crate::tap::{Reporter, TapReporter};

pub use invoke::{PANIC_FAULT_KIND, invoke};
pub use session::SessionSummary;
use session::Session;

/// Runs plans and reports them as TAP.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ReporterConfig,
}

impl Engine {
    pub fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Run `plans` and stream the TAP report to `sink`.
    pub fn run<W: Write>(&self, plans: &[Plan], sink: W) -> Result<SessionSummary, TapError> {
        let mut reporter = TapReporter::new(sink, self.config.clone());
        run_with(plans, &mut reporter)
    }
}

/// Run `plans`, reporting through an arbitrary [`Reporter`].
///
/// ## Returns
/// - (`SessionSummary`): counters for the (possibly partial) run.
///
/// ## Errors
/// - Whatever the reporter returns; point failures are never errors.
#[tracing::instrument(skip_all, fields(plan_count = plans.len()))]
pub fn run_with(plans: &[Plan], reporter: &mut dyn Reporter) -> Result<SessionSummary, TapError> {
    let total = plans.iter().map(Plan::len).sum();
    let mut session = Session::new(total);
    reporter.on_session_start(total)?;
    tracing::debug!(total, "session started");

    'plans: for plan in plans {
        if plan.is_empty() {
            continue;
        }
        reporter.on_plan_start(plan)?;

        if plan.is_skipped() {
            let reason = plan.description().unwrap_or_default();
            tracing::debug!(reason, points = plan.len(), "skipping plan");
            for point in plan.points() {
                let outcome = Outcome::Skipped(reason.to_string());
                reporter.on_point_complete(session.current_index(), point.description(), &outcome)?;
                session.record(&outcome);
            }
            continue;
        }

        for point in plan.points() {
            let index = session.current_index();
            let started = Instant::now();
            let outcome = invoke(point);
            tracing::debug!(
                index,
                elapsed_ms = started.elapsed().as_millis() as u64,
                outcome = ?outcome,
                "test point finished"
            );

            if let Outcome::BailOut(reason) = &outcome {
                tracing::warn!(index, reason = %reason, "test point bailed out, ending session");
                session.terminate(reason);
                reporter.on_bail_out(reason)?;
                break 'plans;
            }

            reporter.on_point_complete(index, point.description(), &outcome)?;
            session.record(&outcome);
        }
    }

    let summary = session.summary();
    if !session.is_terminated() {
        reporter.on_session_complete(&summary)?;
    }
    Ok(summary)
}

/// Run `plans` with the default reporter configuration, writing TAP to `sink`.
pub fn execute_test_plans<W: Write>(plans: &[Plan], sink: W) -> Result<SessionSummary, TapError> {
    Engine::default().run(plans, sink)
}

/// Run `plans` with the default reporter configuration, writing TAP to standard output.
pub fn execute_test_plans_stdout(plans: &[Plan]) -> Result<SessionSummary, TapError> {
    execute_test_plans(plans, io::stdout().lock())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tapline_core::{Signal, build_plan};

    fn run_to_string(plans: &[Plan]) -> (String, SessionSummary) {
        let mut out = Vec::new();
        let summary = execute_test_plans(plans, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_empty_run() {
        let (out, summary) = run_to_string(&[]);
        assert_eq!(out, "TAP version 14\n1..0\n");
        assert_eq!(summary, SessionSummary::default());
        assert!(summary.is_success());
    }

    #[test]
    fn test_pass_then_todo() {
        let mut plan = build_plan("basics", false);
        plan.add_test_point(|| Ok(()), "boots")
            .add_test_point(|| Err(Signal::todo("later")), "sleeps");

        let (out, summary) = run_to_string(&[plan]);
        assert_eq!(out, "TAP version 14\n1..2\nok 1 - boots\nnot ok 2 - sleeps # TODO later\n");
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.todo, 1);
        assert_eq!(summary.executed, 2);
    }

    #[test]
    fn test_skipped_plan_never_invokes_entries() {
        let calls = Rc::new(Cell::new(0));
        let mut plan = build_plan("needs radio", true);
        for name in ["tx", "rx"] {
            let calls = Rc::clone(&calls);
            plan.add_test_point(
                move || {
                    calls.set(calls.get() + 1);
                    Ok(())
                },
                name,
            );
        }

        let (out, summary) = run_to_string(&[plan]);
        assert_eq!(calls.get(), 0);
        assert_eq!(
            out,
            "TAP version 14\n1..2\nok 1 - tx # SKIP needs radio\nok 2 - rx # SKIP needs radio\n"
        );
        assert_eq!(summary.skipped, 2);
        assert!(summary.is_success());
    }

    #[test]
    fn test_bail_out_stops_everything() {
        let reached = Rc::new(Cell::new(false));
        let mut first = build_plan("first", false);
        first
            .add_test_point(|| Ok(()), "one")
            .add_test_point(|| Err(Signal::bail_out("watchdog armed")), "two")
            .add_test_point(|| Ok(()), "three");
        let mut second = build_plan("second", false);
        let flag = Rc::clone(&reached);
        second.add_test_point(
            move || {
                flag.set(true);
                Ok(())
            },
            "four",
        );

        let (out, summary) = run_to_string(&[first, second]);
        assert_eq!(out, "TAP version 14\n1..4\nok 1 - one\nBail out! watchdog armed\n");
        assert!(!reached.get());
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.bailed_out.as_deref(), Some("watchdog armed"));
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_panic_is_reported_not_propagated() {
        let mut plan = build_plan("", false);
        plan.add_test_point(|| panic!("bus fault"), "reads")
            .add_test_point(|| Ok(()), "after");

        let (out, summary) = run_to_string(&[plan]);
        assert_eq!(
            out,
            "TAP version 14\n1..2\nnot ok 1 - reads\n# panic: bus fault\nok 2 - after\n"
        );
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn test_empty_plans_do_not_consume_indexes() {
        let empty = build_plan("nothing here", false);
        let mut plan = build_plan("real", false);
        plan.add_test_point(|| Ok(()), "only");
        let (out, _) = run_to_string(&[empty, plan]);
        assert_eq!(out, "TAP version 14\n1..1\nok 1 - only\n");
    }

    #[test]
    fn test_engine_with_plan_and_summary_comments() {
        let mut plan = build_plan("uart", false);
        plan.add_test_point(|| Ok(()), "echo");
        let engine = Engine::new(
            ReporterConfig::new()
                .with_plan_comments(true)
                .with_summary_comment(true),
        );
        let mut out = Vec::new();
        engine.run(&[plan], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "TAP version 14\n1..1\n# uart\nok 1 - echo\n# 1 planned, 1 passed\n"
        );
    }
}
