//! Per-run bookkeeping.

use std::fmt;

use tapline_core::Outcome;

/// Counters for one execution run. Created when a run starts and dropped when it ends.
#[derive(Debug)]
pub(crate) struct Session {
    planned: usize,
    next_index: usize,
    executed: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    todo: usize,
    bailed_out: Option<String>,
}

impl Session {
    pub(crate) fn new(planned: usize) -> Self {
        Self {
            planned,
            next_index: 1,
            executed: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            todo: 0,
            bailed_out: None,
        }
    }

    /// TAP number of the point about to be reported.
    pub(crate) fn current_index(&self) -> usize {
        self.next_index
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.bailed_out.is_some()
    }

    /// Account for a reported point and move to the next index.
    pub(crate) fn record(&mut self, outcome: &Outcome) {
        if let Outcome::BailOut(reason) = outcome {
            self.terminate(reason);
            return;
        }
        if outcome.is_failure() {
            self.failed += 1;
        }
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::ToDo(_) => self.todo += 1,
            Outcome::Failed(_) | Outcome::Unexpected { .. } | Outcome::BailOut(_) => {}
        }
        self.executed += 1;
        self.next_index += 1;
    }

    /// Stop the session. Counters keep reflecting the partial run.
    pub(crate) fn terminate(&mut self, reason: &str) {
        self.bailed_out = Some(reason.to_string());
    }

    pub(crate) fn summary(&self) -> SessionSummary {
        SessionSummary {
            planned: self.planned,
            executed: self.executed,
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
            todo: self.todo,
            bailed_out: self.bailed_out.clone(),
        }
    }
}

/// What a run did, returned to the caller once the run ends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSummary {
    /// Points announced by the plan line
    pub planned: usize,
    /// Points that got a result line
    pub executed: usize,
    /// Points that returned normally
    pub passed: usize,
    /// ToDo, failed and unexpected points
    pub failed: usize,
    /// Points skipped by a signal or by a skipped plan
    pub skipped: usize,
    /// ToDo points (also counted in `failed`)
    pub todo: usize,
    /// Reason given by the point that bailed out, if any
    pub bailed_out: Option<String>,
}

impl SessionSummary {
    /// Every planned point was reported and nobody bailed out.
    pub fn is_complete(&self) -> bool {
        self.bailed_out.is_none() && self.executed == self.planned
    }

    /// Complete, and the only failures (if any) are ToDo points.
    pub fn is_success(&self) -> bool {
        self.is_complete() && self.failed == self.todo
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![format!("{} planned", self.planned), format!("{} passed", self.passed)];
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        if self.todo > 0 {
            parts.push(format!("{} todo", self.todo));
        }
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        write!(f, "{}", parts.join(", "))?;
        if let Some(reason) = &self.bailed_out {
            write!(f, " (bailed out after {}: {})", self.executed, reason)?;
        }
        Ok(())
    }
}
