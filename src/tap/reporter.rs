//! Streaming TAP reporter.
//!
//! Every line is written and flushed before the call returns. A consumer reading the sink live therefore always
//! sees a valid prefix of the report, even if the process dies right after a point starts.

use std::io::Write;

use tapline_core::{Outcome, Plan};

use super::format::{
    Directive, ResultLine, Status, VERSION_LINE, bail_out_line, comment_lines, plan_line, split_reason,
    yaml_block,
};
use crate::config::{DiagnosticStyle, ReporterConfig};
use crate::engine::SessionSummary;
use crate::error::TapError;

// ============================================================================
// Reporter Trait
// ============================================================================

/// Receives session events from the engine, in execution order.
///
/// Implement this trait to emit another output format. Any error returned aborts the session and is handed to
/// the engine's caller.
pub trait Reporter {
    /// Called once before any point runs.
    fn on_session_start(&mut self, total: usize) -> Result<(), TapError>;

    /// Called before the first point of each plan (skipped plans included).
    fn on_plan_start(&mut self, _plan: &Plan) -> Result<(), TapError> {
        Ok(())
    }

    /// Called as soon as the outcome of a point is known.
    fn on_point_complete(
        &mut self,
        index: usize,
        description: Option<&str>,
        outcome: &Outcome,
    ) -> Result<(), TapError>;

    /// Called when a point bails out. Nothing else is reported afterwards.
    fn on_bail_out(&mut self, reason: &str) -> Result<(), TapError>;

    /// Called after the last point of a session that ran to completion.
    fn on_session_complete(&mut self, _summary: &SessionSummary) -> Result<(), TapError> {
        Ok(())
    }
}

// ============================================================================
// TAP Reporter
// ============================================================================

/// Writes a TAP version 14 stream to any [`Write`] sink, flushing after every line.
pub struct TapReporter<W: Write> {
    sink: W,
    config: ReporterConfig,
    lines_written: usize,
    closed: bool,
}

impl<W: Write> TapReporter<W> {
    pub fn new(sink: W, config: ReporterConfig) -> Self {
        Self {
            sink,
            config,
            lines_written: 0,
            closed: false,
        }
    }

    /// Number of lines emitted so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Whether a `Bail out!` line has ended the stream.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Give the sink back.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Write one line and flush it.
    fn emit(&mut self, line: &str) -> Result<(), TapError> {
        if self.closed {
            return Err(TapError::StreamClosed);
        }
        writeln!(self.sink, "{line}")?;
        self.sink.flush()?;
        self.lines_written += 1;
        Ok(())
    }

    fn emit_all<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), TapError> {
        for line in lines {
            self.emit(line.as_ref())?;
        }
        Ok(())
    }

    /// Emit `TAP version 14` followed by the plan line.
    pub fn preamble(&mut self, total: usize) -> Result<(), TapError> {
        self.emit(VERSION_LINE)?;
        self.emit(&plan_line(total))
    }

    /// Emit a free-form comment, one `#` line per message line.
    pub fn comment(&mut self, message: &str) -> Result<(), TapError> {
        let lines = comment_lines(message);
        self.emit_all(&lines)
    }

    /// Emit the result line for a point and any diagnostics belonging to it.
    pub fn result(&mut self, index: usize, description: Option<&str>, outcome: &Outcome) -> Result<(), TapError> {
        let status = if outcome.is_ok() {
            Status::Ok
        } else {
            Status::NotOk
        };
        match outcome {
            Outcome::Passed => self.emit(&result_line(status, index, description, None)),
            Outcome::Skipped(reason) => {
                let (first, rest) = split_reason(reason);
                self.emit(&result_line(status, index, description, Some(Directive::Skip(first))))?;
                self.comment(&rest.join("\n"))
            }
            Outcome::ToDo(reason) => {
                let (first, rest) = split_reason(reason);
                self.emit(&result_line(status, index, description, Some(Directive::Todo(first))))?;
                if rest.is_empty() {
                    return Ok(());
                }
                self.diagnostics("todo", None, &rest.join("\n"))
            }
            Outcome::Failed(message) => {
                self.emit(&result_line(status, index, description, None))?;
                self.diagnostics("fail", None, message)
            }
            Outcome::Unexpected { kind, message } => {
                self.emit(&result_line(status, index, description, None))?;
                self.diagnostics("fail", Some(kind.as_str()), message)
            }
            Outcome::BailOut(reason) => self.bail_out(reason),
        }
    }

    fn diagnostics(&mut self, severity: &str, fault: Option<&str>, message: &str) -> Result<(), TapError> {
        if fault.is_none() && message.trim().is_empty() {
            return Ok(());
        }
        let lines = match self.config.diagnostics {
            DiagnosticStyle::Comment => match fault {
                Some(kind) => comment_lines(&format!("{kind}: {message}")),
                None => comment_lines(message),
            },
            DiagnosticStyle::Yaml => yaml_block(severity, fault, message),
        };
        self.emit_all(&lines)
    }

    /// Emit `Bail out!` and close the stream.
    pub fn bail_out(&mut self, reason: &str) -> Result<(), TapError> {
        self.emit(&bail_out_line(reason))?;
        self.closed = true;
        Ok(())
    }
}

fn result_line(status: Status, index: usize, description: Option<&str>, directive: Option<Directive<'_>>) -> String {
    ResultLine {
        status,
        index,
        description,
        directive,
    }
    .to_string()
}

impl<W: Write> Reporter for TapReporter<W> {
    fn on_session_start(&mut self, total: usize) -> Result<(), TapError> {
        self.preamble(total)
    }

    fn on_plan_start(&mut self, plan: &Plan) -> Result<(), TapError> {
        if !self.config.plan_comments {
            return Ok(());
        }
        match plan.label() {
            Some(label) => self.comment(&label),
            None => Ok(()),
        }
    }

    fn on_point_complete(
        &mut self,
        index: usize,
        description: Option<&str>,
        outcome: &Outcome,
    ) -> Result<(), TapError> {
        self.result(index, description, outcome)
    }

    fn on_bail_out(&mut self, reason: &str) -> Result<(), TapError> {
        self.bail_out(reason)
    }

    fn on_session_complete(&mut self, summary: &SessionSummary) -> Result<(), TapError> {
        if !self.config.summary_comment {
            return Ok(());
        }
        self.comment(&summary.to_string())
    }
}
