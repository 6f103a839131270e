//! CLI module for the tapline runner
//!
//! `tapline [DIR]` discovers TOML test manifests in `DIR`, runs every test point and streams a TAP 14 report to
//! standard output (or `--output FILE`). Logs and discovery warnings go to standard error.
//!
//! ## Exit codes
//!
//! - `0`: every planned point was reported and none failed (ToDo points are allowed to fail)
//! - `1`: a point failed or a point bailed out
//! - `2`: usage error, unreadable directory, broken manifest, or the TAP sink failed
//!
//! ## Design
//!
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::{DEFAULT_TEST_PREFIX, DiagnosticStyle, DiscoveryConfig, ReporterConfig};
use crate::discovery::{ManifestLoader, find_test_plans};
use crate::engine::{Engine, SessionSummary};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const USAGE: ExitCode = ExitCode(2);

    /// Exit code for a finished run.
    pub fn from_summary(summary: &SessionSummary) -> Self {
        if summary.is_success() {
            Self::SUCCESS
        } else {
            Self::FAILURE
        }
    }
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create an error for problems outside the tests themselves (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run TAP test manifests and stream a TAP 14 report
#[derive(Parser, Debug)]
#[command(name = "tapline")]
#[command(version)]
#[command(about = "Run test manifests and report results as TAP 14", long_about = None)]
pub struct Cli {
    /// Directory containing the test manifests
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Write the report to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// File name prefix of test manifests
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_TEST_PREFIX)]
    pub prefix: String,

    /// Render failure diagnostics as YAML blocks instead of comments
    #[arg(long)]
    pub yaml: bool,

    /// Emit a comment line naming each plan before its points
    #[arg(long)]
    pub plan_comments: bool,

    /// Emit a totals comment after the last result line
    #[arg(long)]
    pub summary: bool,
}

impl Cli {
    pub fn reporter_config(&self) -> ReporterConfig {
        let style = if self.yaml {
            DiagnosticStyle::Yaml
        } else {
            DiagnosticStyle::Comment
        };
        ReporterConfig::new()
            .with_diagnostics(style)
            .with_plan_comments(self.plan_comments)
            .with_summary_comment(self.summary)
    }

    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig::new().with_prefix(self.prefix.clone())
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Discover, run and report.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let discovery = find_test_plans(&cli.dir, &ManifestLoader::new(), &cli.discovery_config())
        .map_err(|e| CliError::usage(format!("Error: {e}")))?;
    for (path, err) in &discovery.errors {
        eprintln!("warning: skipped {}: {}", path.display(), err);
    }

    let engine = Engine::new(cli.reporter_config());
    let summary = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| CliError::usage(format!("Error: cannot create {}: {e}", path.display())))?;
            engine.run(&discovery.plans, file)
        }
        None => engine.run(&discovery.plans, io::stdout().lock()),
    }
    .map_err(|e| CliError::usage(format!("Error: {e}")))?;

    tracing::info!(%summary, "run finished");
    if !discovery.errors.is_empty() {
        return Ok(ExitCode::USAGE);
    }
    Ok(ExitCode::from_summary(&summary))
}

// ============================================================================
// Tests
// ============================================================================
