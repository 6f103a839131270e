//! TOML test manifests whose test points are external commands.
//!
//! ```toml
//! [[plan]]
//! description = "uart"
//!
//! [[plan.point]]
//! description = "loopback"
//! command = ["./probe", "--loopback"]
//! cwd = "bin"
//! ```
//!
//! A point's command runs to completion when the point is invoked. Its exit code decides the outcome:
//! `0` passes, [`EXIT_SKIP`] skips, [`EXIT_TODO`] marks ToDo, [`EXIT_BAIL_OUT`] bails out, anything else fails.
//! Output is captured and never reaches the TAP stream; stderr (or stdout when stderr is empty) becomes the reason.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tapline_core::{PointResult, Registrar, Signal};

use super::PlanLoader;
use crate::error::LoadError;

/// Exit code that marks a point as skipped.
pub const EXIT_SKIP: i32 = 77;
/// Exit code that marks a point as ToDo.
pub const EXIT_TODO: i32 = 78;
/// Exit code that aborts the whole run.
pub const EXIT_BAIL_OUT: i32 = 99;

const SIGNAL_FAULT_KIND: &str = "signal";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default, rename = "plan")]
    plans: Vec<PlanEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanEntry {
    #[serde(default)]
    description: String,
    #[serde(default)]
    skip: bool,
    #[serde(default, rename = "point")]
    points: Vec<PointEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PointEntry {
    #[serde(default)]
    description: String,
    command: Vec<String>,
    cwd: Option<PathBuf>,
}

/// Loads `*.toml` manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn new() -> Self {
        Self
    }
}

impl PlanLoader for ManifestLoader {
    fn accepts(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "toml")
    }

    fn load(&self, path: &Path, registrar: &mut Registrar) -> Result<(), LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            file: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest = toml::from_str(&content).map_err(|error| LoadError::Manifest {
            file: path.to_path_buf(),
            error,
        })?;

        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        // Validate everything before registering anything.
        let mut plans = Vec::with_capacity(manifest.plans.len());
        for plan in manifest.plans {
            let mut points = Vec::with_capacity(plan.points.len());
            for point in plan.points {
                let command = CommandPoint::from_entry(&point, &base).ok_or_else(|| {
                    LoadError::Invalid(format!(
                        "{}: point '{}' has an empty command",
                        path.display(),
                        point.description
                    ))
                })?;
                points.push((point.description, command));
            }
            plans.push((plan.description, plan.skip, points));
        }

        for (description, skip, points) in plans {
            let plan = registrar.build_plan(&description, skip);
            for (point_description, command) in points {
                plan.add_test_point(move || command.run(), &point_description);
            }
        }
        Ok(())
    }
}

/// One external command bound to a test point.
#[derive(Debug, Clone)]
struct CommandPoint {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandPoint {
    fn from_entry(entry: &PointEntry, base: &Path) -> Option<Self> {
        let (program, args) = entry.command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        let cwd = match &entry.cwd {
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        };
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            cwd,
        })
    }

    fn run(&self) -> PointResult {
        tracing::trace!(program = %self.program, cwd = %self.cwd.display(), "spawning test command");
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        match output.status.code() {
            Some(0) => Ok(()),
            Some(EXIT_SKIP) => Err(Signal::skip(reason(&stderr, &stdout))),
            Some(EXIT_TODO) => Err(Signal::todo(reason(&stderr, &stdout))),
            Some(EXIT_BAIL_OUT) => Err(Signal::bail_out(reason(&stderr, &stdout))),
            Some(code) => {
                let stderr = stderr.trim();
                let mut message = format!("{} exited with status {}", self.program, code);
                if !stderr.is_empty() {
                    message.push('\n');
                    message.push_str(stderr);
                }
                Err(Signal::fail(message))
            }
            None => Err(Signal::fault(
                SIGNAL_FAULT_KIND,
                format!("{} was terminated ({})", self.program, output.status),
            )),
        }
    }
}

fn reason(stderr: &str, stdout: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.to_string()
    }
}
