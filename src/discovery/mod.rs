//! Test plan discovery.
//!
//! Discovery looks at a single directory (no recursion), picks the files whose name starts with the configured
//! prefix and that a [`PlanLoader`] understands, and lets the loader register that file's plans on a
//! [`Registrar`]. Files are visited in file-name order, so plan order (and TAP numbering) is stable across runs.
//!
//! A file that fails to load is logged, recorded in [`Discovery::errors`] and skipped; the rest of the directory
//! is still processed.

mod manifest;
mod registry;

use std::fs;
use std::path::{Path, PathBuf};

use tapline_core::{Plan, Registrar};

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, LoadError};

pub use manifest::{EXIT_BAIL_OUT, EXIT_SKIP, EXIT_TODO, ManifestLoader};
pub use registry::{FnRegistry, RegisterFn};

/// Turns one test file into plans.
pub trait PlanLoader {
    /// Whether this loader understands the file at `path`.
    fn accepts(&self, path: &Path) -> bool;

    /// Load `path` and register its plans on `registrar`.
    fn load(&self, path: &Path, registrar: &mut Registrar) -> Result<(), LoadError>;
}

/// Result of scanning a directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Plans in file order, then registration order within a file
    pub plans: Vec<Plan>,
    /// Files that could not be loaded
    pub errors: Vec<(PathBuf, LoadError)>,
}

impl Discovery {
    /// Number of test points across all discovered plans.
    pub fn total_points(&self) -> usize {
        self.plans.iter().map(Plan::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Find test plans in `directory`.
///
/// ## Parameters
/// - `directory`: the directory to scan; subdirectories are ignored.
/// - `loader`: decides which files are test files and how to load them.
/// - `config`: file name prefix and other discovery settings.
///
/// ## Errors
/// - [`DiscoveryError::ReadDir`] if the directory cannot be listed. Per-file problems are not errors.
#[tracing::instrument(skip(loader, config), fields(dir = %directory.display()))]
pub fn find_test_plans(
    directory: &Path,
    loader: &dyn PlanLoader,
    config: &DiscoveryConfig,
) -> Result<Discovery, DiscoveryError> {
    let entries = fs::read_dir(directory).map_err(|source| DiscoveryError::ReadDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches_prefix = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(&config.prefix));
        if matches_prefix && loader.accepts(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut discovery = Discovery::default();
    for path in files {
        let mut registrar = Registrar::new(path.clone());
        match loader.load(&path, &mut registrar) {
            Ok(()) => {
                tracing::debug!(file = %path.display(), plans = registrar.plan_count(), "loaded test file");
                discovery.plans.extend(registrar.into_plans());
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "skipping test file");
                discovery.errors.push((path, err));
            }
        }
    }

    Ok(discovery)
}
