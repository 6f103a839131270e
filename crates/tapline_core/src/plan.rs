//! Test plans and test points.
//!
//! A [`Plan`] is an ordered, named collection of [`TestPoint`]s. Insertion order is execution order and also
//! TAP numbering order. Plans are built during discovery (usually through a [`Registrar`]) and handed read-only
//! to the engine afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::signal::PointResult;

/// Boxed entry point of a test point.
pub type Entry = Box<dyn Fn() -> PointResult>;

/// A single named unit of work.
pub struct TestPoint {
    description: Option<String>,
    entry: Entry,
}

impl TestPoint {
    pub fn new(entry: impl Fn() -> PointResult + 'static, description: &str) -> Self {
        Self {
            description: trim_empty_to_none(description),
            entry: Box::new(entry),
        }
    }

    /// Human-readable description, `None` when it was blank.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Invoke the entry point once.
    pub fn invoke(&self) -> PointResult {
        (self.entry)()
    }
}

impl fmt::Debug for TestPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestPoint")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// An ordered collection of test points, optionally skipped as a whole.
#[derive(Debug)]
pub struct Plan {
    description: Option<String>,
    skip: bool,
    source: Option<PathBuf>,
    points: Vec<TestPoint>,
}

impl Plan {
    /// Create an empty plan that will run.
    pub fn new(description: &str) -> Self {
        build_plan(description, false)
    }

    /// Append a test point. The same entry may be added more than once; each addition is its own point.
    pub fn add_test_point(
        &mut self,
        entry: impl Fn() -> PointResult + 'static,
        description: &str,
    ) -> &mut Self {
        self.points.push(TestPoint::new(entry, description));
        self
    }

    /// Description of the plan; for skipped plans it doubles as the skip reason.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// File the plan was registered from, if it came through a [`Registrar`].
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn points(&self) -> &[TestPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Label used when the plan needs to be named in a report: description first, then source file name.
    pub fn label(&self) -> Option<String> {
        if let Some(description) = &self.description {
            return Some(description.clone());
        }
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// Build a test plan.
///
/// ## Parameters
/// - `description`: human-readable description; blank strings are stored as `None`.
/// - `skip`: when `true` none of the plan's points will ever be invoked, but they are still reported.
///
/// ## Returns
/// - (`Plan`): an empty plan ready for [`Plan::add_test_point`].
pub fn build_plan(description: &str, skip: bool) -> Plan {
    Plan {
        description: trim_empty_to_none(description),
        skip,
        source: None,
        points: Vec::new(),
    }
}

/// Collects the plans registered while loading a single test file.
///
/// Loaders hand a `Registrar` to the code that defines a file's plans, so plans are bound to their file without
/// any ambient global state.
#[derive(Debug)]
pub struct Registrar {
    source: PathBuf,
    plans: Vec<Plan>,
}

impl Registrar {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            plans: Vec::new(),
        }
    }

    /// File the registered plans are bound to.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Build a plan bound to the current file and keep it for later collection.
    pub fn build_plan(&mut self, description: &str, skip: bool) -> &mut Plan {
        let mut plan = build_plan(description, skip);
        plan.source = Some(self.source.clone());
        self.plans.push(plan);
        let last = self.plans.len() - 1;
        &mut self.plans[last]
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    /// Plans in creation order.
    pub fn into_plans(self) -> Vec<Plan> {
        self.plans
    }
}

fn trim_empty_to_none(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
