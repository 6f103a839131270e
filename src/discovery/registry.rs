//! Loader for suites compiled into the binary.
//!
//! Each suite is a registration function keyed by a file stem. A test file with that stem in the discovery
//! directory enables the suite; the file's contents are not read. This suits targets where test code ships
//! inside the firmware image and the filesystem only decides what runs.

use std::collections::BTreeMap;
use std::path::Path;

use tapline_core::Registrar;

use super::PlanLoader;
use crate::error::LoadError;

/// Registration function for one suite.
pub type RegisterFn = fn(&mut Registrar);

/// Maps file stems to registration functions.
#[derive(Debug, Default, Clone)]
pub struct FnRegistry {
    suites: BTreeMap<String, RegisterFn>,
}

impl FnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `register` for files whose stem is `stem`. A later registration for the same stem wins.
    pub fn with(mut self, stem: &str, register: RegisterFn) -> Self {
        self.insert(stem, register);
        self
    }

    pub fn insert(&mut self, stem: &str, register: RegisterFn) {
        self.suites.insert(stem.to_string(), register);
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

impl PlanLoader for FnRegistry {
    fn accepts(&self, _path: &Path) -> bool {
        true
    }

    fn load(&self, path: &Path, registrar: &mut Registrar) -> Result<(), LoadError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let register = self
            .suites
            .get(&stem)
            .ok_or_else(|| LoadError::Unregistered(stem.clone()))?;
        register(registrar);
        Ok(())
    }
}
