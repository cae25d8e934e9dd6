//! Per-entity collection of findings.

use std::collections::BTreeMap;

use nx_core::EntityKey;

use crate::finding::{ErrorKind, Finding, WarningKind};

/// Result of one validation pass.
///
/// Findings are grouped by the entity they concern, in the order the rules
/// were evaluated. An entity without findings has no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: BTreeMap<EntityKey, Vec<ErrorKind>>,
    warnings: BTreeMap<EntityKey, Vec<WarningKind>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: EntityKey, finding: Finding) {
        match finding {
            Finding::Error(kind) => self.errors.entry(key).or_default().push(kind),
            Finding::Warning(kind) => self.warnings.entry(key).or_default().push(kind),
        }
    }

    pub fn record_all(&mut self, key: EntityKey, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.record(key, finding);
        }
    }

    pub fn errors(&self) -> &BTreeMap<EntityKey, Vec<ErrorKind>> {
        &self.errors
    }

    pub fn warnings(&self) -> &BTreeMap<EntityKey, Vec<WarningKind>> {
        &self.warnings
    }

    /// Errors reported on `key`; empty if there are none.
    pub fn errors_for(&self, key: EntityKey) -> &[ErrorKind] {
        self.errors.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Warnings reported on `key`; empty if there are none.
    pub fn warnings_for(&self, key: EntityKey) -> &[WarningKind] {
        self.warnings.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(Vec::len).sum()
    }

    /// True when no entity has an error. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when there is nothing to report at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
