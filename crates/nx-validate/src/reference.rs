//! Tag and MultiTag rules against the DataArrays they reference.

use nx_core::units;
use nx_model::{DataArrayRecord, MultiTagRecord, TagRecord};

use crate::finding::{ErrorKind, Finding, WarningKind};

/// The axes spanned by a set of references.
///
/// `count` is the largest reference rank. `units[i]` holds the unit of
/// axis `i` in every reference that gives one, in reference order; Set
/// axes contribute none.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceAxes {
    pub count: usize,
    pub units: Vec<Vec<String>>,
    pub mixed_rank: bool,
}

impl ReferenceAxes {
    /// `None` when there are no references to measure against.
    pub fn from_references(references: &[DataArrayRecord]) -> Option<Self> {
        let count = references.iter().map(DataArrayRecord::rank).max()?;
        let mixed_rank = references.iter().any(|r| r.rank() != count);
        let units = (0..count)
            .map(|axis| {
                references
                    .iter()
                    .filter_map(|r| r.dimensions.get(axis)?.descriptor.unit())
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        Some(Self {
            count,
            units,
            mixed_rank,
        })
    }

    /// True when `unit` can describe axis `axis` of every reference.
    fn accepts(&self, axis: usize, unit: &str) -> bool {
        self.units
            .get(axis)
            .is_none_or(|axis_units| axis_units.iter().all(|u| units::compatible(unit, u)))
    }
}

pub fn check_tag(tag: &TagRecord, references: &[DataArrayRecord]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let axes = ReferenceAxes::from_references(references);

    if tag.position.is_empty() {
        findings.push(ErrorKind::NoPosition.into());
    }
    if let Some(axes) = &axes {
        if axes.mixed_rank {
            findings.push(WarningKind::MixedReferenceRank.into());
        }
        if tag.position.len() != axes.count {
            findings.push(ErrorKind::PositionDimensionMismatch.into());
        }
    }
    if let Some(extent) = tag.extent.as_deref().filter(|e| !e.is_empty()) {
        if extent.len() != tag.position.len() {
            findings.push(ErrorKind::ExtentDimensionMismatch.into());
        }
    }

    check_units(tag.units.as_deref(), axes.as_ref(), &mut findings);
    findings
}

/// `positions` and `extents` are the resolved DataArrays of the multi-tag.
pub fn check_multi_tag(
    mtag: &MultiTagRecord,
    positions: Option<&DataArrayRecord>,
    extents: Option<&DataArrayRecord>,
    references: &[DataArrayRecord],
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let axes = ReferenceAxes::from_references(references);

    if axes.as_ref().is_some_and(|a| a.mixed_rank) {
        findings.push(WarningKind::MixedReferenceRank.into());
    }

    match positions {
        None => findings.push(ErrorKind::NoPositions.into()),
        Some(positions) => {
            if positions.shape.first().copied().unwrap_or(0) == 0 {
                findings.push(ErrorKind::NoPositions.into());
            }
            if let Some(axes) = &axes {
                if position_columns(positions) != axes.count {
                    findings.push(ErrorKind::PositionsDimensionMismatch.into());
                }
            }
            if let Some(extents) = extents {
                if extents.shape != positions.shape {
                    findings.push(ErrorKind::PositionsExtentsMismatch.into());
                }
            }
        }
    }

    check_units(mtag.units.as_deref(), axes.as_ref(), &mut findings);
    findings
}

/// One row per region; a rank-1 positions array tags a single axis.
fn position_columns(positions: &DataArrayRecord) -> usize {
    match positions.shape.as_slice() {
        [] => 0,
        [_] => 1,
        [_, columns, ..] => *columns,
    }
}

/// Units shared by Tag and MultiTag: one entry per reference axis, empty
/// strings standing in for axes without a physical unit.
fn check_units(
    declared: Option<&[String]>,
    axes: Option<&ReferenceAxes>,
    findings: &mut Vec<Finding>,
) {
    let Some(declared) = declared.filter(|u| !u.is_empty()) else {
        return;
    };

    if declared
        .iter()
        .any(|u| !u.trim().is_empty() && !units::is_valid(u))
    {
        findings.push(WarningKind::InvalidUnit.into());
    }

    let Some(axes) = axes else {
        return;
    };
    if declared.len() != axes.count {
        findings.push(ErrorKind::ReferenceUnitsMismatch.into());
        return;
    }

    let incompatible = declared
        .iter()
        .enumerate()
        .filter(|(_, unit)| !unit.trim().is_empty())
        .any(|(axis, unit)| !units::is_atomic(unit) || !axes.accepts(axis, unit));
    if incompatible {
        findings.push(ErrorKind::ReferenceUnitsIncompatible.into());
    }
}
