//! DataArray and dimension rules.

use nx_core::units;
use nx_model::{DataArrayRecord, DimensionDescriptor, DimensionRecord};

use crate::finding::{ErrorKind, Finding, WarningKind};

/// Check one dimension against the data axis it describes.
///
/// `position` is the 1-based place of the dimension in its DataArray.
/// `axis_extent` is `None` when the data has no such axis; rules that
/// compare against the extent are then skipped. All rules run
/// independently.
pub fn check_dimension(
    position: usize,
    dim: &DimensionRecord,
    axis_extent: Option<usize>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if dim.index <= 0 {
        findings.push(ErrorKind::InvalidDimensionIndex(dim.index).into());
    }
    if dim.index != position as i64 {
        findings.push(
            ErrorKind::IncorrectDimensionIndex {
                expected: position,
                declared: dim.index,
            }
            .into(),
        );
    }

    match &dim.descriptor {
        DimensionDescriptor::Set { labels } => {
            if let (Some(labels), Some(extent)) = (labels, axis_extent) {
                if labels.len() != extent {
                    findings.push(ErrorKind::SetDimLabelsMismatch(position).into());
                }
            }
        }
        DimensionDescriptor::Range { ticks, unit } => {
            match ticks.as_deref().filter(|t| !t.is_empty()) {
                None => findings.push(ErrorKind::RangeDimNoTicks(position).into()),
                Some(ticks) => {
                    if axis_extent.is_some_and(|extent| ticks.len() != extent) {
                        findings.push(ErrorKind::RangeDimTicksMismatch(position).into());
                    }
                    if !is_non_decreasing(ticks) {
                        findings.push(ErrorKind::RangeDimTicksUnsorted(position).into());
                    }
                }
            }
            check_axis_unit(position, unit.as_deref(), &mut findings);
        }
        DimensionDescriptor::Sampled {
            interval,
            offset,
            unit,
        } => {
            if !(interval.is_finite() && *interval > 0.0) {
                findings.push(ErrorKind::SampledDimInvalidInterval(position).into());
            }
            if offset.is_some() && non_empty(unit.as_deref()).is_none() {
                findings.push(WarningKind::SampledDimOffsetWithoutUnit(position).into());
            }
            check_axis_unit(position, unit.as_deref(), &mut findings);
        }
        DimensionDescriptor::Unknown { dimension_type } => {
            findings.push(
                ErrorKind::UnknownDimensionType {
                    position,
                    dimension_type: dimension_type.clone(),
                }
                .into(),
            );
        }
    }

    findings
}

/// Check a DataArray: rank agreement, every dimension, calibration and unit.
pub fn check_data_array(da: &DataArrayRecord) -> Vec<Finding> {
    let mut findings = Vec::new();

    // Dimension checks below stay best-effort when this fires.
    if da.dimensions.len() != da.rank() {
        findings.push(
            ErrorKind::DimensionMismatch {
                dimensions: da.dimensions.len(),
                rank: da.rank(),
            }
            .into(),
        );
    }

    for (i, dim) in da.dimensions.iter().enumerate() {
        findings.extend(check_dimension(i + 1, dim, da.shape.get(i).copied()));
    }

    match (da.expansion_origin, &da.polynom_coefficients) {
        (Some(_), None) => findings.push(WarningKind::NoPolynomialCoefficients.into()),
        (None, Some(_)) => findings.push(WarningKind::NoExpansionOrigin.into()),
        _ => {}
    }

    if let Some(unit) = non_empty(da.unit.as_deref()) {
        if !units::is_valid(unit) {
            findings.push(WarningKind::InvalidUnit.into());
        }
    }

    findings
}

fn check_axis_unit(position: usize, unit: Option<&str>, findings: &mut Vec<Finding>) {
    if let Some(unit) = non_empty(unit) {
        if !units::is_atomic(unit) {
            findings.push(ErrorKind::DimensionUnitNotAtomic(position).into());
        }
    }
}

fn non_empty(unit: Option<&str>) -> Option<&str> {
    unit.filter(|u| !u.trim().is_empty())
}

fn is_non_decreasing(ticks: &[f64]) -> bool {
    ticks.windows(2).all(|w| w[0] <= w[1])
}
