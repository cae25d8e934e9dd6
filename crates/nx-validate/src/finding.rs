//! Finding kinds.
//!
//! Positions carried by dimension findings are 1-based, matching the
//! stored dimension indices.

use std::fmt;

use nx_model::OdmlType;
use thiserror::Error;

/// Structural defects: the file is not self-consistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("name is not set")]
    NoName,

    #[error("type is not set")]
    NoType,

    #[error("dimension index {0} is invalid, must be > 0")]
    InvalidDimensionIndex(i64),

    #[error("dimension {expected} has incorrect index {declared}")]
    IncorrectDimensionIndex { expected: usize, declared: i64 },

    #[error("dimension {position} has unknown type '{dimension_type}'")]
    UnknownDimensionType {
        position: usize,
        dimension_type: String,
    },

    #[error("dimension {0}: number of labels does not match the data extent")]
    SetDimLabelsMismatch(usize),

    #[error("dimension {0}: ticks required for range dimension")]
    RangeDimNoTicks(usize),

    #[error("dimension {0}: number of ticks does not match the data extent")]
    RangeDimTicksMismatch(usize),

    #[error("dimension {0}: ticks not sorted")]
    RangeDimTicksUnsorted(usize),

    #[error("dimension {0}: unit must be atomic")]
    DimensionUnitNotAtomic(usize),

    #[error("dimension {0}: sampling interval must be > 0")]
    SampledDimInvalidInterval(usize),

    #[error("{dimensions} dimensions described for data of rank {rank}")]
    DimensionMismatch { dimensions: usize, rank: usize },

    #[error("position is not set")]
    NoPosition,

    #[error("number of position entries does not match the dimensionality of the references")]
    PositionDimensionMismatch,

    #[error("number of extent entries does not match the number of position entries")]
    ExtentDimensionMismatch,

    #[error("number of units does not match the dimensionality of the references")]
    ReferenceUnitsMismatch,

    #[error("units are incompatible with the units of the references")]
    ReferenceUnitsIncompatible,

    #[error("positions are not set")]
    NoPositions,

    #[error("number of position columns does not match the dimensionality of the references")]
    PositionsDimensionMismatch,

    #[error("shape of extents does not match the shape of positions")]
    PositionsExtentsMismatch,

    #[error("unit is not set")]
    PropertyUnitNotSet,

    #[error("unit is not valid")]
    PropertyUnitInvalid,

    #[error("values have inconsistent data types")]
    PropertyValuesInconsistent,

    #[error("values are incompatible with odml type '{0}'")]
    OdmlTypeIncompatible(OdmlType),
}

/// Suspicious but not invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    NoVersion,
    NoFormat,
    NoPolynomialCoefficients,
    NoExpansionOrigin,
    InvalidUnit,
    SampledDimOffsetWithoutUnit(usize),
    MixedReferenceRank,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::NoVersion => write!(f, "file has no format version"),
            WarningKind::NoFormat => write!(f, "file has no format string"),
            WarningKind::NoPolynomialCoefficients => {
                write!(f, "expansion origin is set but polynomial coefficients are not")
            }
            WarningKind::NoExpansionOrigin => {
                write!(f, "polynomial coefficients are set but expansion origin is not")
            }
            WarningKind::InvalidUnit => write!(f, "unit is not valid"),
            WarningKind::SampledDimOffsetWithoutUnit(position) => {
                write!(f, "dimension {}: offset set without unit", position)
            }
            WarningKind::MixedReferenceRank => {
                write!(f, "references have different numbers of dimensions")
            }
        }
    }
}

/// One reported defect of either severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Error(ErrorKind),
    Warning(WarningKind),
}

impl Finding {
    pub fn is_error(&self) -> bool {
        matches!(self, Finding::Error(_))
    }
}

impl From<ErrorKind> for Finding {
    fn from(kind: ErrorKind) -> Self {
        Finding::Error(kind)
    }
}

impl From<WarningKind> for Finding {
    fn from(kind: WarningKind) -> Self {
        Finding::Warning(kind)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Error(kind) => write!(f, "error: {kind}"),
            Finding::Warning(kind) => write!(f, "warning: {kind}"),
        }
    }
}
