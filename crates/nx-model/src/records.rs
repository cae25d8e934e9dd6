//! Fixed-shape entity records.
//!
//! A record is a snapshot of one entity's attributes plus the ids of its
//! children. Readers hand out owned records; nothing here refers back into
//! storage.

use nx_core::Id;

use crate::value::{OdmlType, Value};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileRecord {
    /// Format version triple; empty when the file carries none.
    pub version: Vec<u32>,
    pub format: String,
    pub blocks: Vec<Id>,
    pub sections: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockRecord {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub groups: Vec<Id>,
    pub data_arrays: Vec<Id>,
    pub tags: Vec<Id>,
    pub multi_tags: Vec<Id>,
    pub sources: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupRecord {
    pub name: Option<String>,
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceRecord {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub sources: Vec<Id>,
}

/// What one axis of a DataArray means.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionDescriptor {
    /// Categorical axis, optionally labelled.
    Set { labels: Option<Vec<String>> },
    /// Irregular axis given by explicit tick positions.
    Range {
        ticks: Option<Vec<f64>>,
        unit: Option<String>,
    },
    /// Regular axis given by a sampling interval.
    Sampled {
        interval: f64,
        offset: Option<f64>,
        unit: Option<String>,
    },
    /// A stored type tag this model does not know.
    Unknown { dimension_type: String },
}

impl DimensionDescriptor {
    /// Decode a stored type tag into an empty descriptor of that kind.
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "set" => Self::Set { labels: None },
            "range" => Self::Range {
                ticks: None,
                unit: None,
            },
            "sample" | "sampled" => Self::Sampled {
                interval: 0.0,
                offset: None,
                unit: None,
            },
            other => Self::Unknown {
                dimension_type: other.to_string(),
            },
        }
    }

    pub fn type_tag(&self) -> &str {
        match self {
            Self::Set { .. } => "set",
            Self::Range { .. } => "range",
            Self::Sampled { .. } => "sample",
            Self::Unknown { dimension_type } => dimension_type,
        }
    }

    /// Physical unit of the axis; Set and Unknown axes have none.
    pub fn unit(&self) -> Option<&str> {
        match self {
            Self::Range { unit, .. } | Self::Sampled { unit, .. } => {
                unit.as_deref().filter(|u| !u.is_empty())
            }
            Self::Set { .. } | Self::Unknown { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRecord {
    /// Stored 1-based index; may disagree with the actual position.
    pub index: i64,
    pub descriptor: DimensionDescriptor,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataArrayRecord {
    pub name: Option<String>,
    pub type_name: Option<String>,
    /// Extent of each data axis; its length is the data rank.
    pub shape: Vec<usize>,
    pub unit: Option<String>,
    pub expansion_origin: Option<f64>,
    pub polynom_coefficients: Option<Vec<f64>>,
    pub dimensions: Vec<DimensionRecord>,
}

impl DataArrayRecord {
    pub fn rank(&self) -> usize {
        self.shape.len()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagRecord {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub position: Vec<f64>,
    pub extent: Option<Vec<f64>>,
    pub units: Option<Vec<String>>,
    pub references: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiTagRecord {
    pub name: Option<String>,
    pub type_name: Option<String>,
    /// DataArray holding one row per tagged region.
    pub positions: Option<Id>,
    pub extents: Option<Id>,
    pub units: Option<Vec<String>>,
    pub references: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionRecord {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub sections: Vec<Id>,
    pub properties: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyRecord {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub odml_type: Option<OdmlType>,
    pub values: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_round_trip() {
        for tag in ["set", "range", "sample"] {
            assert_eq!(DimensionDescriptor::from_type_tag(tag).type_tag(), tag);
        }
        assert_eq!(
            DimensionDescriptor::from_type_tag("sampled").type_tag(),
            "sample"
        );
        assert_eq!(
            DimensionDescriptor::from_type_tag("polar"),
            DimensionDescriptor::Unknown {
                dimension_type: "polar".into()
            }
        );
    }

    #[test]
    fn set_axes_carry_no_unit() {
        let set = DimensionDescriptor::Set { labels: None };
        assert_eq!(set.unit(), None);
        let sampled = DimensionDescriptor::Sampled {
            interval: 0.5,
            offset: None,
            unit: Some("ms".into()),
        };
        assert_eq!(sampled.unit(), Some("ms"));
        let blank = DimensionDescriptor::Range {
            ticks: None,
            unit: Some(String::new()),
        };
        assert_eq!(blank.unit(), None);
    }
}
