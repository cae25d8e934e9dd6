//! Property values and their odML type annotations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One value of a metadata property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Storage data type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int,
    Float,
    String,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
            Self::Text(_) => DataType::String,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

/// Value kinds defined by the odML metadata format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OdmlType {
    Boolean,
    Int,
    Float,
    String,
    Text,
    Url,
    Person,
    Datetime,
    Date,
    Time,
}

impl OdmlType {
    /// Whether `value` can be carried by a property of this odML type.
    ///
    /// Date and time types are stored as strings.
    pub fn compatible(self, value: &Value) -> bool {
        match self {
            Self::String
            | Self::Text
            | Self::Url
            | Self::Person
            | Self::Datetime
            | Self::Date
            | Self::Time => value.data_type() == DataType::String,
            Self::Boolean => value.data_type() == DataType::Bool,
            Self::Float => value.data_type() == DataType::Float,
            Self::Int => value.data_type() == DataType::Int,
        }
    }

    /// The odML type naturally describing a storage data type.
    pub fn for_data_type(dtype: DataType) -> Self {
        match dtype {
            DataType::Bool => Self::Boolean,
            DataType::Int => Self::Int,
            DataType::Float => Self::Float,
            DataType::String => Self::String,
        }
    }
}

impl fmt::Display for OdmlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Text => "text",
            Self::Url => "url",
            Self::Person => "person",
            Self::Datetime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
        };
        f.write_str(name)
    }
}
