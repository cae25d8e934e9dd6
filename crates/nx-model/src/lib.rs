//! nx-model: the entity model structural validation reads.
//!
//! Provides:
//! - Fixed-shape records for every entity family (Block, DataArray, Tag, ...)
//! - The `EntityReader` capability trait the validator depends on
//! - `MemoryFile`, an arena-backed reader with NIX-like creation methods
//! - A serde fixture schema to describe files in YAML or JSON
//!
//! # Example
//!
//! ```
//! use nx_model::{EntityReader, MemoryFile};
//!
//! let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
//! let block = file.create_block("session", "recording");
//! let da = file.create_data_array(block, "trace", "voltage", vec![5]).unwrap();
//! file.append_range_dimension(da, vec![0.1, 0.2, 1.5, 2.4, 3.0], Some("ms")).unwrap();
//!
//! assert_eq!(file.data_array(da).unwrap().dimensions.len(), 1);
//! ```

pub mod memory;
pub mod reader;
pub mod records;
pub mod schema;
pub mod value;

pub use memory::{MemoryFile, SourceParent};
pub use reader::EntityReader;
pub use records::*;
pub use schema::*;
pub use value::{DataType, OdmlType, Value};

use nx_core::NxError;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Model error: {0}")]
    Core(#[from] NxError),

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ModelResult<MemoryFile> {
    let def: FileDef = serde_yaml::from_str(content)?;
    MemoryFile::from_def(&def)
}

pub fn from_json_str(content: &str) -> ModelResult<MemoryFile> {
    let def: FileDef = serde_json::from_str(content)?;
    MemoryFile::from_def(&def)
}

pub fn load_yaml(path: &std::path::Path) -> ModelResult<MemoryFile> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn load_json(path: &std::path::Path) -> ModelResult<MemoryFile> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}
