//! nx-validate: structural validation of NIX-style data files.
//!
//! Walks every entity reachable from the file root through an
//! [`EntityReader`](nx_model::EntityReader) and collects findings into a
//! [`ValidationReport`] keyed by entity:
//! - errors: the file is not self-consistent (missing names, dimension
//!   descriptors that disagree with the data shape, tag units incompatible
//!   with the referenced axes, ...)
//! - warnings: suspicious but legal (missing version, half-set calibration,
//!   unparseable unit strings)
//!
//! # Example
//!
//! ```
//! use nx_core::EntityKey;
//! use nx_model::MemoryFile;
//! use nx_validate::{ErrorKind, validate};
//!
//! let mut file = MemoryFile::new("nix", vec![1, 2, 1]);
//! let block = file.create_block("session", "recording");
//! let da = file.create_data_array(block, "trace", "voltage", vec![5]).unwrap();
//! file.append_range_dimension(da, vec![10.0], Some("ms")).unwrap();
//!
//! let report = validate(&file).unwrap();
//! assert_eq!(
//!     report.errors_for(EntityKey::data_array(da)),
//!     &[ErrorKind::RangeDimTicksMismatch(1)]
//! );
//! ```

pub mod dimension;
pub mod engine;
pub mod finding;
pub mod metadata;
pub mod reference;
pub mod report;
pub mod walk;

pub use engine::{validate, validate_all};
pub use finding::{ErrorKind, Finding, WarningKind};
pub use reference::ReferenceAxes;
pub use report::ValidationReport;
