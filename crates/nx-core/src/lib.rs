//! nx-core: stable foundation for nixcheck.
//!
//! Contains:
//! - ids (compact arena IDs and entity keys used to address model objects)
//! - error (shared error types)
//! - units (SI unit string resolution: prefixes, atomicity, compatibility)

pub mod error;
pub mod ids;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{NxError, NxResult};
pub use ids::*;
pub use units::{CanonicalUnit, SiPrefix, UnitError};
