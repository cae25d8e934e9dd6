use thiserror::Error;

use crate::ids::{EntityKind, Id};

pub type NxResult<T> = Result<T, NxError>;

/// Failures of the entity model itself.
///
/// Structural defects inside a file are never reported through this type;
/// they become findings. An `NxError` means the graph could not be read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NxError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Id },

    #[error("Unreadable attribute '{attr}' on {kind} {id}: {reason}")]
    Unreadable {
        kind: EntityKind,
        id: Id,
        attr: &'static str,
        reason: String,
    },
}
