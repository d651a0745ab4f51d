//! Error type for the simulation core.
//!
//! None of these are fatal: a rejected request leaves the world untouched.

use thiserror::Error;

use crate::EntityKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A host supplied a kind name that matches nothing spawnable
    #[error("unknown entity kind: {0:?}")]
    UnknownKind(String),

    /// Only environment objects can be removed
    #[error("{0} cannot be despawned")]
    NotDespawnable(EntityKind),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
