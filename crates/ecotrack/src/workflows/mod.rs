//! Domain workflows exposed by the EcoTrack core.
//!
//! Each submodule follows the same layout: `domain` holds the entity types,
//! `repository` the storage traits, `service` the operations, and `router` the
//! HTTP surface. Services receive repositories and the current timestamp as
//! explicit parameters; nothing here reaches into process-wide state.

pub mod badges;
pub mod challenges;
pub mod impact;
pub mod social;
pub mod users;

/// Error enumeration shared by all repository traits. Implementations are
/// expected to perform each service operation's reads and writes inside a
/// single transaction; `Unavailable` is the catch-all for backend failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
