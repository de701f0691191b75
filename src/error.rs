//! Crate error type.
//!
//! Malformed *content* never errors (widths are repaired, empty columns are
//! dropped, missing capabilities are neutral). Errors are reserved for the
//! two fallible seams: parsing a configuration document and asking the host
//! factory for a child instance.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type the host factory is allowed to return.
///
/// Boxed so hosts can surface their own error types without the container
/// depending on them.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the container.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration document could not be parsed.
    #[error("invalid row configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The host factory failed to produce the child instance for a column.
    #[error("column {index}: child instance creation failed")]
    Instance {
        /// Position of the column in the surviving, normalized list.
        index: usize,
        #[source]
        source: FactoryError,
    },
}
