//! Conversion failures.

use folio_core::{IdParseError, LookupError};
use thiserror::Error;

/// Fatal failures of a conversion run.
///
/// Everything else in the pipeline degrades to a silent per-relation skip;
/// what reaches this type aborts the run with no partial document.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// An explicit entity reference could not be parsed (strict mode).
    #[error("malformed entity reference: {0}")]
    MalformedId(#[from] IdParseError),
    /// A collaborator call failed after boundary retries.
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("serializing the document failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type EnrichResult<T> = Result<T, EnrichError>;
