use std::path::PathBuf;

/// Digest or signature mismatch anywhere along the trust chain.
///
/// Always fatal and never retried; any partially trusted artifact has been
/// removed by the time this is returned. Distinguishable from transport
/// errors by downcasting through the error chain.
#[derive(Debug, thiserror::Error)]
#[error("untrusted key material: {0}")]
pub struct TrustError(pub String);

/// The metadata record has never been written on this system.
#[derive(Debug, thiserror::Error)]
#[error("no metadata record found at {path:?}")]
pub struct MetadataNotFound {
    pub path: PathBuf,
}
