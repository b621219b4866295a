use std::path::PathBuf;

/// Failure to obtain a catalog.
///
/// Never fatal for the view: callers that must keep rendering use the
/// degrading entry points (`Catalog::from_json_or_empty`) which log this
/// and continue with an empty catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The payload is not a JSON array of `{inscriptionId, traits}` objects.
    #[error("catalog is not a valid item array: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog file could not be read.
    #[error("failed to read catalog from {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}
