use std::path::PathBuf;

/// Errors raised while loading a definition catalog.
///
/// These only ever surface from the loaders. Lookups against a loaded
/// catalog return `Option` and treat a miss as "nothing to do".
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog payload was not the expected JSON shape.
    #[error("failed to parse {catalog} catalog: {source}")]
    Parse {
        catalog: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A single entry was present but unusable.
    #[error("invalid {catalog} entry {key:?}: {reason}")]
    InvalidEntry {
        catalog: &'static str,
        key: String,
        reason: String,
    },
}
