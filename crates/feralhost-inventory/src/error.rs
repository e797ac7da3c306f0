/// Errors from inventory persistence.
///
/// The accessor's domain operations never fail; only moving documents
/// in and out of storage does.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// A stored document could not be decoded.
    #[error("failed to decode inventory document {category}: {source}")]
    Decode {
        category: String,
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be encoded for storage.
    #[error("failed to encode inventory document {category}: {source}")]
    Encode {
        category: String,
        #[source]
        source: serde_json::Error,
    },

    /// The storage backend failed.
    #[error("inventory storage failed: {0}")]
    Storage(String),
}
