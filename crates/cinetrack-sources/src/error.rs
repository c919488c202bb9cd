use thiserror::Error;

/// Failures reported by a remote collection client
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The store could not be reached or rejected the request
    #[error("store transport error: {0}")]
    Transport(String),

    /// The addressed document does not exist (e.g. deleted elsewhere)
    #[error("document not found: {collection}/{document_id}")]
    NotFound { collection: String, document_id: String },

    /// A live subscription was terminated by the store
    #[error("subscription terminated: {0}")]
    Subscription(String),

    #[error("store persistence error: {0}")]
    Persistence(String),
}

/// Failures reported by the catalog client
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode catalog response: {0}")]
    Decode(String),

    #[error("catalog client is not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Short category used when summarizing per-item failures
    pub fn category(&self) -> &'static str {
        match self {
            CatalogError::Request(e) if e.is_timeout() => "timeout",
            CatalogError::Request(_) => "network",
            CatalogError::Status { status: 404, .. } => "not_found",
            CatalogError::Status { status: 429, .. } => "rate_limited",
            CatalogError::Status { status, .. } if *status >= 500 => "server_error",
            CatalogError::Status { .. } => "client_error",
            CatalogError::Decode(_) => "decode",
            CatalogError::NotConfigured(_) => "not_configured",
        }
    }
}
