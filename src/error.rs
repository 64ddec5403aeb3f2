//! Error types for the gallery_metadata library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gallery_metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Error types for catalog enrichment
///
/// Catalog errors abort the run. Any error raised while computing one
/// panel's fields is counted against that panel and the run goes on.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Catalog file does not exist
    #[error("catalog not found at {}", path.display())]
    CatalogNotFound { path: PathBuf },

    /// Catalog file could not be read or written
    #[error("catalog I/O error on {}: {source}", path.display())]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog content is not valid JSON
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// Catalog is valid JSON but not the expected shape
    #[error("invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// Configuration file could not be loaded
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Panel references an image that does not exist on disk
    #[error("file not found: {}", path.display())]
    MissingImage { path: PathBuf },

    /// Image file could not be opened or decoded
    #[error("failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Color clustering could not produce a result
    #[error("clustering failed: {reason}")]
    Clustering { reason: String },

    /// Generic processing error
    #[error("processing error: {0}")]
    Processing(String),

    /// Invalid input parameters
    #[error("invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}

impl MetadataError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a catalog I/O error for `path`
    pub fn catalog_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CatalogIo {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }
}
