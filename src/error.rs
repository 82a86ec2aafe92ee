use thiserror::Error;

/// Result type alias using the crate's aggregate error.
pub type Result<T> = std::result::Result<T, SheetMapperError>;

/// Main error type for the crate.
/// Aggregates errors from the grid seam and the record layers.
#[derive(Error, Debug)]
pub enum SheetMapperError {
    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Grid module errors
    #[error("{0}")]
    GridError(#[from] crate::grid::GridError),

    // Record module errors
    #[error("{0}")]
    HeaderError(#[from] crate::record::header::HeaderError),

    // Table module errors
    #[error("{0}")]
    TableError(#[from] crate::table::TableError),
}

pub(crate) trait ResultMessage<T> {
    fn with_prefix(self, message: &str) -> Result<T>;
}

impl<T, E> ResultMessage<T> for std::result::Result<T, E>
where
    E: Into<SheetMapperError>,
{
    fn with_prefix(self, message: &str) -> Result<T> {
        self.map_err(|error| {
            SheetMapperError::WithContextError(format!("{}: {}", message, error.into()))
        })
    }
}
