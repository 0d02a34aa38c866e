use thiserror::Error;

/// Errors raised while stamping footers.
#[derive(Debug, Error)]
pub enum FooterError {
    #[error("no active document found")]
    NoActiveDocument,

    #[error("no bookmarks found in the document")]
    NoBookmarks,

    #[error("annotation creation failed")]
    AnnotationCreation,

    #[error("cannot navigate to bookmark '{name}': {reason}")]
    Navigation { name: String, reason: String },

    #[error("page index {index} is out of range (document has {count} pages)")]
    PageOutOfRange { index: u32, count: usize },

    #[error("annotation {0:?} does not exist")]
    UnknownAnnotation(lopdf::ObjectId),

    #[error("{0}")]
    Host(String),

    #[error("invalid footer configuration: {0}")]
    InvalidConfig(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FooterError>;
