//! Error types for comicpub operations.

use thiserror::Error;

/// Errors that can occur while building a book.
#[derive(Error, Debug)]
pub enum Error {
    /// Image data was unrecognized, unreadable, or rejected (e.g. a cover that is too wide).
    #[error("Invalid image: {0}")]
    Format(String),

    /// An operation was called out of lifecycle order.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Book metadata is incomplete.
    #[error("Invalid metadata: {0}")]
    Validation(String),

    /// The navigation document was requested but no page carries a label.
    #[error("No labeled pages to build a table of contents from")]
    EmptyNavigation,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;
