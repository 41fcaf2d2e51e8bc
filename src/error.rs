use thiserror::Error;

/// Inputs the pagination engine refuses to work with.
///
/// Every string is valid content; these only cover references that do not
/// resolve (an unknown page or format) and sequences that break numbering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page {page_number} does not exist in this chapter")]
    PageNotFound { page_number: u32 },

    #[error("unknown paper format: {0}")]
    UnknownFormat(String),

    #[error("page numbers are not contiguous: expected {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },
}
