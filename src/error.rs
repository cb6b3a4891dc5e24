use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A file or directory could not be opened, listed or written
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The csv layer failed while reading or writing a file
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A run-level argument was out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Reasons a single line or file is dropped. These never abort the run, they are
/// logged where they are detected and processing moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The line had fewer fields than the record needs
    #[error("expected at least {required} fields, found {found}")]
    TooFewFields { required: usize, found: usize },

    /// The price was not a decimal literal
    #[error("invalid price `{0}`")]
    InvalidPrice(String),

    /// Prices can not be below zero
    #[error("negative price `{0}`")]
    NegativePrice(String),

    /// The product id is not in the catalog
    #[error("unknown product id `{0}`")]
    UnknownProduct(String),

    /// The quantity did not parse as an integer
    #[error("invalid quantity `{0}`")]
    InvalidQuantity(String),

    /// `price * quantity`, or the running total it is added to, is too large to hold
    #[error("amount for {quantity} x {unit_price} does not fit in a total")]
    AmountOverflow { unit_price: String, quantity: u32 },

    /// Zero or negative quantities are not sales
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(i32),

    /// The first line of a sales file must be `DocType;DocNumber`
    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    /// The sales file has no lines at all
    #[error("empty sales file")]
    EmptyFile,

    /// The line could not be decoded
    #[error("unreadable line: {0}")]
    Unreadable(String),
}
