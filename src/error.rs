use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort construction of a stack or an operation on its view
#[derive(Debug, Error)]
pub enum StackError {
    /// The stack directory does not contain a file with the given extension
    #[error("Missing file: directory {} must contain a \".{extension}\" file", dir.display())]
    MissingFile { extension: String, dir: PathBuf },

    /// Open options are inconsistent
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A shape-driving attribute is absent from the descriptor
    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// A required attribute cannot be interpreted as a dimension length
    #[error("Cannot coerce attribute {key} = {value} to a dimension length")]
    TypeCoercion { key: &'static str, value: String },

    /// The descriptor's dimension lengths describe more bytes than can be addressed
    #[error("Shape {shape:?} is too large to address")]
    ShapeOverflow { shape: Vec<usize> },

    /// The raw file is shorter than the shape implies
    #[error("Insufficient data in {}: shape requires {expected} bytes, file has {actual}", path.display())]
    InsufficientData {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// Attempt to mutate a view opened read-only
    #[error("Stack was opened read-only")]
    ReadOnly,

    /// Index lies outside the view's shape
    #[error("Index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },

    /// Index has the wrong number of coordinates
    #[error("Expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Decoded samples do not fit the requested array shape
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// I/O error while reading the descriptor or mapping the raw file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a single descriptor line is skipped.
///
/// These never escape the descriptor reader; vendor files routinely contain
/// section headers and other lines that are not assignments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// Splitting on `=` did not give exactly a key and a value
    #[error("Expected one '=', line splits into {0} fields")]
    WrongFieldCount(usize),

    /// Value is empty or a bare `""` placeholder
    #[error("Value is empty")]
    EmptyValue,
}

/// Non-fatal conditions noticed while opening a stack.
///
/// Each one is logged through `tracing` when it is detected and kept on the
/// stack so callers can inspect it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackWarning {
    /// Descriptor declares a layout other than single-channel XYT
    #[error("experiment_type is {experiment_type:?}; only XYT stacks are supported")]
    SchemaAssumption { experiment_type: String },

    /// Raw file is longer than the shape implies; trailing bytes are ignored
    #[error("raw file has {actual} bytes but shape implies {expected}; treating the rest as padding")]
    SizeMismatch { expected: u64, actual: u64 },
}
