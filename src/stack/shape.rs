//! Shape derivation from descriptor attributes.
//!
//! SciScan never writes the array layout explicitly. It is inferred from four
//! attributes, with the channel axis only present for multi-channel stacks:
//!
//! | Channels | Dims | Shape |
//! |---|---|---|
//! | ≤ 1 | `T, Y, X` | `(frames, y_pixels, x_pixels)` |
//! | > 1 | `T, C, Y, X` | `(frames, channels, y_pixels, x_pixels)` |
//!
//! The layout is decided by channel count alone; there is no format version
//! field to consult.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StackError;
use crate::io::SAMPLE_SIZE;
use crate::metadata::{Metadata, CHANNEL_COUNT, FRAME_COUNT, X_PIXELS, Y_PIXELS};

// =============================================================================
// Dim
// =============================================================================

/// Axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dim {
    /// Time point
    T,
    /// Channel
    C,
    /// Row
    Y,
    /// Column
    X,
}

impl Dim {
    pub const fn as_char(&self) -> char {
        match self {
            Dim::T => 'T',
            Dim::C => 'C',
            Dim::Y => 'Y',
            Dim::X => 'X',
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// =============================================================================
// ShapeSchema
// =============================================================================

/// Ordered axis names and lengths of a stack.
///
/// Construction guarantees that the byte size of every sub-block of the
/// shape fits in a `usize`, so element counts, strides and offsets never
/// overflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeSchema {
    dims: Vec<Dim>,
    shape: Vec<usize>,
}

impl ShapeSchema {
    /// Build the schema from dimension counts.
    ///
    /// The channel axis is dropped when `channels <= 1`.
    ///
    /// # Errors
    /// [`StackError::ShapeOverflow`] if the non-zero axis lengths multiply
    /// past the addressable byte range.
    pub fn from_counts(
        frames: usize,
        channels: usize,
        height: usize,
        width: usize,
    ) -> Result<Self, StackError> {
        let schema = if channels > 1 {
            Self {
                dims: vec![Dim::T, Dim::C, Dim::Y, Dim::X],
                shape: vec![frames, channels, height, width],
            }
        } else {
            Self {
                dims: vec![Dim::T, Dim::Y, Dim::X],
                shape: vec![frames, height, width],
            }
        };

        // A zero axis empties the stack but not its strides
        let addressable = schema
            .shape
            .iter()
            .filter(|&&n| n > 0)
            .try_fold(SAMPLE_SIZE, |acc, &n| acc.checked_mul(n));
        match addressable {
            Some(_) => Ok(schema),
            None => Err(StackError::ShapeOverflow {
                shape: schema.shape,
            }),
        }
    }

    /// Derive the schema from the shape-driving descriptor attributes.
    ///
    /// # Errors
    /// * [`StackError::MissingAttribute`] if a required key is absent
    /// * [`StackError::TypeCoercion`] if a value is not a non-negative number
    /// * [`StackError::ShapeOverflow`] if the lengths describe an
    ///   unaddressable stack
    pub fn from_metadata(metadata: &Metadata) -> Result<Self, StackError> {
        let width = required_length(metadata, X_PIXELS)?;
        let height = required_length(metadata, Y_PIXELS)?;
        let channels = required_length(metadata, CHANNEL_COUNT)?;
        let frames = required_length(metadata, FRAME_COUNT)?;

        Self::from_counts(frames, channels, height, width)
    }

    /// Axis lengths, outermost first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Axis labels, paired with [`shape`](Self::shape).
    pub fn dim_names(&self) -> &[Dim] {
        &self.dims
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Position of an axis, if present.
    pub fn axis(&self, dim: Dim) -> Option<usize> {
        self.dims.iter().position(|d| *d == dim)
    }

    /// Length along an axis, if present.
    pub fn len_of(&self, dim: Dim) -> Option<usize> {
        self.axis(dim).map(|i| self.shape[i])
    }

    /// Total number of samples.
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }

    /// Bytes the raw file must hold for this shape.
    pub fn byte_len(&self) -> u64 {
        (self.num_elements() * SAMPLE_SIZE) as u64
    }

    /// Row-major strides in samples.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.shape.len()];
        for i in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.shape[i + 1];
        }
        strides
    }

    /// Linear sample offset of a multi-dimensional index.
    pub fn offset_of(&self, index: &[usize]) -> Result<usize, StackError> {
        if index.len() != self.shape.len() {
            return Err(StackError::DimensionMismatch {
                expected: self.shape.len(),
                actual: index.len(),
            });
        }

        if index.iter().zip(&self.shape).any(|(i, n)| i >= n) {
            return Err(StackError::IndexOutOfBounds {
                index: index.to_vec(),
                shape: self.shape.clone(),
            });
        }

        Ok(index
            .iter()
            .zip(self.strides())
            .map(|(i, stride)| i * stride)
            .sum())
    }

    /// Comma-separated `NAME=len` listing, e.g. `T=10, Y=512, X=512`.
    pub fn describe(&self) -> String {
        self.dims
            .iter()
            .zip(&self.shape)
            .map(|(d, n)| format!("{}={}", d, n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Look up a shape-driving attribute and coerce it to a length.
fn required_length(metadata: &Metadata, key: &'static str) -> Result<usize, StackError> {
    let value = metadata
        .get(key)
        .ok_or(StackError::MissingAttribute(key))?;

    value.as_length().ok_or_else(|| StackError::TypeCoercion {
        key,
        value: value.to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
