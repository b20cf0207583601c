//! Lazy, shape-aware view over a mapped raw file.
//!
//! Samples are decoded from the mapping on access; nothing is copied until a
//! frame or the whole stack is explicitly materialized as an `ndarray`.

use ndarray::{ArrayD, IxDyn};

use crate::error::StackError;
use crate::io::{decode_samples, read_u16_be, write_u16_be, AccessMode, MappedRaw, SAMPLE_SIZE};

use super::shape::{Dim, ShapeSchema};

/// Big-endian u16 samples laid out according to a [`ShapeSchema`].
///
/// The view owns the file mapping and releases it on drop.
#[derive(Debug)]
pub struct FrameView {
    raw: MappedRaw,
    schema: ShapeSchema,
}

impl FrameView {
    /// Wrap a mapping. The mapping must hold at least `schema.byte_len()` bytes.
    pub(crate) fn new(raw: MappedRaw, schema: ShapeSchema) -> Self {
        debug_assert!(raw.len() as u64 >= schema.byte_len());
        Self { raw, schema }
    }

    pub fn schema(&self) -> &ShapeSchema {
        &self.schema
    }

    pub fn shape(&self) -> &[usize] {
        self.schema.shape()
    }

    pub fn dim_names(&self) -> &[Dim] {
        self.schema.dim_names()
    }

    pub fn ndim(&self) -> usize {
        self.schema.ndim()
    }

    /// Number of samples in the view.
    pub fn len(&self) -> usize {
        self.schema.num_elements()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of time points.
    pub fn num_frames(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    pub fn mode(&self) -> AccessMode {
        self.raw.mode()
    }

    pub fn is_writable(&self) -> bool {
        self.raw.mode().is_writable()
    }

    /// Raw big-endian bytes backing the view.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw.as_slice()[..self.len() * SAMPLE_SIZE]
    }

    /// Read one sample.
    pub fn get(&self, index: &[usize]) -> Result<u16, StackError> {
        let offset = self.schema.offset_of(index)? * SAMPLE_SIZE;
        Ok(read_u16_be(&self.raw.as_slice()[offset..]))
    }

    /// Write one sample in place.
    ///
    /// # Errors
    /// [`StackError::ReadOnly`] unless the stack was opened in a writable mode.
    pub fn set(&mut self, index: &[usize], value: u16) -> Result<(), StackError> {
        let offset = self.schema.offset_of(index)? * SAMPLE_SIZE;
        let bytes = self.raw.as_mut_slice().ok_or(StackError::ReadOnly)?;
        write_u16_be(&mut bytes[offset..], value);
        Ok(())
    }

    /// Decode one time point into an owned array.
    ///
    /// The result has the view's shape without the leading `T` axis.
    pub fn frame(&self, t: usize) -> Result<ArrayD<u16>, StackError> {
        let frames = self.num_frames();
        if t >= frames {
            let mut index = vec![0; self.ndim()];
            index[0] = t;
            return Err(StackError::IndexOutOfBounds {
                index,
                shape: self.shape().to_vec(),
            });
        }

        let frame_shape = &self.shape()[1..];
        let frame_bytes = frame_shape.iter().product::<usize>() * SAMPLE_SIZE;
        let start = t * frame_bytes;
        let samples = decode_samples(&self.raw.as_slice()[start..start + frame_bytes]);

        Ok(ArrayD::from_shape_vec(IxDyn(frame_shape), samples)?)
    }

    /// Decode the whole stack into an owned array.
    pub fn to_array(&self) -> Result<ArrayD<u16>, StackError> {
        let samples = decode_samples(self.as_bytes());
        Ok(ArrayD::from_shape_vec(IxDyn(self.shape()), samples)?)
    }

    /// Write modified pages back to disk.
    ///
    /// Only read-write and create modes touch the file.
    pub fn flush(&self) -> Result<(), StackError> {
        self.raw.flush()
    }
}
