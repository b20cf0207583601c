//! Stack construction.
//!
//! Opening a stack runs a one-way pipeline:
//!
//! ```text
//! directory ──► locate .ini/.raw ──► parse descriptor ──► derive shape
//!                                                              │
//!          SciScanStack ◄── map raw file ◄── check file size ◄─┘
//! ```
//!
//! Any failure aborts construction; no partially built stack is returned.
//! Non-fatal findings (unsupported experiment type, oversized raw file) are
//! logged and collected in [`SciScanStack::warnings`].

mod shape;
mod view;

pub use shape::{Dim, ShapeSchema};
pub use view::FrameView;

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::StackOptions;
use crate::error::{StackError, StackWarning};
use crate::io::{locate_stack_files, AccessMode, MappedRaw};
use crate::metadata::{read_descriptor, Metadata};

/// A SciScan acquisition opened as a lazily loaded array.
#[derive(Debug)]
pub struct SciScanStack {
    raw_path: PathBuf,
    ini_path: PathBuf,
    metadata: Metadata,
    frames: FrameView,
    warnings: Vec<StackWarning>,
}

impl SciScanStack {
    /// Open the stack in `dir` read-only.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StackError> {
        Self::open_with_options(dir, &StackOptions::default())
    }

    /// Open the stack in `dir` with the given access mode.
    pub fn open_with_mode(dir: impl AsRef<Path>, mode: AccessMode) -> Result<Self, StackError> {
        Self::open_with_options(dir, &StackOptions::new().with_mode(mode))
    }

    /// Open the stack in `dir`.
    ///
    /// # Errors
    /// * [`StackError::InvalidOptions`] - `options` fail validation
    /// * [`StackError::MissingFile`] - no descriptor or raw file in `dir`
    /// * [`StackError::MissingAttribute`] / [`StackError::TypeCoercion`] - the
    ///   descriptor does not describe a usable shape
    /// * [`StackError::ShapeOverflow`] - the shape is too large to address
    /// * [`StackError::InsufficientData`] - the raw file is shorter than the
    ///   shape requires and the mode cannot grow it
    /// * [`StackError::Io`] - any underlying I/O failure
    pub fn open_with_options(
        dir: impl AsRef<Path>,
        options: &StackOptions,
    ) -> Result<Self, StackError> {
        options.validate().map_err(StackError::InvalidOptions)?;

        let dir = dir.as_ref();
        let files = locate_stack_files(
            dir,
            &options.descriptor_extension,
            &options.raw_extension,
        )?;

        let metadata = read_descriptor(&files.ini_path)?;

        let mut warnings = Vec::new();
        if let Some(warning) = metadata.layout_warning() {
            warnings.push(warning);
        }

        let schema = ShapeSchema::from_metadata(&metadata)?;
        let expected = schema.byte_len();

        let raw = MappedRaw::open(&files.raw_path, options.mode, expected)?;

        // Create mode measures after truncation and never warns
        if raw.on_disk_len() > expected {
            let warning = StackWarning::SizeMismatch {
                expected,
                actual: raw.on_disk_len(),
            };
            warn!(path = %files.raw_path.display(), "{}", warning);
            warnings.push(warning);
        }

        info!(
            dir = %dir.display(),
            shape = %schema.describe(),
            mode = %options.mode,
            "opened stack"
        );

        Ok(Self {
            raw_path: files.raw_path,
            ini_path: files.ini_path,
            metadata,
            frames: FrameView::new(raw, schema),
            warnings,
        })
    }

    /// Path of the raw pixel file.
    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    /// Path of the descriptor file.
    pub fn ini_path(&self) -> &Path {
        &self.ini_path
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Axis lengths, `T` outermost and `X` innermost.
    pub fn shape(&self) -> &[usize] {
        self.frames.shape()
    }

    /// Axis labels paired with [`shape`](Self::shape).
    pub fn dim_names(&self) -> &[Dim] {
        self.frames.dim_names()
    }

    pub fn schema(&self) -> &ShapeSchema {
        self.frames.schema()
    }

    /// The lazy pixel view.
    pub fn frames(&self) -> &FrameView {
        &self.frames
    }

    /// Mutable access to the pixel view; writes require a writable mode.
    pub fn frames_mut(&mut self) -> &mut FrameView {
        &mut self.frames
    }

    /// Non-fatal conditions found while opening.
    pub fn warnings(&self) -> &[StackWarning] {
        &self.warnings
    }

    /// Give up the metadata and keep only the pixel view.
    pub fn into_frames(self) -> FrameView {
        self.frames
    }
}
