//! # sciscan-stack
//!
//! Lazy, memory-mapped access to SciScan raw image stacks.
//!
//! A SciScan acquisition is a directory holding two files: a `.ini`
//! descriptor of `key = value` lines and a `.raw` dump of big-endian unsigned
//! 16-bit samples. This crate parses the descriptor into typed metadata,
//! infers the array shape from it, checks the shape against the raw file and
//! maps the samples as a shape-aware view without reading them into memory.
//!
//! ## Architecture
//!
//! - [`metadata`] - descriptor parsing and value type inference
//! - [`io`] - file discovery, access modes and the memory-mapped raw file
//! - [`stack`] - shape derivation, the lazy [`FrameView`] and [`SciScanStack`]
//! - [`config`] - open options and CLI types
//!
//! ## Example
//!
//! ```rust,no_run
//! use sciscan_stack::SciScanStack;
//!
//! # fn main() -> Result<(), sciscan_stack::StackError> {
//! let stack = SciScanStack::open("/data/2024-05-01_session")?;
//!
//! println!("{:?} {:?}", stack.dim_names(), stack.shape());
//! for warning in stack.warnings() {
//!     eprintln!("warning: {}", warning);
//! }
//!
//! // Decode only the first time point
//! let first = stack.frames().frame(0)?;
//! println!("first frame max = {:?}", first.iter().max());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod metadata;
pub mod stack;

// Re-export commonly used types
pub use config::{Cli, Command, GetConfig, InfoConfig, OutputFormat, SetConfig, StackOptions};
pub use error::{LineError, StackError, StackWarning};
pub use io::{locate_stack_files, AccessMode, MappedRaw, StackFiles};
pub use metadata::{read_descriptor, str2num, Metadata, Value};
pub use stack::{Dim, FrameView, SciScanStack, ShapeSchema};
