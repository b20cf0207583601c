//! Configuration for opening stacks and for the `sciscan` command line tool.
//!
//! Library callers use [`StackOptions`] to pick the access mode and the file
//! extensions that identify the descriptor and raw file. The CLI types wrap
//! the same settings with clap, and every option can also be given through an
//! environment variable with the `SCISCAN_` prefix:
//!
//! - `SCISCAN_INI_EXT` - Descriptor extension (default: ini)
//! - `SCISCAN_RAW_EXT` - Raw data extension (default: raw)
//! - `SCISCAN_FORMAT` - Output format for `info` (default: text)
//!
//! # Example
//!
//! ```ignore
//! use sciscan_stack::{AccessMode, SciScanStack, StackOptions};
//!
//! let options = StackOptions::new().with_mode(AccessMode::ReadWrite);
//! let stack = SciScanStack::open_with_options("/data/session_01", &options)?;
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io::AccessMode;

// =============================================================================
// Default Values
// =============================================================================

/// Default descriptor file extension.
pub const DEFAULT_DESCRIPTOR_EXTENSION: &str = "ini";

/// Default raw pixel file extension.
pub const DEFAULT_RAW_EXTENSION: &str = "raw";

// =============================================================================
// StackOptions
// =============================================================================

/// Options controlling how a stack directory is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOptions {
    /// How the raw file is mapped.
    pub mode: AccessMode,

    /// Extension of the descriptor file, without the dot.
    pub descriptor_extension: String,

    /// Extension of the raw pixel file, without the dot.
    pub raw_extension: String,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            mode: AccessMode::ReadOnly,
            descriptor_extension: DEFAULT_DESCRIPTOR_EXTENSION.to_string(),
            raw_extension: DEFAULT_RAW_EXTENSION.to_string(),
        }
    }
}

impl StackOptions {
    /// Read-only access with the standard `.ini`/`.raw` extensions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the descriptor extension. A leading dot is accepted and dropped.
    pub fn with_descriptor_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.descriptor_extension = normalize_extension(ext.as_ref());
        self
    }

    /// Set the raw file extension. A leading dot is accepted and dropped.
    pub fn with_raw_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.raw_extension = normalize_extension(ext.as_ref());
        self
    }

    /// Validate the options and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.descriptor_extension.is_empty() || self.raw_extension.is_empty() {
            return Err("file extensions must not be empty".to_string());
        }
        if self.descriptor_extension == self.raw_extension {
            return Err(format!(
                "descriptor and raw extensions must differ (both are '{}')",
                self.raw_extension
            ));
        }
        Ok(())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// sciscan - inspect SciScan raw image stacks.
///
/// A stack is a directory holding a `.ini` descriptor and a `.raw` file of
/// big-endian 16-bit samples.
#[derive(Parser, Debug, Clone)]
#[command(name = "sciscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show shape, dimension names, warnings and metadata of a stack
    Info(InfoConfig),

    /// Print a single sample
    Get(GetConfig),

    /// Overwrite a single sample in place
    Set(SetConfig),
}

/// Output format for `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Arguments shared by every subcommand that opens a stack.
#[derive(Args, Debug, Clone)]
pub struct StackArgs {
    /// Directory containing the descriptor and raw file.
    pub dir: PathBuf,

    /// Descriptor file extension.
    #[arg(long, default_value = DEFAULT_DESCRIPTOR_EXTENSION, env = "SCISCAN_INI_EXT")]
    pub ini_ext: String,

    /// Raw pixel file extension.
    #[arg(long, default_value = DEFAULT_RAW_EXTENSION, env = "SCISCAN_RAW_EXT")]
    pub raw_ext: String,
}

impl StackArgs {
    /// Build library options for the given access mode.
    pub fn options(&self, mode: AccessMode) -> StackOptions {
        StackOptions::new()
            .with_mode(mode)
            .with_descriptor_extension(&self.ini_ext)
            .with_raw_extension(&self.raw_ext)
    }
}

/// Arguments for `sciscan info`.
#[derive(Args, Debug, Clone)]
pub struct InfoConfig {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "SCISCAN_FORMAT")]
    pub format: OutputFormat,
}

impl InfoConfig {
    pub fn options(&self) -> StackOptions {
        self.stack.options(AccessMode::ReadOnly)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.options().validate()
    }
}

/// Arguments for `sciscan get`.
#[derive(Args, Debug, Clone)]
pub struct GetConfig {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Sample index, outermost axis first (e.g. `3,10,20` for T,Y,X).
    #[arg(long, value_delimiter = ',', required = true)]
    pub index: Vec<usize>,
}

impl GetConfig {
    pub fn options(&self) -> StackOptions {
        self.stack.options(AccessMode::ReadOnly)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.options().validate()?;
        if self.index.is_empty() {
            return Err("index must not be empty".to_string());
        }
        Ok(())
    }
}

/// Arguments for `sciscan set`.
#[derive(Args, Debug, Clone)]
pub struct SetConfig {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Sample index, outermost axis first.
    #[arg(long, value_delimiter = ',', required = true)]
    pub index: Vec<usize>,

    /// Value to store.
    #[arg(long)]
    pub value: u16,

    /// Access mode used to open the raw file (r+ or w+).
    #[arg(long, default_value = "r+")]
    pub mode: AccessMode,
}

impl SetConfig {
    pub fn options(&self) -> StackOptions {
        self.stack.options(self.mode)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.options().validate()?;
        if self.index.is_empty() {
            return Err("index must not be empty".to_string());
        }
        match self.mode {
            AccessMode::ReadWrite | AccessMode::Create => Ok(()),
            AccessMode::ReadOnly => Err("set requires a writable mode (r+ or w+)".to_string()),
            AccessMode::CopyOnWrite => Err(
                "copy-on-write changes are never written to disk; use r+ or w+".to_string(),
            ),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
