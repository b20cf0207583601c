//! SciScan descriptor (`.ini`) parsing.
//!
//! The descriptor is a flat list of `key = value` assignments describing the
//! acquisition. Keys are normalized (dots to underscores) and values are
//! typed with [`str2num`], producing a [`Metadata`] mapping.
//!
//! Four keys drive the stack shape and have named accessors on [`Metadata`]:
//!
//! | Key | Meaning |
//! |---|---|
//! | `x_pixels` | Frame width |
//! | `y_pixels` | Frame height |
//! | `no_of_channels` | Channel count |
//! | `frame_count` | Number of time points |
//!
//! Everything else is reachable through [`Metadata::get`].

mod parser;
mod value;

pub use parser::{parse_line, sanitize_key, sanitize_value};
pub use value::{str2num, Value};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::error::StackWarning;

// =============================================================================
// Well-known Keys
// =============================================================================

/// Frame width in pixels.
pub const X_PIXELS: &str = "x_pixels";

/// Frame height in pixels.
pub const Y_PIXELS: &str = "y_pixels";

/// Number of interleaved channels.
pub const CHANNEL_COUNT: &str = "no_of_channels";

/// Number of time points.
pub const FRAME_COUNT: &str = "frame_count";

/// Acquisition layout declared by the scanner.
pub const EXPERIMENT_TYPE: &str = "experiment_type";

/// The only layout the shape derivation understands.
pub const SUPPORTED_EXPERIMENT_TYPE: &str = "XYT";

const LINE_ENDINGS: &[char] = &['\r', '\n'];

// =============================================================================
// Metadata
// =============================================================================

/// Typed attribute mapping parsed from a descriptor.
///
/// When a key appears more than once the last assignment wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    attributes: BTreeMap<String, Value>,
}

impl Metadata {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse descriptor text from any buffered reader.
    ///
    /// Lines end at `\n`, `\r\n` or a bare `\r`. Lines that are not clean
    /// assignments are skipped. Bytes that are not valid UTF-8 are replaced
    /// rather than failing the whole descriptor.
    pub fn from_reader<R: BufRead>(mut reader: R) -> std::io::Result<Self> {
        let mut metadata = Metadata::new();
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            // A bare '\r' also ends a line
            let chunk = String::from_utf8_lossy(&buf);
            for line in chunk.trim_end_matches(LINE_ENDINGS).split('\r') {
                line_no += 1;
                match parse_line(line) {
                    Ok((key, value)) => {
                        metadata.insert(key, value);
                    }
                    Err(e) => trace!(line = line_no, "skipping descriptor line: {}", e),
                }
            }
        }

        Ok(metadata)
    }

    /// Parse descriptor text held in memory.
    pub fn parse_str(text: &str) -> Self {
        // Reading from a byte slice cannot fail
        Self::from_reader(text.as_bytes()).unwrap_or_default()
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(key.into(), value)
    }

    /// Look up an attribute by its sanitized name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn x_pixels(&self) -> Option<&Value> {
        self.get(X_PIXELS)
    }

    pub fn y_pixels(&self) -> Option<&Value> {
        self.get(Y_PIXELS)
    }

    pub fn channel_count(&self) -> Option<&Value> {
        self.get(CHANNEL_COUNT)
    }

    pub fn frame_count(&self) -> Option<&Value> {
        self.get(FRAME_COUNT)
    }

    pub fn experiment_type(&self) -> Option<&Value> {
        self.get(EXPERIMENT_TYPE)
    }

    /// Check the declared experiment type against the supported layout.
    ///
    /// Returns a warning when `experiment_type` is present and is not `XYT`.
    /// An absent key is not reported.
    pub fn layout_warning(&self) -> Option<StackWarning> {
        let declared = self.experiment_type()?;
        if declared.as_str() == Some(SUPPORTED_EXPERIMENT_TYPE) {
            return None;
        }
        Some(StackWarning::SchemaAssumption {
            experiment_type: declared.to_string(),
        })
    }
}

/// Read and parse a descriptor file.
///
/// The file is closed before this returns. A layout warning is logged if the
/// descriptor declares an unsupported experiment type.
pub fn read_descriptor(path: &Path) -> std::io::Result<Metadata> {
    let metadata = {
        let file = File::open(path)?;
        Metadata::from_reader(BufReader::new(file))?
    };

    debug!(
        path = %path.display(),
        attributes = metadata.len(),
        "parsed descriptor"
    );

    if let Some(warning) = metadata.layout_warning() {
        warn!("{}", warning);
    }

    Ok(metadata)
}

// =============================================================================
// Tests
// =============================================================================
