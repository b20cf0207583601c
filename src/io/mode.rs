use std::fmt;
use std::str::FromStr;

/// How the raw pixel file is opened and mapped.
///
/// The short spellings follow the conventional memory-mapped file modes
/// (`r`, `r+`, `c`, `w+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Shared read-only mapping. The file must be at least as long as the shape implies.
    #[default]
    ReadOnly,

    /// Shared writable mapping. A short file is zero-extended to the expected length.
    ReadWrite,

    /// Private writable mapping. Writes are visible through the view but never reach disk.
    CopyOnWrite,

    /// Truncate the file and re-size it to the expected length, zero-filled.
    Create,
}

impl AccessMode {
    /// Whether the view accepts writes.
    pub const fn is_writable(&self) -> bool {
        !matches!(self, AccessMode::ReadOnly)
    }

    /// Whether opening may change the file's length on disk.
    pub const fn can_grow(&self) -> bool {
        matches!(self, AccessMode::ReadWrite | AccessMode::Create)
    }

    /// Conventional short spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "r",
            AccessMode::ReadWrite => "r+",
            AccessMode::CopyOnWrite => "c",
            AccessMode::Create => "w+",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "readonly" | "read-only" => Ok(AccessMode::ReadOnly),
            "r+" | "readwrite" | "read-write" => Ok(AccessMode::ReadWrite),
            "c" | "copyonwrite" | "copy-on-write" => Ok(AccessMode::CopyOnWrite),
            "w+" | "create" => Ok(AccessMode::Create),
            other => Err(format!(
                "unknown access mode '{}' (expected r, r+, c or w+)",
                other
            )),
        }
    }
}
