use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StackError;

/// Paths of the two files that make up a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFiles {
    pub ini_path: PathBuf,
    pub raw_path: PathBuf,
}

/// Find the descriptor and raw file inside `dir`.
///
/// Files are matched on their extension only; everything else is ignored.
/// When several files share an extension the last one returned by the
/// directory listing is used.
pub fn locate_stack_files(
    dir: &Path,
    descriptor_ext: &str,
    raw_ext: &str,
) -> Result<StackFiles, StackError> {
    let mut ini_path = None;
    let mut raw_path = None;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext == raw_ext => raw_path = Some(path),
            Some(ext) if ext == descriptor_ext => ini_path = Some(path),
            _ => {}
        }
    }

    let ini_path = ini_path.ok_or_else(|| StackError::MissingFile {
        extension: descriptor_ext.to_string(),
        dir: dir.to_path_buf(),
    })?;
    let raw_path = raw_path.ok_or_else(|| StackError::MissingFile {
        extension: raw_ext.to_string(),
        dir: dir.to_path_buf(),
    })?;

    debug!(
        ini = %ini_path.display(),
        raw = %raw_path.display(),
        "located stack files"
    );

    Ok(StackFiles { ini_path, raw_path })
}
