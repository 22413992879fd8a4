//! File-system side of the CLI: reading script lines and enumerating inputs.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read a script file into its lines.
///
/// Game files are not always valid UTF-8 (older titles ship Windows-1252
/// text), so invalid sequences are replaced rather than rejected.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&*text);
    Ok(text.lines().map(str::to_string).collect())
}

/// List the files inside `dir`, sorted by path.
///
/// Without `recursive` only the directory's own entries are returned;
/// with it, files in every subdirectory are included too.
pub fn list_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry =
            entry.with_context(|| format!("Failed to list directory: {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Expand CLI inputs into script files: files pass through, directories are
/// listed with [`list_files`].
pub fn collect_inputs(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(list_files(path, recursive)?);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            anyhow::bail!("No such file or directory: {}", path.display());
        }
    }
    Ok(files)
}
