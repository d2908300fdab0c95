//! Directory scanning for source files

use std::path::{Path, PathBuf};

use crate::error::{LogixError, Result};

/// Regular files directly inside `dir` whose extension is exactly
/// `extension`, sorted by path.
///
/// Matching is case-sensitive and does not descend into subdirectories.
/// Glob metacharacters in `dir` or `extension` match literally.
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(extension)
    );

    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)
        .map_err(|e| LogixError::Config(format!("bad file pattern: {}", e)))?
    {
        let path = entry.map_err(std::io::Error::from)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
