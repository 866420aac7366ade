//! Filesystem pattern expansion relative to a prefix.

use crate::error::{PackError, PackResult};
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Lists files under a base directory.
///
/// Returned paths are relative to `base_dir`, `/`-separated and free of
/// duplicates.
pub trait FileGlobber {
    /// Expand shell-style patterns into matching files. Matched directories are
    /// skipped. A pattern without matches contributes nothing.
    fn glob(&self, patterns: &[String], base_dir: &Path) -> PackResult<Vec<String>>;

    /// Like [`glob`](Self::glob), but matched directories contribute every
    /// file below them.
    fn glob_recursive(&self, patterns: &[String], base_dir: &Path) -> PackResult<Vec<String>>;

    /// List every file below `dir` (relative to `base_dir`) recursively.
    fn list_dir(&self, dir: &str, base_dir: &Path) -> PackResult<Vec<String>>;
}

/// [`FileGlobber`] backed by the `glob` and `walkdir` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixGlobber;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PrefixGlobber {
    fn expand(
        &self,
        patterns: &[String],
        base_dir: &Path,
        descend: bool,
    ) -> PackResult<Vec<String>> {
        ensure_readable(base_dir)?;

        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let base = glob::Pattern::escape(&base_dir.to_string_lossy());
        let mut matches = BTreeSet::new();

        for pattern in patterns {
            let full = format!("{}/{}", base, pattern);
            tracing::debug!("Expanding pattern {}", pattern);

            for entry in glob::glob_with(&full, options)? {
                let path = entry?;
                if !path.is_dir() {
                    matches.insert(to_relative(&path, base_dir)?);
                } else if descend {
                    walk_into(&path, base_dir, &mut matches)?;
                }
            }
        }

        Ok(matches.into_iter().collect())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FileGlobber for PrefixGlobber {
    fn glob(&self, patterns: &[String], base_dir: &Path) -> PackResult<Vec<String>> {
        self.expand(patterns, base_dir, false)
    }

    fn glob_recursive(&self, patterns: &[String], base_dir: &Path) -> PackResult<Vec<String>> {
        self.expand(patterns, base_dir, true)
    }

    fn list_dir(&self, dir: &str, base_dir: &Path) -> PackResult<Vec<String>> {
        ensure_readable(base_dir)?;

        let mut files = BTreeSet::new();
        walk_into(&base_dir.join(dir), base_dir, &mut files)?;
        Ok(files.into_iter().collect())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Fail unless `dir` is an existing, listable directory.
pub fn ensure_readable(dir: &Path) -> PackResult<()> {
    std::fs::read_dir(dir)
        .map(|_| ())
        .map_err(|source| PackError::PrefixUnreadable {
            path: dir.to_path_buf(),
            source,
        })
}

/// Whether `entry` contains shell pattern metacharacters.
pub fn is_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Collect every file below `dir` as a path relative to `base`.
fn walk_into(dir: &Path, base: &Path, files: &mut BTreeSet<String>) -> PackResult<()> {
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            files.insert(to_relative(entry.path(), base)?);
        }
    }
    Ok(())
}

/// Express `path` relative to `base` with `/` separators.
fn to_relative(path: &Path, base: &Path) -> PackResult<String> {
    let relative = path.strip_prefix(base)?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
