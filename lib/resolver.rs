//! Category-to-file resolution against an installed prefix.
//!
//! Each category is resolved with a search strategy chosen by its name:
//! `libs` globs for shared libraries, `bins` builds executable paths without
//! touching the filesystem, and every other category substitutes platform
//! tokens and expands patterns and directories.

use crate::category::Categories;
use crate::constants::{BINS_CATEGORY, DEVEL_LIB_DIR, DEVEL_LIB_EXTS, LIBS_CATEGORY};
use crate::error::PackResult;
use crate::listing::{FileGlobber, PrefixGlobber, ensure_readable, is_pattern};
use crate::platform::{Platform, PlatformExtensions};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How the entries of a category are turned into files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Glob for shared libraries by base name.
    Libraries,
    /// Build executable paths from base names.
    Binaries,
    /// Substitute tokens, expand patterns and directories.
    Files,
}

/// Resolves declared categories into prefix-relative file paths.
#[derive(Debug, Clone)]
pub struct CategoryResolver<G = PrefixGlobber> {
    prefix: PathBuf,
    platform: Platform,
    extensions: PlatformExtensions,
    categories: Categories,
    globber: G,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Strategy {
    /// Strategy used for the category `name`.
    pub fn for_category(name: &str) -> Self {
        match name {
            LIBS_CATEGORY => Strategy::Libraries,
            BINS_CATEGORY => Strategy::Binaries,
            _ => Strategy::Files,
        }
    }
}

impl CategoryResolver<PrefixGlobber> {
    /// Create a resolver over `prefix` for `platform`.
    pub fn new(prefix: impl Into<PathBuf>, platform: Platform, categories: Categories) -> Self {
        Self {
            prefix: prefix.into(),
            platform,
            extensions: platform.extensions(),
            categories,
            globber: PrefixGlobber,
        }
    }
}

impl<G: FileGlobber> CategoryResolver<G> {
    /// Replace the filesystem collaborator.
    pub fn with_globber<H: FileGlobber>(self, globber: H) -> CategoryResolver<H> {
        CategoryResolver {
            prefix: self.prefix,
            platform: self.platform,
            extensions: self.extensions,
            categories: self.categories,
            globber,
        }
    }

    /// The prefix files are resolved against.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// The target platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Declared category names, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.categories.names().map(str::to_string).collect()
    }

    /// Resolve one category into a sorted list of unique paths.
    pub fn resolve_category(&self, name: &str) -> PackResult<Vec<String>> {
        let entries = self.categories.get(name)?.entries_for(self.platform);

        let files = match Strategy::for_category(name) {
            Strategy::Libraries => self.search_libraries(&entries)?,
            Strategy::Binaries => self.search_binaries(&entries),
            Strategy::Files => self.search_files(&entries)?,
        };

        tracing::debug!("Category {} resolved to {} files", name, files.len());
        Ok(sorted_unique(files))
    }

    /// Resolve several categories into one sorted list of unique paths.
    pub fn files_by_categories<S: AsRef<str>>(&self, names: &[S]) -> PackResult<Vec<String>> {
        let mut files = BTreeSet::new();
        for name in names {
            files.extend(self.resolve_category(name.as_ref())?);
        }
        Ok(files.into_iter().collect())
    }

    /// Static, import and development-symlink artifacts of the `libs` category.
    pub fn devel_libraries(&self) -> PackResult<Vec<String>> {
        let names = self.categories.get(LIBS_CATEGORY)?.entries_for(self.platform);
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let patterns: Vec<String> = names
            .iter()
            .flat_map(|name| devel_library_patterns(name))
            .collect();

        self.globber.glob(&patterns, &self.prefix)
    }

    fn search_files(&self, entries: &[&str]) -> PackResult<Vec<String>> {
        ensure_readable(&self.prefix)?;

        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = self.extensions.substitute(entry);
            let path = path.trim_end_matches('/');

            if is_pattern(path) {
                files.extend(
                    self.globber
                        .glob_recursive(&[path.to_string()], &self.prefix)?,
                );
            } else if self.prefix.join(path).is_dir() {
                files.extend(self.globber.list_dir(path, &self.prefix)?);
            } else {
                files.push(path.to_string());
            }
        }

        Ok(files)
    }

    fn search_binaries(&self, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|name| binary_path(&self.extensions, name))
            .collect()
    }

    fn search_libraries(&self, names: &[&str]) -> PackResult<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let patterns: Vec<String> = names
            .iter()
            .flat_map(|name| library_patterns(self.platform, name))
            .collect();

        self.globber.glob(&patterns, &self.prefix)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Installed path of the executable `name`.
pub fn binary_path(extensions: &PlatformExtensions, name: &str) -> String {
    format!("bin/{}{}", name, extensions.binary_ext)
}

/// File stems a library called `name` may be installed under.
///
/// `foo` may be installed as `foo*` or `libfoo*`; a name already starting
/// with `lib` is used as is.
pub fn library_stems(name: &str) -> Vec<String> {
    if name.starts_with("lib") {
        vec![name.to_string()]
    } else {
        vec![name.to_string(), format!("lib{}", name)]
    }
}

/// Glob patterns matching the shared library `name` on `platform`.
pub fn library_patterns(platform: Platform, name: &str) -> Vec<String> {
    let ext = platform.extensions();
    let mut patterns = Vec::new();

    for stem in library_stems(name) {
        let pattern = format!("{}/{}*{}", ext.shared_lib_dir, stem, ext.shared_lib_ext);
        // libfoo.so.X, libfoo.so.X.Y.Z
        if platform == Platform::Linux {
            patterns.push(format!("{}.*", pattern));
        }
        patterns.push(pattern);
    }

    patterns
}

/// Glob patterns matching development artifacts of the library `name`.
pub fn devel_library_patterns(name: &str) -> Vec<String> {
    library_stems(name)
        .iter()
        .flat_map(|stem| {
            DEVEL_LIB_EXTS
                .iter()
                .map(move |ext| format!("{}/{}*{}", DEVEL_LIB_DIR, stem, ext))
        })
        .collect()
}

fn sorted_unique(files: Vec<String>) -> Vec<String> {
    files
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
