//! Declared file categories.

use crate::constants::RESERVED_CATEGORIES;
use crate::error::{PackError, PackResult};
use crate::platform::Platform;
use std::collections::BTreeMap;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Entries declared for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySpec {
    /// Entries used on every platform.
    pub files: Vec<String>,

    /// Extra entries used only on a given platform.
    pub platform: BTreeMap<Platform, Vec<String>>,
}

/// Validated mapping from category name to its declaration.
///
/// `libs`, `bins` and `devel` are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categories {
    specs: BTreeMap<String, CategorySpec>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl CategorySpec {
    /// Create a category with platform-agnostic entries.
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            platform: BTreeMap::new(),
        }
    }

    /// Add entries used only on `platform`.
    pub fn with_platform<I, S>(mut self, platform: Platform, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platform
            .entry(platform)
            .or_default()
            .extend(files.into_iter().map(Into::into));
        self
    }

    /// Raw entries for `platform`: agnostic entries first, then platform ones.
    pub fn entries_for(&self, platform: Platform) -> Vec<&str> {
        self.files
            .iter()
            .chain(self.platform.get(&platform).into_iter().flatten())
            .map(String::as_str)
            .collect()
    }

    /// Whether nothing is declared for any platform.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.platform.values().all(Vec::is_empty)
    }
}

impl Categories {
    /// Validate `specs` and add the reserved categories.
    pub fn new(specs: BTreeMap<String, CategorySpec>) -> PackResult<Self> {
        for name in specs.keys() {
            validate_name(name)?;
        }

        let mut specs = specs;
        for reserved in RESERVED_CATEGORIES {
            specs.entry(reserved.to_string()).or_default();
        }

        Ok(Self { specs })
    }

    /// Look up a category.
    pub fn get(&self, name: &str) -> PackResult<&CategorySpec> {
        self.specs
            .get(name)
            .ok_or_else(|| PackError::UnknownCategory(name.to_string()))
    }

    /// Category names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Whether `name` is declared or reserved.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            specs: RESERVED_CATEGORIES
                .iter()
                .map(|name| (name.to_string(), CategorySpec::default()))
                .collect(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn validate_name(name: &str) -> PackResult<()> {
    if name.is_empty() {
        return Err(PackError::InvalidCategory {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(PackError::InvalidCategory {
            name: name.to_string(),
            reason: format!("invalid character '{}'", c),
        });
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
