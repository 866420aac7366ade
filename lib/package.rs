//! Package definition files.
//!
//! A definition is a TOML document with a `[package]` table holding the
//! installer metadata and a `[categories.<name>]` table per category:
//!
//! ```toml
//! [package]
//! name = "gstreamer-core"
//! version = "0.10.36"
//! vendor = "GStreamer Project"
//!
//! [categories.libs]
//! files = ["gstreamer-0.10"]
//!
//! [categories.devel]
//! files = ["include/gstreamer-0.10"]
//! platform.windows = ["lib/gstreamer-0.10.def"]
//! ```

use crate::category::{Categories, CategorySpec};
use crate::error::PackResult;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Metadata written into the installer descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Package name, also the base name of generated files.
    pub name: String,

    /// Package version.
    #[serde(default)]
    pub version: String,

    /// Vendor written as the installer manufacturer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortdesc: Option<String>,

    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longdesc: Option<String>,

    /// Pre-assigned package identifier. A fresh one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// A loaded package definition.
#[derive(Debug, Clone)]
pub struct PackageDefinition {
    /// Installer metadata.
    pub metadata: PackageMetadata,

    /// Declared categories.
    pub categories: Categories,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    package: PackageMetadata,

    #[serde(default)]
    categories: BTreeMap<String, RawCategory>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCategory {
    #[serde(default)]
    files: Vec<String>,

    #[serde(default)]
    platform: BTreeMap<String, Vec<String>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PackageMetadata {
    /// Create metadata with a name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }
}

impl PackageDefinition {
    /// Load a definition from a TOML file.
    pub fn load(path: &Path) -> PackResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a definition from TOML text.
    pub fn from_toml(content: &str) -> PackResult<Self> {
        let raw: RawDefinition = toml::from_str(content)?;

        let mut specs = BTreeMap::new();
        for (name, raw_category) in raw.categories {
            let mut spec = CategorySpec::new(raw_category.files);
            for (platform, files) in raw_category.platform {
                spec = spec.with_platform(platform.parse::<Platform>()?, files);
            }
            specs.insert(name, spec);
        }

        Ok(Self {
            metadata: raw.package,
            categories: Categories::new(specs)?,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
