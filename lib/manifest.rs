//! Development, distribution and full manifests.

use crate::constants::DEVEL_CATEGORY;
use crate::error::PackResult;
use crate::listing::{FileGlobber, PrefixGlobber};
use crate::resolver::CategoryResolver;
use serde::Serialize;
use std::collections::BTreeSet;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Composes resolved categories into manifests.
///
/// Every manifest is sorted and free of duplicates.
#[derive(Debug, Clone)]
pub struct ManifestAssembler<G = PrefixGlobber> {
    resolver: CategoryResolver<G>,
}

/// All three manifests of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifests {
    /// Development files.
    pub devel: Vec<String>,

    /// Files shipped in a runtime distribution.
    pub dist: Vec<String>,

    /// Every file.
    pub full: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<G: FileGlobber> ManifestAssembler<G> {
    /// Create an assembler over `resolver`.
    pub fn new(resolver: CategoryResolver<G>) -> Self {
        Self { resolver }
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &CategoryResolver<G> {
        &self.resolver
    }

    /// Files of the `devel` category plus link libraries derived from `libs`.
    pub fn devel_manifest(&self) -> PackResult<Vec<String>> {
        let mut files: BTreeSet<String> = self
            .resolver
            .resolve_category(DEVEL_CATEGORY)?
            .into_iter()
            .collect();
        files.extend(self.resolver.devel_libraries()?);
        Ok(files.into_iter().collect())
    }

    /// Files of every category except `devel`.
    pub fn dist_manifest(&self) -> PackResult<Vec<String>> {
        let categories: Vec<String> = self
            .resolver
            .categories()
            .into_iter()
            .filter(|name| name != DEVEL_CATEGORY)
            .collect();
        self.resolver.files_by_categories(&categories)
    }

    /// Union of the distribution and development manifests.
    pub fn full_manifest(&self) -> PackResult<Vec<String>> {
        let mut files: BTreeSet<String> = self.dist_manifest()?.into_iter().collect();
        files.extend(self.devel_manifest()?);
        Ok(files.into_iter().collect())
    }

    /// Compute all three manifests.
    pub fn manifests(&self) -> PackResult<Manifests> {
        let devel = self.devel_manifest()?;
        let dist = self.dist_manifest()?;
        let full: BTreeSet<String> = dist.iter().chain(devel.iter()).cloned().collect();

        tracing::info!(
            "Resolved {} files ({} dist, {} devel)",
            full.len(),
            dist.len(),
            devel.len()
        );

        Ok(Manifests {
            devel,
            dist,
            full: full.into_iter().collect(),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
