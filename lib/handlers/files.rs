//! Category and manifest listing handlers.

use super::load_target;
use crate::commands::{ManifestSelection, TargetArgs};
use crate::error::PackResult;
use crate::package::PackageDefinition;
use crate::resolver::Strategy;
use colored::Colorize;
use std::path::Path;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Print the categories of a package definition.
pub async fn list_categories(definition: &Path) -> PackResult<()> {
    let definition = PackageDefinition::load(definition)?;

    println!(
        "  {} {}",
        definition.metadata.name.bold(),
        definition.metadata.version.dimmed()
    );
    for name in definition.categories.names() {
        let spec = definition.categories.get(name)?;
        let strategy = match Strategy::for_category(name) {
            Strategy::Libraries => "libraries",
            Strategy::Binaries => "binaries",
            Strategy::Files => "files",
        };
        let platform_entries: usize = spec.platform.values().map(Vec::len).sum();

        println!(
            "    {} {} {}",
            name.bright_cyan(),
            format!("({})", strategy).dimmed(),
            format!(
                "{} entries, {} platform-specific",
                spec.files.len(),
                platform_entries
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Print a manifest, a set of categories, or all manifests as JSON.
pub async fn list_files(
    target: TargetArgs,
    manifest: ManifestSelection,
    categories: Vec<String>,
    json: bool,
) -> PackResult<()> {
    let (_, assembler) = load_target(&target)?;

    if json {
        let manifests = assembler.manifests()?;
        println!("{}", serde_json::to_string_pretty(&manifests)?);
        return Ok(());
    }

    let files = if !categories.is_empty() {
        assembler.resolver().files_by_categories(&categories)?
    } else {
        match manifest {
            ManifestSelection::Full => assembler.full_manifest()?,
            ManifestSelection::Dist => assembler.dist_manifest()?,
            ManifestSelection::Devel => assembler.devel_manifest()?,
        }
    };

    for file in files {
        println!("{}", file);
    }

    Ok(())
}
