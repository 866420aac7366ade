//! Command handlers.

mod files;
mod installer;

use crate::commands::{TargetArgs, WixArgs};
use crate::error::PackResult;
use crate::manifest::ManifestAssembler;
use crate::package::PackageDefinition;
use crate::platform::Platform;
use crate::resolver::CategoryResolver;
use crate::tree::GuidPolicy;
use crate::wix::Launcher;

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use files::{list_categories, list_files};
pub use installer::{build_installer, render_installer};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Load the definition named by `target` and set up an assembler over its prefix.
fn load_target(target: &TargetArgs) -> PackResult<(PackageDefinition, ManifestAssembler)> {
    let platform = match target.platform.as_deref() {
        Some(name) => name.parse::<Platform>()?,
        None => Platform::host(),
    };

    let definition = PackageDefinition::load(&target.definition)?;
    tracing::debug!(
        "Loaded {} for {} from {}",
        definition.metadata.name,
        platform,
        target.definition.display()
    );

    let resolver = CategoryResolver::new(&target.prefix, platform, definition.categories.clone());
    Ok((definition, ManifestAssembler::new(resolver)))
}

fn launcher(args: &WixArgs) -> Launcher {
    if args.wine {
        Launcher::Wine
    } else if args.native {
        Launcher::Native
    } else {
        Launcher::for_host()
    }
}

fn guid_policy(args: &WixArgs, definition: &PackageDefinition) -> GuidPolicy {
    if args.stable_guids {
        GuidPolicy::Stable(definition.metadata.name.clone())
    } else {
        GuidPolicy::Random
    }
}
