//! WiX source rendering and package build handlers.

use super::{guid_policy, launcher, load_target};
use crate::commands::{TargetArgs, WixArgs};
use crate::constants::get_wix_prefix;
use crate::error::PackResult;
use crate::wix::{self, OutputKind, WixToolchain};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Print the WiX source for the full manifest, or write it to `output`.
pub async fn render_installer(
    target: TargetArgs,
    wix_args: WixArgs,
    output: Option<PathBuf>,
) -> PackResult<()> {
    let (definition, assembler) = load_target(&target)?;
    let files = assembler.full_manifest()?;

    let source_root = wix::source_root(&target.prefix, launcher(&wix_args))?;
    let document = wix::descriptor(
        &definition.metadata,
        &files,
        &source_root,
        guid_policy(&wix_args, &definition),
    )?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, document.to_xml())?;
            println!(
                "  {} Wrote {} ({} files)",
                "✓".bright_green(),
                path.display().to_string().bright_white(),
                files.len()
            );
        }
        None => print!("{}", document.to_xml()),
    }

    Ok(())
}

/// Generate, compile and link a package for the full manifest.
pub async fn build_installer(
    target: TargetArgs,
    wix_args: WixArgs,
    output: PathBuf,
    wix_prefix: Option<String>,
    installer: bool,
    timeout: Option<u64>,
) -> PackResult<()> {
    let (definition, assembler) = load_target(&target)?;
    let files = assembler.full_manifest()?;

    let mut toolchain = WixToolchain::new(
        wix_prefix.unwrap_or_else(get_wix_prefix),
        launcher(&wix_args),
    );
    if let Some(seconds) = timeout {
        toolchain = toolchain.with_timeout(Duration::from_secs(seconds));
    }

    let kind = if installer {
        OutputKind::Installer
    } else {
        OutputKind::MergeModule
    };

    println!(
        "  {} {} {} ({} files)",
        "→".bright_blue(),
        definition.metadata.name.bold(),
        definition.metadata.version.dimmed(),
        files.len()
    );

    let artifact = wix::build_package(
        &definition.metadata,
        &files,
        &target.prefix,
        &output,
        &toolchain,
        kind,
        guid_policy(&wix_args, &definition),
    )
    .await?;

    println!(
        "  {} Created {}",
        "✓".bright_green(),
        artifact.display().to_string().bright_white()
    );

    Ok(())
}
