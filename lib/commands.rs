//! CLI command definitions.

use crate::styles::styles;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const CLI_EXAMPLES: &str = "\
Examples:
  prefix-pack categories -d gst.toml               List declared categories
  prefix-pack files -d gst.toml -p ./dist          Print the full manifest
  prefix-pack files -d gst.toml -p ./dist -m devel Print development files only
  prefix-pack render -d gst.toml -p ./dist         Print the WiX source
  prefix-pack build -d gst.toml -p ./dist -o out   Build a merge module";

const FILES_EXAMPLES: &str = "\
Examples:
  prefix-pack files -d gst.toml -p ./dist                 Full manifest
  prefix-pack files -d gst.toml -p ./dist -m dist          Runtime files only
  prefix-pack files -d gst.toml -p ./dist -C libs -C bins Selected categories
  prefix-pack files -d gst.toml -p ./dist -P windows      Windows naming rules
  prefix-pack files -d gst.toml -p ./dist --json          JSON with all manifests";

const BUILD_EXAMPLES: &str = "\
Examples:
  prefix-pack build -d gst.toml -p ./dist -o out              Merge module (.msm)
  prefix-pack build -d gst.toml -p ./dist -o out --installer  Installer (.msi)
  prefix-pack build -d gst.toml -p ./dist -o out --wine       Run WiX through wine
  prefix-pack build -d gst.toml -p ./dist -o out -t 300       Limit each stage to 300s";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// prefix-pack - Package build prefixes.
#[derive(Debug, Parser)]
#[command(name = "prefix-pack", author, version, styles=styles())]
#[command(
    about = "Classify build prefix files and generate WiX installers",
    after_help = CLI_EXAMPLES
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the categories declared in a package definition.
    Categories {
        /// Package definition file.
        #[arg(short, long)]
        definition: PathBuf,
    },

    /// Print the files of a package.
    #[command(after_help = FILES_EXAMPLES)]
    Files {
        #[command(flatten)]
        target: TargetArgs,

        /// Which manifest to print.
        #[arg(short, long, value_enum, default_value_t = ManifestSelection::Full)]
        manifest: ManifestSelection,

        /// Print only these categories (repeatable).
        #[arg(short = 'C', long = "category", conflicts_with = "manifest")]
        categories: Vec<String>,

        /// Print all manifests as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print or write the WiX source document.
    Render {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        wix: WixArgs,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate, compile and link a WiX package.
    #[command(after_help = BUILD_EXAMPLES)]
    Build {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        wix: WixArgs,

        /// Output directory.
        #[arg(short, long)]
        output: PathBuf,

        /// Directory holding candle.exe and light.exe (defaults to $PREFIX_PACK_WIX_PREFIX).
        #[arg(long)]
        wix_prefix: Option<String>,

        /// Produce an installer package (.msi) instead of a merge module (.msm).
        #[arg(long)]
        installer: bool,

        /// Abort a stage after this many seconds.
        #[arg(short, long)]
        timeout: Option<u64>,
    },
}

/// Package definition, prefix and platform.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Package definition file.
    #[arg(short, long)]
    pub definition: PathBuf,

    /// Installed prefix directory.
    #[arg(short, long)]
    pub prefix: PathBuf,

    /// Target platform: windows, linux or darwin (defaults to the host).
    #[arg(short = 'P', long)]
    pub platform: Option<String>,
}

/// Installer generation options.
#[derive(Debug, Args)]
pub struct WixArgs {
    /// Derive component GUIDs from the package name instead of generating fresh ones.
    #[arg(long)]
    pub stable_guids: bool,

    /// Run the WiX tools through wine (default on non-Windows hosts).
    #[arg(long, conflicts_with = "native")]
    pub wine: bool,

    /// Run the WiX tools directly (default on Windows hosts).
    #[arg(long)]
    pub native: bool,
}

/// Manifest printed by `files`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ManifestSelection {
    /// Every file.
    Full,
    /// Runtime files.
    Dist,
    /// Development files.
    Devel,
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
