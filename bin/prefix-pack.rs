//! `prefix-pack` is the primary CLI binary.

use clap::Parser;
use colored::Colorize;
use prefix_pack::handlers;
use prefix_pack::{Cli, Command, PackError, PackResult};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print an error with appropriate formatting based on error type.
fn print_error(e: &PackError) {
    println!();
    match e {
        PackError::CompilerFailed {
            stage,
            code,
            stdout,
            stderr,
        } => {
            let code = code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  {} {} failed",
                format!("error[{}]", stage).bright_red().bold(),
                stage.to_string().bright_white()
            );
            println!();
            println!("    {}: {}", "Exit code".dimmed(), code);
            for (label, output) in [("stdout", stdout), ("stderr", stderr)] {
                if output.trim().is_empty() {
                    continue;
                }
                println!();
                println!("    {}:", label.dimmed());
                for line in output.lines() {
                    println!("      {}", line);
                }
            }
        }
        PackError::CompilerSpawn { stage, source } => {
            println!(
                "  {} Failed to launch {}",
                "error".bright_red().bold(),
                stage.to_string().bright_white()
            );
            println!();
            println!("    {}", source);
            println!();
            println!(
                "    {}: Pass {} or set {}",
                "hint".bright_blue().bold(),
                "--wix-prefix".bright_white(),
                prefix_pack::WIX_PREFIX_ENV.bright_white()
            );
        }
        PackError::UnknownCategory(name) => {
            println!(
                "  {} Unknown category: {}",
                "error".bright_red().bold(),
                name.bright_white()
            );
            println!();
            println!(
                "    {}: Run {} to see declared categories",
                "hint".bright_blue().bold(),
                "prefix-pack categories".bright_white()
            );
        }
        PackError::Cancelled => {
            println!("  {} Operation cancelled", "✗".bright_red());
        }
        _ => {
            let msg = e.to_string();
            if let Some((prefix, rest)) = msg.split_once(": ") {
                if prefix.len() < 30 && !prefix.contains(' ') || prefix.ends_with("error") {
                    println!(
                        "  {} {}",
                        format!("error[{}]", prefix.to_lowercase().replace(" error", ""))
                            .bright_red()
                            .bold(),
                        rest.dimmed()
                    );
                } else {
                    println!("  {} {}", "error".bright_red().bold(), msg);
                }
            } else {
                println!("  {} {}", "error".bright_red().bold(), msg);
            }
        }
    }
    println!();
}

/// Initialize tracing. Only enables logging when RUST_LOG is set.
fn init_tracing() {
    let rust_log_set = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.is_empty())
        .is_some();

    if !rust_log_set {
        return;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();
}

async fn run() -> PackResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Categories { definition } => handlers::list_categories(&definition).await,

        Command::Files {
            target,
            manifest,
            categories,
            json,
        } => handlers::list_files(target, manifest, categories, json).await,

        Command::Render {
            target,
            wix,
            output,
        } => handlers::render_installer(target, wix, output).await,

        Command::Build {
            target,
            wix,
            output,
            wix_prefix,
            installer,
            timeout,
        } => {
            handlers::build_installer(target, wix, output, wix_prefix, installer, timeout).await
        }
    }
}
