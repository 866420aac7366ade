//! Help output styling for clap.

use clap::builder::styling::{AnsiColor, Styles};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Help output styles shared by every command.
///
/// Literals (subcommands, flags) are cyan so they line up with the colored
/// category names printed by `prefix-pack categories`.
pub fn styles() -> Styles {
    let problem = AnsiColor::Red.on_default().bold();

    Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::BrightCyan.on_default())
        .placeholder(AnsiColor::Cyan.on_default().italic())
        .error(problem)
        .invalid(problem)
        .valid(AnsiColor::BrightGreen.on_default().bold())
}
