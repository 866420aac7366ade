//! `prefix-pack` library.
//!
//! Classifies the files of an installed build prefix into categories,
//! assembles development and distribution manifests from them, and turns a
//! manifest into a WiX merge module or installer package.

pub mod category;
pub mod commands;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod manifest;
pub mod package;
pub mod platform;
pub mod resolver;
pub mod styles;
pub mod tree;
pub mod wix;

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use category::*;
pub use commands::*;
pub use constants::*;
pub use error::*;
pub use handlers::*;
pub use listing::*;
pub use manifest::*;
pub use package::*;
pub use platform::*;
pub use resolver::*;
pub use tree::*;
