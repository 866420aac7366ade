//! Constants for prefix-pack.

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Category holding shared libraries.
pub const LIBS_CATEGORY: &str = "libs";

/// Category holding executables.
pub const BINS_CATEGORY: &str = "bins";

/// Category holding development files.
pub const DEVEL_CATEGORY: &str = "devel";

/// Categories that always exist, even when undeclared.
pub const RESERVED_CATEGORIES: &[&str] = &[LIBS_CATEGORY, BINS_CATEGORY, DEVEL_CATEGORY];

/// Directory scanned for static and import libraries.
pub const DEVEL_LIB_DIR: &str = "lib";

/// Extensions of development library artifacts.
pub const DEVEL_LIB_EXTS: &[&str] = &[".a", ".la", ".so"];

/// Token replaced with the platform binary extension.
pub const BINARY_EXT_TOKEN: &str = "{bext}";

/// Token replaced with the platform shared library extension.
pub const SHARED_LIB_EXT_TOKEN: &str = "{sext}";

/// Token replaced with the platform shared library directory.
pub const SHARED_LIB_DIR_TOKEN: &str = "{sdir}";

/// WiX source schema namespace.
pub const WIX_NAMESPACE: &str = "http://schemas.microsoft.com/wix/2006/wi";

/// Installer language (en-US).
pub const WIX_LANGUAGE: &str = "1033";

/// Identifier of the installer root directory.
pub const WIX_ROOT_DIR_ID: &str = "TARGETDIR";

/// Name of the installer root directory.
pub const WIX_ROOT_DIR_NAME: &str = "SourceDir";

/// WiX compiler executable.
pub const CANDLE_EXE: &str = "candle.exe";

/// WiX linker executable.
pub const LIGHT_EXE: &str = "light.exe";

/// Wine launcher used on non-Windows hosts.
pub const WINE_BIN: &str = "wine";

/// Drive wine maps the filesystem root to.
pub const WINE_ROOT_DRIVE: &str = "z:";

/// Environment variable for the WiX installation prefix.
pub const WIX_PREFIX_ENV: &str = "PREFIX_PACK_WIX_PREFIX";

/// Default WiX installation prefix.
pub const DEFAULT_WIX_PREFIX: &str = "C:/Program Files/Windows Installer XML v3.5/bin";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Get the WiX prefix, checking PREFIX_PACK_WIX_PREFIX env var first.
pub fn get_wix_prefix() -> String {
    std::env::var(WIX_PREFIX_ENV).unwrap_or_else(|_| DEFAULT_WIX_PREFIX.to_string())
}
