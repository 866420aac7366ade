//! Target platforms and their file naming conventions.

use crate::error::PackError;
use std::fmt;
use std::str::FromStr;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Target platform of a build prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    /// Windows.
    Windows,
    /// Linux.
    Linux,
    /// macOS.
    Darwin,
}

/// Naming conventions of a platform's installed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformExtensions {
    /// Executable suffix (`.exe` or empty).
    pub binary_ext: &'static str,

    /// Shared library suffix.
    pub shared_lib_ext: &'static str,

    /// Directory shared libraries are installed to.
    pub shared_lib_dir: &'static str,
}

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const WINDOWS_EXTENSIONS: PlatformExtensions = PlatformExtensions {
    binary_ext: ".exe",
    shared_lib_ext: ".dll",
    shared_lib_dir: "bin",
};

const LINUX_EXTENSIONS: PlatformExtensions = PlatformExtensions {
    binary_ext: "",
    shared_lib_ext: ".so",
    shared_lib_dir: "lib",
};

const DARWIN_EXTENSIONS: PlatformExtensions = PlatformExtensions {
    binary_ext: "",
    shared_lib_ext: ".dylib",
    shared_lib_dir: "lib",
};

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Platform {
    /// All known platforms.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::Darwin];

    /// Detect the platform this process runs on.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Darwin
        } else {
            Platform::Linux
        }
    }

    /// Naming conventions for this platform.
    pub fn extensions(self) -> PlatformExtensions {
        match self {
            Platform::Windows => WINDOWS_EXTENSIONS,
            Platform::Linux => LINUX_EXTENSIONS,
            Platform::Darwin => DARWIN_EXTENSIONS,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
        }
    }
}

impl PlatformExtensions {
    /// Replace `{bext}`, `{sext}` and `{sdir}` tokens in `entry`.
    pub fn substitute(&self, entry: &str) -> String {
        use crate::constants::{BINARY_EXT_TOKEN, SHARED_LIB_DIR_TOKEN, SHARED_LIB_EXT_TOKEN};

        entry
            .replace(BINARY_EXT_TOKEN, self.binary_ext)
            .replace(SHARED_LIB_EXT_TOKEN, self.shared_lib_ext)
            .replace(SHARED_LIB_DIR_TOKEN, self.shared_lib_dir)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for Platform {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win32" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "darwin" | "macos" | "osx" => Ok(Platform::Darwin),
            _ => Err(PackError::UnknownPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_table() {
        let win = Platform::Windows.extensions();
        assert_eq!(win.binary_ext, ".exe");
        assert_eq!(win.shared_lib_ext, ".dll");
        assert_eq!(win.shared_lib_dir, "bin");

        let linux = Platform::Linux.extensions();
        assert_eq!(linux.binary_ext, "");
        assert_eq!(linux.shared_lib_ext, ".so");
        assert_eq!(linux.shared_lib_dir, "lib");

        let darwin = Platform::Darwin.extensions();
        assert_eq!(darwin.shared_lib_ext, ".dylib");
        assert_eq!(darwin.shared_lib_dir, "lib");
    }

    #[test]
    fn test_parse_platform() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("Win32".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Darwin);
        assert!(matches!(
            "beos".parse::<Platform>(),
            Err(PackError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_substitute_tokens() {
        let win = Platform::Windows.extensions();
        assert_eq!(win.substitute("{sdir}/foo{sext}"), "bin/foo.dll");
        assert_eq!(win.substitute("bin/tool{bext}"), "bin/tool.exe");

        let linux = Platform::Linux.extensions();
        assert_eq!(linux.substitute("bin/tool{bext}"), "bin/tool");
        assert_eq!(linux.substitute("share/doc"), "share/doc");
    }
}
