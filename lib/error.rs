//! Error types for prefix-pack.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Result type for prefix-pack operations.
pub type PackResult<T> = Result<T, PackError>;

/// Error type for prefix-pack operations.
#[derive(Debug, Error)]
pub enum PackError {
    /// Platform name not present in the platform table.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// Category requested but never declared.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Category declaration rejected at construction.
    #[error("Invalid category '{name}': {reason}")]
    InvalidCategory { name: String, reason: String },

    /// File path that cannot be placed in an installer tree.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Two distinct paths map to the same installer identifier.
    #[error("Identifier '{id}' is shared by '{first}' and '{second}'")]
    IdCollision {
        id: String,
        first: String,
        second: String,
    },

    /// Package definition file could not be parsed.
    #[error("Invalid package definition: {0}")]
    InvalidDefinition(#[from] toml::de::Error),

    /// Prefix directory missing or unreadable.
    #[error("Prefix unreadable: {}", path.display())]
    PrefixUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Glob pattern could not be compiled.
    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Glob listing failed while reading a directory.
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Walkdir error.
    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path strip error.
    #[error("Path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A WiX stage exited with a non-zero status.
    #[error("{stage} failed with exit code {}", code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()))]
    CompilerFailed {
        /// Which stage failed (`candle` or `light`).
        stage: CompilerStage,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A WiX stage could not be started.
    #[error("Failed to launch {stage}: {source}")]
    CompilerSpawn {
        stage: CompilerStage,
        #[source]
        source: std::io::Error,
    },

    /// A WiX stage exceeded its timeout.
    #[error("{stage} timed out after {timeout:?}")]
    CompilerTimeout {
        stage: CompilerStage,
        timeout: Duration,
    },

    /// Run abandoned through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Coarse classification of [`PackError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad platform, category, path or definition.
    Config,
    /// Prefix or glob listing failure.
    Filesystem,
    /// Installer compiler or linker failure.
    CompilerInvocation,
    /// Caller cancelled the run.
    Cancelled,
}

/// Stage of the two-step WiX build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerStage {
    /// Source document to object file.
    Candle,
    /// Object file to `.msm` / `.msi`.
    Light,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PackError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackError::UnknownPlatform(_)
            | PackError::UnknownCategory(_)
            | PackError::InvalidCategory { .. }
            | PackError::InvalidPath { .. }
            | PackError::IdCollision { .. }
            | PackError::InvalidDefinition(_) => ErrorKind::Config,
            PackError::PrefixUnreadable { .. }
            | PackError::Pattern(_)
            | PackError::Glob(_)
            | PackError::WalkDir(_)
            | PackError::StripPrefix(_)
            | PackError::Io(_)
            | PackError::Json(_) => ErrorKind::Filesystem,
            PackError::CompilerFailed { .. }
            | PackError::CompilerSpawn { .. }
            | PackError::CompilerTimeout { .. } => ErrorKind::CompilerInvocation,
            PackError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl std::fmt::Display for CompilerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompilerStage::Candle => write!(f, "candle"),
            CompilerStage::Light => write!(f, "light"),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            PackError::UnknownPlatform("beos".into()).kind(),
            ErrorKind::Config
        );
        assert_eq!(
            PackError::Io(std::io::Error::other("boom")).kind(),
            ErrorKind::Filesystem
        );
        assert_eq!(
            PackError::CompilerTimeout {
                stage: CompilerStage::Light,
                timeout: Duration::from_secs(3)
            }
            .kind(),
            ErrorKind::CompilerInvocation
        );
        assert_eq!(PackError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_compiler_failed_message() {
        let err = PackError::CompilerFailed {
            stage: CompilerStage::Candle,
            code: Some(2),
            stdout: String::new(),
            stderr: "bad".into(),
        };
        assert_eq!(err.to_string(), "candle failed with exit code 2");
    }

    #[test]
    fn test_timeout_message_keeps_subsecond_precision() {
        let err = PackError::CompilerTimeout {
            stage: CompilerStage::Light,
            timeout: Duration::from_millis(200),
        };
        assert_eq!(err.to_string(), "light timed out after 200ms");
    }

    #[test]
    fn test_id_collision_is_config_error() {
        let err = PackError::IdCollision {
            id: "share_gst_doc".into(),
            first: "share/gst-doc".into(),
            second: "share/gst_doc".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
