//! WiX compiler (`candle`) and linker (`light`) invocation.

use crate::constants::{CANDLE_EXE, LIGHT_EXE, WINE_BIN, WINE_ROOT_DRIVE};
use crate::error::{CompilerStage, PackError, PackResult};
use std::ffi::OsString;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How the WiX executables are started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    /// Run the executables directly.
    Native,
    /// Run the executables through wine, with paths mapped to `z:\`.
    Wine,
}

/// Artifact produced by the linker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Merge module (`.msm`).
    #[default]
    MergeModule,
    /// Installer package (`.msi`).
    Installer,
}

/// Location and invocation settings of a WiX installation.
#[derive(Debug, Clone)]
pub struct WixToolchain {
    prefix: PathBuf,
    launcher: Launcher,
    wine: PathBuf,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Launcher {
    /// Launcher suited to the host: native on Windows, wine elsewhere.
    pub fn for_host() -> Self {
        if cfg!(target_os = "windows") {
            Launcher::Native
        } else {
            Launcher::Wine
        }
    }

    /// Express `path` the way the WiX executables expect it.
    pub fn map_path(self, path: &Path) -> String {
        match self {
            Launcher::Native => path.to_string_lossy().into_owned(),
            Launcher::Wine => to_wine_path(path),
        }
    }
}

impl OutputKind {
    /// File extension of the linked artifact.
    pub fn extension(self) -> &'static str {
        match self {
            OutputKind::MergeModule => "msm",
            OutputKind::Installer => "msi",
        }
    }
}

impl WixToolchain {
    /// Create a toolchain for the WiX binaries under `prefix`.
    pub fn new(prefix: impl Into<PathBuf>, launcher: Launcher) -> Self {
        Self {
            prefix: prefix.into(),
            launcher,
            wine: PathBuf::from(WINE_BIN),
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `wine` instead of the `wine` found on `PATH`.
    pub fn with_wine_bin(mut self, wine: impl Into<PathBuf>) -> Self {
        self.wine = wine.into();
        self
    }

    /// Bound each stage to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abandon running stages when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The launcher in use.
    pub fn launcher(&self) -> Launcher {
        self.launcher
    }

    /// Compile `source` into an object file in `output_dir`.
    pub async fn candle(&self, source: &Path, output_dir: &Path) -> PackResult<()> {
        let args = vec![OsString::from(self.launcher.map_path(source))];
        self.run(CompilerStage::Candle, CANDLE_EXE, args, output_dir)
            .await
    }

    /// Link `object` into `<name>.<msm|msi>` inside `output_dir`.
    pub async fn light(
        &self,
        object: &Path,
        name: &str,
        output_dir: &Path,
        kind: OutputKind,
    ) -> PackResult<PathBuf> {
        let file_name = format!("{}.{}", name, kind.extension());
        let args = vec![
            OsString::from(self.launcher.map_path(object)),
            OsString::from("-o"),
            OsString::from(&file_name),
            OsString::from("-sval"),
        ];
        self.run(CompilerStage::Light, LIGHT_EXE, args, output_dir)
            .await?;
        Ok(output_dir.join(file_name))
    }

    async fn run(
        &self,
        stage: CompilerStage,
        exe: &str,
        args: Vec<OsString>,
        output_dir: &Path,
    ) -> PackResult<()> {
        let exe_path = self.prefix.join(exe);
        let mut command = match self.launcher {
            Launcher::Native => Command::new(&exe_path),
            Launcher::Wine => {
                let mut command = Command::new(&self.wine);
                command.arg(&exe_path);
                command
            }
        };

        command
            .args(&args)
            .current_dir(output_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::info!("Running {} in {}", stage, output_dir.display());
        tracing::debug!("{:?}", command.as_std());

        let child = command
            .spawn()
            .map_err(|source| PackError::CompilerSpawn { stage, source })?;

        let output = tokio::select! {
            _ = self.cancel.cancelled() => return Err(PackError::Cancelled),
            output = bounded(child.wait_with_output(), self.timeout, stage) => output?,
        };

        if !output.status.success() {
            return Err(PackError::CompilerFailed {
                stage,
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Map a host path to the path wine exposes it under.
///
/// Wine maps the filesystem root `/` to `z:\`. Callers pass absolute paths;
/// `.` components are dropped.
pub fn to_wine_path(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect();
    format!("{}\\{}", WINE_ROOT_DRIVE, parts.join("\\"))
}

async fn bounded<F>(wait: F, timeout: Option<Duration>, stage: CompilerStage) -> PackResult<Output>
where
    F: Future<Output = std::io::Result<Output>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, wait)
            .await
            .map_err(|_| PackError::CompilerTimeout {
                stage,
                timeout: limit,
            })?
            .map_err(PackError::Io),
        None => Ok(wait.await?),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wine_path() {
        assert_eq!(
            to_wine_path(Path::new("/home/user/prefix/foo.wxs")),
            "z:\\home\\user\\prefix\\foo.wxs"
        );
        assert_eq!(to_wine_path(Path::new("relative/x")), "z:\\relative\\x");
        assert_eq!(to_wine_path(Path::new("/opt/./dist")), "z:\\opt\\dist");
    }

    #[test]
    fn test_native_paths_untouched() {
        assert_eq!(
            Launcher::Native.map_path(Path::new("/tmp/out/foo.wixobj")),
            "/tmp/out/foo.wixobj"
        );
    }

    #[test]
    fn test_output_extensions() {
        assert_eq!(OutputKind::MergeModule.extension(), "msm");
        assert_eq!(OutputKind::Installer.extension(), "msi");
        assert_eq!(OutputKind::default(), OutputKind::MergeModule);
    }
}
