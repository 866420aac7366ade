//! WiX installer generation.
//!
//! A resolved file list becomes a directory tree, the tree is rendered into a
//! WiX source document, and the document is compiled by `candle` and linked
//! by `light` into a merge module or installer package.

mod document;
mod toolchain;

use crate::error::PackResult;
use crate::package::PackageMetadata;
use crate::tree::{GuidPolicy, TreeBuilder};
use std::path::{Path, PathBuf};

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use document::{Document, XmlElement, render};
pub use toolchain::{Launcher, OutputKind, WixToolchain, to_wine_path};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Build the source document for `files`, sourced from `source_root`.
pub fn descriptor<S: AsRef<str>>(
    metadata: &PackageMetadata,
    files: &[S],
    source_root: &str,
    guid_policy: GuidPolicy,
) -> PackResult<Document> {
    let tree = TreeBuilder::new(source_root)
        .with_guid_policy(guid_policy)
        .build(files)?;

    tracing::debug!(
        "Installer tree for {} has {} nodes",
        metadata.name,
        tree.len()
    );

    Ok(render(&tree, metadata))
}

/// Express `prefix` as an absolute file source root for `launcher`.
pub fn source_root(prefix: &Path, launcher: Launcher) -> PackResult<String> {
    Ok(launcher.map_path(&std::path::absolute(prefix)?))
}

/// Write `document` to `<output_dir>/<name>.wxs`.
pub fn write_source(document: &Document, output_dir: &Path) -> PackResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.wxs", document.package_name));
    std::fs::write(&path, document.to_xml())?;
    Ok(path)
}

/// Write, compile and link `document`, returning the linked artifact.
///
/// Both stages run inside `output_dir`, which is made absolute first. The
/// linker never runs when the compiler fails. Files left in `output_dir`
/// after an error are not usable.
pub async fn emit(
    document: &Document,
    output_dir: &Path,
    toolchain: &WixToolchain,
    kind: OutputKind,
) -> PackResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let output_dir = std::path::absolute(output_dir)?;

    let source = write_source(document, &output_dir)?;
    toolchain.candle(&source, &output_dir).await?;

    let object = output_dir.join(format!("{}.wixobj", document.package_name));
    let artifact = toolchain
        .light(&object, &document.package_name, &output_dir, kind)
        .await?;

    tracing::info!("Created {}", artifact.display());
    Ok(artifact)
}

/// Generate and compile an installer for `files` installed under `prefix`.
pub async fn build_package<S: AsRef<str>>(
    metadata: &PackageMetadata,
    files: &[S],
    prefix: &Path,
    output_dir: &Path,
    toolchain: &WixToolchain,
    kind: OutputKind,
    guid_policy: GuidPolicy,
) -> PackResult<PathBuf> {
    let source_root = source_root(prefix, toolchain.launcher())?;
    let document = descriptor(metadata, files, &source_root, guid_policy)?;
    emit(&document, output_dir, toolchain, kind).await
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::{CompilerStage, PackError};
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    const CANDLE_OK: &str = "#!/bin/sh\n[ -f \"$1\" ] || { echo \"missing $1\" >&2; exit 2; }\ntouch \"$(basename \"$1\" .wxs).wixobj\"\n";
    const CANDLE_FAIL: &str = "#!/bin/sh\necho 'syntax error' >&2\nexit 3\n";
    const CANDLE_SLOW: &str = "#!/bin/sh\nsleep 5\n";
    const LIGHT_OK: &str = "#!/bin/sh\n[ -f \"$1\" ] || { echo \"missing $1\" >&2; exit 2; }\ntouch light-ran\ntouch \"$3\"\n";
    const WINE_LOG: &str = "#!/bin/sh\nprintf '%s\\n' \"$@\" >> wine-args.log\n";
    const LIGHT_FAIL: &str = "#!/bin/sh\necho 'ICE error'\nexit 1\n";

    fn script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn toolchain(candle: &str, light: &str) -> (TempDir, WixToolchain) {
        let wix = TempDir::new().unwrap();
        script(wix.path(), "candle.exe", candle);
        script(wix.path(), "light.exe", light);
        let toolchain = WixToolchain::new(wix.path(), Launcher::Native);
        (wix, toolchain)
    }

    fn document() -> Document {
        let metadata = PackageMetadata::new("gst-core", "0.10.36");
        descriptor(&metadata, &["bin/gst-launch", "lib/libgst.so"], "/prefix", GuidPolicy::Random)
            .unwrap()
    }

    #[tokio::test]
    async fn test_emit_merge_module() {
        let (_wix, toolchain) = toolchain(CANDLE_OK, LIGHT_OK);
        let out = TempDir::new().unwrap();

        let artifact = emit(&document(), out.path(), &toolchain, OutputKind::MergeModule)
            .await
            .unwrap();

        assert_eq!(artifact, out.path().join("gst-core.msm"));
        assert!(artifact.exists());
        assert!(out.path().join("gst-core.wxs").exists());
        assert!(out.path().join("gst-core.wixobj").exists());
    }

    #[tokio::test]
    async fn test_emit_installer() {
        let (_wix, toolchain) = toolchain(CANDLE_OK, LIGHT_OK);
        let out = TempDir::new().unwrap();

        let artifact = emit(&document(), out.path(), &toolchain, OutputKind::Installer)
            .await
            .unwrap();
        assert_eq!(artifact, out.path().join("gst-core.msi"));
    }

    #[tokio::test]
    async fn test_candle_failure_skips_light() {
        let (_wix, toolchain) = toolchain(CANDLE_FAIL, LIGHT_OK);
        let out = TempDir::new().unwrap();

        let err = emit(&document(), out.path(), &toolchain, OutputKind::MergeModule)
            .await
            .unwrap_err();

        match err {
            PackError::CompilerFailed {
                stage,
                code,
                stderr,
                ..
            } => {
                assert_eq!(stage, CompilerStage::Candle);
                assert_eq!(code, Some(3));
                assert!(stderr.contains("syntax error"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(!out.path().join("light-ran").exists());
    }

    #[tokio::test]
    async fn test_light_failure_surfaces_output() {
        let (_wix, toolchain) = toolchain(CANDLE_OK, LIGHT_FAIL);
        let out = TempDir::new().unwrap();

        let err = emit(&document(), out.path(), &toolchain, OutputKind::MergeModule)
            .await
            .unwrap_err();

        match err {
            PackError::CompilerFailed { stage, stdout, .. } => {
                assert_eq!(stage, CompilerStage::Light);
                assert!(stdout.contains("ICE error"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_toolchain() {
        let wix = TempDir::new().unwrap();
        let toolchain = WixToolchain::new(wix.path(), Launcher::Native);
        let out = TempDir::new().unwrap();

        let err = emit(&document(), out.path(), &toolchain, OutputKind::MergeModule)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PackError::CompilerSpawn {
                stage: CompilerStage::Candle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_stage_timeout() {
        let (_wix, toolchain) = toolchain(CANDLE_SLOW, LIGHT_OK);
        let toolchain = toolchain.with_timeout(Duration::from_millis(200));
        let out = TempDir::new().unwrap();

        let err = emit(&document(), out.path(), &toolchain, OutputKind::MergeModule)
            .await
            .unwrap_err();
        assert!(matches!(err, PackError::CompilerTimeout { .. }));
        assert!(!out.path().join("light-ran").exists());
    }

    #[tokio::test]
    async fn test_cancellation() {
        let token = CancellationToken::new();
        let (_wix, toolchain) = toolchain(CANDLE_SLOW, LIGHT_OK);
        let toolchain = toolchain.with_cancellation(token.clone());
        let out = TempDir::new().unwrap();

        token.cancel();
        let err = emit(&document(), out.path(), &toolchain, OutputKind::MergeModule)
            .await
            .unwrap_err();
        assert!(matches!(err, PackError::Cancelled));
    }

    #[tokio::test]
    async fn test_emit_into_relative_output_dir() {
        let (_wix, toolchain) = toolchain(CANDLE_OK, LIGHT_OK);
        let work = tempfile::Builder::new().tempdir_in(".").unwrap();
        let relative = work
            .path()
            .strip_prefix(std::env::current_dir().unwrap())
            .unwrap_or(work.path())
            .join("out");
        assert!(relative.is_relative());

        let artifact = emit(&document(), &relative, &toolchain, OutputKind::MergeModule)
            .await
            .unwrap();

        assert!(artifact.is_absolute());
        assert!(artifact.exists());
        assert!(relative.join("gst-core.wixobj").exists());
        assert!(!relative.join(&relative).exists());
    }

    #[tokio::test]
    async fn test_wine_invocation() {
        let wix = TempDir::new().unwrap();
        script(wix.path(), "wine", WINE_LOG);
        let toolchain = WixToolchain::new(wix.path(), Launcher::Wine)
            .with_wine_bin(wix.path().join("wine"));
        let out = TempDir::new().unwrap();

        let artifact = emit(&document(), out.path(), &toolchain, OutputKind::MergeModule)
            .await
            .unwrap();
        assert_eq!(artifact, out.path().join("gst-core.msm"));

        let log = std::fs::read_to_string(out.path().join("wine-args.log")).unwrap();
        let args: Vec<&str> = log.lines().collect();
        let candle = wix.path().join("candle.exe");
        let light = wix.path().join("light.exe");
        let source = to_wine_path(&out.path().join("gst-core.wxs"));
        let object = to_wine_path(&out.path().join("gst-core.wixobj"));

        assert!(source.starts_with("z:\\"));
        assert_eq!(
            args,
            vec![
                candle.to_str().unwrap(),
                source.as_str(),
                light.to_str().unwrap(),
                object.as_str(),
                "-o",
                "gst-core.msm",
                "-sval",
            ]
        );
    }

    #[tokio::test]
    async fn test_relative_prefix_becomes_absolute_source() {
        let (_wix, toolchain) = toolchain(CANDLE_OK, LIGHT_OK);
        let out = TempDir::new().unwrap();
        let metadata = PackageMetadata::new("foo", "1.0");

        build_package(
            &metadata,
            &["README"],
            Path::new("./dist"),
            out.path(),
            &toolchain,
            OutputKind::MergeModule,
            GuidPolicy::Random,
        )
        .await
        .unwrap();

        let expected = std::env::current_dir().unwrap().join("dist").join("README");
        let source = std::fs::read_to_string(out.path().join("foo.wxs")).unwrap();
        assert!(source.contains(&format!("Source=\"{}\"", expected.display())));
        assert!(!source.contains("./dist"));
    }

    #[tokio::test]
    async fn test_build_package_from_prefix() {
        let (_wix, toolchain) = toolchain(CANDLE_OK, LIGHT_OK);
        let out = TempDir::new().unwrap();
        let metadata = PackageMetadata::new("foo", "1.0");

        let artifact = build_package(
            &metadata,
            &["README"],
            Path::new("/opt/prefix"),
            out.path(),
            &toolchain,
            OutputKind::MergeModule,
            GuidPolicy::Stable("foo".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(artifact, out.path().join("foo.msm"));
        let source = std::fs::read_to_string(out.path().join("foo.wxs")).unwrap();
        assert!(source.contains("Source=\"/opt/prefix/README\""));
    }
}
