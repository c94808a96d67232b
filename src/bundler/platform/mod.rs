//! On-disk bundle layouts.
//!
//! | Platform | Layout | Module |
//! |----------|--------|--------|
//! | Linux, Windows | runtime shell + `resources/app` | this module |
//! | macOS, Mac App Store | `.app` bundle | [`macos`] |

pub mod macos;

use super::{Result, error::ErrorExt};
use crate::bail;
use crate::options::{EngineConfig, TargetPlatform};
use crate::utils::fs::{self as fs_utils, CopyOptions};
use std::path::{Path, PathBuf};

/// Name of the executable inside a runtime shell directory, before renaming.
pub const RUNTIME_EXECUTABLE: &str = "runtime";

/// Where the staged app lives inside a directory bundle.
pub const APP_RESOURCES_DIR: &str = "resources/app";

/// `<name>-<platform>-<arch>`
pub fn bundle_dir_name(config: &EngineConfig) -> String {
    format!("{}-{}-{}", config.name, config.platform, config.arch)
}

/// Executable file name for `stem` on `platform`.
pub fn executable_name(stem: &str, platform: TargetPlatform) -> String {
    match platform {
        TargetPlatform::Windows => format!("{stem}.exe"),
        _ => stem.to_string(),
    }
}

/// Lays out a Linux or Windows directory bundle.
///
/// ```text
/// <bundle_dir>/
///   <name>[.exe]        renamed runtime executable
///   ...                 rest of the runtime shell
///   resources/app/      staged app
/// ```
pub async fn layout_directory_bundle(config: &EngineConfig, bundle_dir: &Path) -> Result<()> {
    if let Some(runtime_dir) = &config.runtime_dir {
        install_runtime(config, runtime_dir, bundle_dir).await?;
    }

    let app_dir = bundle_dir.join(APP_RESOURCES_DIR);
    copy_staged_app(&config.dir, &app_dir).await
}

/// Copies the runtime shell into `dest` and renames its executable after the app.
///
/// Returns the path of the renamed executable.
pub(crate) async fn install_runtime(
    config: &EngineConfig,
    runtime_dir: &Path,
    dest: &Path,
) -> Result<PathBuf> {
    let source_exe = executable_name(RUNTIME_EXECUTABLE, config.platform);
    if !runtime_dir.join(&source_exe).is_file() {
        bail!(
            "runtime shell {} has no {} executable",
            runtime_dir.display(),
            source_exe
        );
    }

    log::debug!(
        "Copying runtime shell {} -> {}",
        runtime_dir.display(),
        dest.display()
    );
    fs_utils::copy_dir(
        runtime_dir,
        dest,
        CopyOptions {
            overwrite: true,
            preserve_timestamps: false,
        },
    )
    .await
    .fs_context("copying runtime shell", runtime_dir)?;

    let from = dest.join(&source_exe);
    let to = dest.join(executable_name(&config.name, config.platform));
    if from != to {
        tokio::fs::rename(&from, &to)
            .await
            .fs_context("renaming runtime executable", &from)?;
    }
    fs_utils::set_executable(&to)
        .await
        .fs_context("setting executable permissions", &to)?;

    Ok(to)
}

pub(crate) async fn copy_staged_app(staged: &Path, app_dir: &Path) -> Result<()> {
    fs_utils::copy_dir(
        staged,
        app_dir,
        CopyOptions {
            overwrite: true,
            preserve_timestamps: true,
        },
    )
    .await
    .fs_context("copying staged app", staged)
}
