//! Moving a freshly built app over the install it upgrades.

use crate::error::{FsContext, Result};
use crate::logger::Logger;
use crate::options::EngineConfig;
use crate::outcome::Outcome;
use crate::utils::fs::{self as fs_utils, CopyOptions};
use std::path::{Path, PathBuf};

/// Copies the build at `build_path` over `dest` and removes the temporary
/// `working_out` directory.
///
/// For macOS targets `build_path` is the bundle directory holding
/// `<name>.app` and `dest` is the installed `.app`. The installed
/// `Contents/Frameworks` is removed first: copying framework bundles over an
/// existing one can create a self-referential symlink cycle. Failing to
/// remove it, or to clean up `working_out`, only degrades the outcome.
///
/// Returns `dest`, which becomes the build result.
pub async fn finalize_upgrade(
    build_path: &Path,
    dest: &Path,
    working_out: &Path,
    config: &EngineConfig,
    log: &Logger,
) -> Result<Outcome<PathBuf>> {
    let mut outcome = Outcome::clean(dest.to_path_buf());
    let options = CopyOptions {
        overwrite: config.overwrite,
        preserve_timestamps: true,
    };

    let source = if config.platform.is_macos_family() {
        let frameworks = dest.join("Contents").join("Frameworks");
        log.debug(format!(
            "Removing {} before copying the new bundle",
            frameworks.display()
        ));
        if let Err(e) = fs_utils::remove_dir_all(&frameworks).await {
            let warning = format!(
                "Could not remove {}: {}. The upgraded app may contain stale frameworks.",
                frameworks.display(),
                e
            );
            log.warn(&warning);
            outcome.warn(warning);
        }
        build_path.join(format!("{}.app", config.name))
    } else {
        build_path.to_path_buf()
    };

    log.info(format!(
        "Upgrading {} with {}",
        dest.display(),
        source.display()
    ));
    fs_utils::copy_dir(&source, dest, options)
        .await
        .fs_context("copying upgraded app", dest)?;

    if let Err(e) = fs_utils::remove_dir_all(working_out).await {
        let warning = format!(
            "Could not remove temporary build output {}: {}. Delete it manually.",
            working_out.display(),
            e
        );
        log.warn(&warning);
        outcome.warn(warning);
    }

    Ok(outcome)
}
