//! App icons: format conversion and placement in the staged app.

mod convert;

pub use convert::{IconConverter, ImageIconConverter};

use crate::error::{FsContext, Result};
use crate::logger::Logger;
use crate::options::ResolvedConfig;
use crate::utils::fs as fs_utils;
use std::path::{Path, PathBuf};

/// File name of the tray icon looked up next to a macOS app icon.
pub const TRAY_ICON_FILE: &str = "tray-icon.png";

/// Copies the configured icon into the staged app.
///
/// - macOS family: only the tray icon, `<icon dir>/tray-icon.png`, and only
///   when the tray is enabled. It lands at `<staged>/icon.png`.
/// - Windows and Linux: the icon itself at `<staged>/icon.<ext>`, with the
///   extension lowercased.
///
/// Returns the written path, or `None` when nothing had to be copied. A
/// missing source file is an error.
pub async fn copy_icons(
    config: &ResolvedConfig,
    staged: &Path,
    log: &Logger,
) -> Result<Option<PathBuf>> {
    let Some(icon) = &config.engine.icon else {
        log.debug("No icon configured, skipping icon copy");
        return Ok(None);
    };

    let (source, dest) = if config.engine.platform.is_macos_family() {
        if !config.features.tray.is_enabled() {
            log.debug("Tray disabled, no tray icon to copy");
            return Ok(None);
        }
        let source = icon
            .parent()
            .map(|dir| dir.join(TRAY_ICON_FILE))
            .unwrap_or_else(|| PathBuf::from(TRAY_ICON_FILE));
        (source, staged.join("icon.png"))
    } else {
        let dest = match icon.extension() {
            Some(ext) => staged
                .join("icon")
                .with_extension(ext.to_string_lossy().to_ascii_lowercase()),
            None => staged.join("icon"),
        };
        (icon.clone(), dest)
    };

    log.debug(format!(
        "Copying icon {} -> {}",
        source.display(),
        dest.display()
    ));
    fs_utils::copy_file(&source, &dest)
        .await
        .fs_context("copying icon", &source)?;

    Ok(Some(dest))
}
