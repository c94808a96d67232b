//! Icon format conversion.
//!
//! Each target wants its icon in a specific form:
//!
//! | Target | Converted icon | Notes |
//! |--------|----------------|-------|
//! | Linux | `.png` | used by the desktop entry |
//! | Windows | `.ico` | at most 256x256 |
//! | macOS | original icon + `tray-icon.png` beside it | tray icon only when decodable |
//!
//! Converted files are written into a fresh temporary directory; the
//! user's files are never touched. Any failure leaves the configuration
//! unchanged and is reported as a warning.

use crate::logger::Logger;
use crate::options::{ResolvedConfig, TargetPlatform};
use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, imageops::FilterType};
use std::path::{Path, PathBuf};

/// Largest edge an ICO entry can have.
const MAX_ICO_SIZE: u32 = 256;

/// Edge length of generated tray icons.
const TRAY_ICON_SIZE: u32 = 32;

/// Converts the configured icon into the format the target platform expects.
pub trait IconConverter: Send + Sync {
    /// Returns `config` with `engine.icon` pointing at a suitable icon.
    fn convert(&self, config: ResolvedConfig, log: &Logger) -> ResolvedConfig;
}

/// [`IconConverter`] backed by the `image` crate.
#[derive(Clone, Debug)]
pub struct ImageIconConverter {
    temp_root: PathBuf,
}

impl Default for ImageIconConverter {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl ImageIconConverter {
    /// Converter writing its output under `temp_root`.
    pub fn new(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
        }
    }

    fn output_dir(&self) -> Result<PathBuf> {
        let dir = self
            .temp_root
            .join(format!("webapp-icon-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating icon directory {}", dir.display()))?;
        Ok(dir)
    }

    fn convert_icon(&self, icon: &Path, platform: TargetPlatform, tray: bool) -> Result<Option<PathBuf>> {
        let ext = extension(icon);
        match platform {
            TargetPlatform::Linux if ext != "png" => {
                let out = self.output_dir()?.join("icon.png");
                load(icon)?
                    .save_with_format(&out, ImageFormat::Png)
                    .with_context(|| format!("writing {}", out.display()))?;
                Ok(Some(out))
            }
            TargetPlatform::Windows if ext != "ico" => {
                let img = load(icon)?;
                let img = if img.width() > MAX_ICO_SIZE || img.height() > MAX_ICO_SIZE {
                    img.resize(MAX_ICO_SIZE, MAX_ICO_SIZE, FilterType::Lanczos3)
                } else {
                    img
                };
                let out = self.output_dir()?.join("icon.ico");
                img.save_with_format(&out, ImageFormat::Ico)
                    .with_context(|| format!("writing {}", out.display()))?;
                Ok(Some(out))
            }
            TargetPlatform::Darwin | TargetPlatform::Mas if tray => {
                let source_tray = icon.with_file_name("tray-icon.png");
                if source_tray.is_file() {
                    return Ok(None);
                }
                let tray_img =
                    load(icon)?.resize(TRAY_ICON_SIZE, TRAY_ICON_SIZE, FilterType::Lanczos3);
                let dir = self.output_dir()?;
                let copied = dir.join(icon.file_name().context("icon path has no file name")?);
                std::fs::copy(icon, &copied)
                    .with_context(|| format!("copying {}", icon.display()))?;
                tray_img
                    .save_with_format(dir.join("tray-icon.png"), ImageFormat::Png)
                    .context("writing tray icon")?;
                Ok(Some(copied))
            }
            _ => Ok(None),
        }
    }
}

impl IconConverter for ImageIconConverter {
    fn convert(&self, config: ResolvedConfig, log: &Logger) -> ResolvedConfig {
        let Some(icon) = config.engine.icon.clone() else {
            return config;
        };

        match self.convert_icon(
            &icon,
            config.engine.platform,
            config.features.tray.is_enabled(),
        ) {
            Ok(Some(converted)) => {
                log.debug(format!(
                    "Converted icon {} -> {}",
                    icon.display(),
                    converted.display()
                ));
                let mut engine = config.engine;
                engine.icon = Some(converted);
                ResolvedConfig { engine, ..config }
            }
            Ok(None) => config,
            Err(e) => {
                log.warn(format!(
                    "Could not convert icon {} for {}: {:#}. Using it as is.",
                    icon.display(),
                    config.engine.platform,
                    e
                ));
                config
            }
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn load(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("decoding {}", path.display()))
}
