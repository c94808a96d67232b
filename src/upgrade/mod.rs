//! Upgrade-in-place: finding a previous build and reusing its configuration.
//!
//! An upgrade request names a previously built app. Its saved
//! [`SavedAppConfig`] supplies defaults for everything the new request leaves
//! unset; explicit values always win.

use crate::logger::Logger;
use crate::options::RawRequest;
use crate::stage::{BUNDLE_APP_DIR, MACOS_APP_DIR, SavedAppConfig};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A previously built app found on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorInstall {
    /// Bundle root: the directory bundle, or the `.app` itself on macOS
    pub root: PathBuf,
    /// Configuration saved at build time
    pub saved: SavedAppConfig,
    /// Icon shipped inside the previous build, if any
    pub icon: Option<PathBuf>,
}

/// Locates previous builds.
#[async_trait]
pub trait UpgradeDetector: Send + Sync {
    /// Returns the app found at `path`, or `None` when there is none.
    async fn find(&self, path: &Path, log: &Logger) -> Option<PriorInstall>;
}

/// Turns a non-empty `upgrade` string into `upgrade_from` and sets
/// `is_upgrade`.
///
/// Returns the new request and whether it is an upgrade. An absent or blank
/// `upgrade` field leaves the request untouched.
pub fn normalize_upgrade(raw: RawRequest) -> (RawRequest, bool) {
    let from = raw
        .upgrade
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    match from {
        Some(from) => (
            RawRequest {
                upgrade_from: Some(from),
                is_upgrade: true,
                ..raw
            },
            true,
        ),
        None => (raw, false),
    }
}

/// Fills fields missing from `raw` with the values saved in `prior`.
pub fn merge_defaults(raw: RawRequest, prior: &PriorInstall) -> RawRequest {
    let saved = &prior.saved;
    let features = &saved.features;

    raw.or(RawRequest {
        target_url: Some(features.target_url.clone()),
        name: Some(features.name.clone()),
        platform: saved.platform,
        arch: saved.arch,
        icon: prior.icon.clone(),
        tray: Some(features.tray),
        app_version: saved.app_version.clone(),
        width: features.width,
        height: features.height,
        user_agent: features.user_agent.clone(),
        single_instance: Some(features.single_instance),
        internal_urls: features.internal_urls.clone(),
        ..Default::default()
    })
}

/// Detector that reads `webapp.json` from built apps on the local disk.
///
/// Accepts the bundle directory, a macOS `.app`, a directory containing a
/// `.app`, or the app executable itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsUpgradeDetector;

impl FsUpgradeDetector {
    async fn probe(&self, root: &Path, log: &Logger) -> Option<PriorInstall> {
        let app_dir = [BUNDLE_APP_DIR, MACOS_APP_DIR]
            .iter()
            .map(|rel| root.join(rel))
            .find(|dir| dir.is_dir())?;

        match SavedAppConfig::load(&app_dir).await {
            Ok(saved) => Some(PriorInstall {
                root: root.to_path_buf(),
                saved,
                icon: bundled_icon(&app_dir),
            }),
            Err(e) => {
                log.debug(format!("No usable saved config in {}: {}", app_dir.display(), e));
                None
            }
        }
    }
}

#[async_trait]
impl UpgradeDetector for FsUpgradeDetector {
    async fn find(&self, path: &Path, log: &Logger) -> Option<PriorInstall> {
        let root = if path.is_file() {
            path.parent()?.to_path_buf()
        } else {
            path.to_path_buf()
        };
        log.debug(format!("Looking for a previous build in {}", root.display()));

        if let Some(prior) = self.probe(&root, log).await {
            return Some(prior);
        }

        // A directory holding a single macOS bundle, as produced by the packager.
        let mut entries = tokio::fs::read_dir(&root).await.ok()?;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let candidate = entry.path();
            if candidate.extension().is_some_and(|ext| ext == "app")
                && let Some(prior) = self.probe(&candidate, log).await
            {
                return Some(prior);
            }
        }

        None
    }
}

fn bundled_icon(app_dir: &Path) -> Option<PathBuf> {
    ["icon.png", "icon.ico"]
        .iter()
        .map(|name| app_dir.join(name))
        .find(|path| path.is_file())
}
