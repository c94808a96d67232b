//! Staging: assembling app sources and the saved configuration in a
//! temporary directory before packaging.

use crate::error::{FsContext, Result};
use crate::options::{Arch, FeatureConfig, ResolvedConfig, TargetPlatform};
use crate::utils::fs::{self as fs_utils, CopyOptions};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the configuration saved inside every built app.
pub const SAVED_CONFIG_FILE: &str = "webapp.json";

/// App directory inside a Linux or Windows bundle.
pub const BUNDLE_APP_DIR: &str = "resources/app";

/// App directory inside a macOS `.app` bundle.
pub const MACOS_APP_DIR: &str = "Contents/Resources/app";

/// Configuration persisted inside a built app and read back on upgrade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAppConfig {
    /// Runtime behaviour of the app
    #[serde(flatten)]
    pub features: FeatureConfig,
    /// Platform the app was built for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<TargetPlatform>,
    /// Architecture the app was built for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,
    /// App version at build time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// When the app was built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_at: Option<DateTime<Utc>>,
}

impl SavedAppConfig {
    /// Snapshot of `config` as it will be written into the bundle.
    pub fn from_resolved(config: &ResolvedConfig) -> Self {
        Self {
            features: config.features.clone(),
            platform: Some(config.engine.platform),
            arch: Some(config.engine.arch),
            app_version: config.engine.app_version.clone(),
            built_at: Some(Utc::now()),
        }
    }

    /// Reads the saved configuration from an app directory.
    pub async fn load(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join(SAVED_CONFIG_FILE);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .fs_context("reading saved app config", &path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the configuration into `app_dir`, returning the file path.
    pub async fn save(&self, app_dir: &Path) -> Result<PathBuf> {
        let path = app_dir.join(SAVED_CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, json)
            .await
            .fs_context("writing saved app config", &path)?;
        Ok(path)
    }
}

/// Copies app sources plus the resolved configuration into a staging directory.
#[async_trait]
pub trait AppStager: Send + Sync {
    /// Stages `src` (when given) and `config` into `dest`.
    async fn stage(&self, src: Option<&Path>, dest: &Path, config: &ResolvedConfig) -> Result<()>;
}

/// Default stager: copies an app template directory and writes
/// [`SAVED_CONFIG_FILE`] next to it.
///
/// Without a template, a minimal `package.json` is generated so the runtime
/// shell has an entry point manifest to read.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateStager;

#[async_trait]
impl AppStager for TemplateStager {
    async fn stage(&self, src: Option<&Path>, dest: &Path, config: &ResolvedConfig) -> Result<()> {
        fs_utils::create_dir_all(dest, false)
            .await
            .fs_context("creating staging directory", dest)?;

        if let Some(src) = src {
            fs_utils::copy_dir(
                src,
                dest,
                CopyOptions {
                    overwrite: true,
                    preserve_timestamps: true,
                },
            )
            .await
            .fs_context("copying app template", src)?;
        }

        let manifest = dest.join("package.json");
        if !manifest.exists() {
            let package = serde_json::json!({
                "name": package_name(&config.features.name),
                "productName": config.features.name,
                "version": config.engine.app_version.as_deref().unwrap_or("1.0.0"),
                "private": true,
            });
            tokio::fs::write(&manifest, serde_json::to_string_pretty(&package)?)
                .await
                .fs_context("writing package manifest", &manifest)?;
        }

        SavedAppConfig::from_resolved(config).save(dest).await?;
        Ok(())
    }
}

/// Lowercase, dash-separated package name.
fn package_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
