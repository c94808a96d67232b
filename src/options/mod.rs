//! Build request and resolved configuration types.
//!
//! A build starts from a [`RawRequest`] (command line plus optional TOML
//! defaults). The [`OptionsResolver`] turns it into a [`ResolvedConfig`], a
//! new value split into what the packaging engine needs ([`EngineConfig`])
//! and what the generated app needs at runtime ([`FeatureConfig`]).

mod platform;
mod resolver;

pub use platform::{Arch, TargetPlatform, TrayMode};
pub use resolver::{DefaultOptionsResolver, OptionsResolver, normalize_url, sanitize_name};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// User-supplied build parameters.
///
/// Every field is optional so that a request can be layered: explicit
/// command-line values over a `--config` file, and both over the saved
/// configuration of a previous build when upgrading.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawRequest {
    /// URL of the site to wrap
    pub target_url: Option<String>,
    /// App name (inferred from the URL when absent)
    pub name: Option<String>,
    /// Target platform (defaults to the host)
    pub platform: Option<TargetPlatform>,
    /// Target architecture (defaults to the host)
    pub arch: Option<Arch>,
    /// Output directory (defaults to `<cwd>/output-apps`)
    pub out: Option<PathBuf>,
    /// Replace an existing bundle in the output directory
    pub overwrite: bool,
    /// Path of a previously built app to upgrade, as given by the user
    pub upgrade: Option<String>,
    /// Normalized upgrade source, set by upgrade normalization
    #[serde(skip)]
    pub upgrade_from: Option<PathBuf>,
    /// Set by upgrade normalization
    #[serde(skip)]
    pub is_upgrade: bool,
    /// App icon (.png, .ico or .icns)
    pub icon: Option<PathBuf>,
    /// Tray behaviour
    pub tray: Option<TrayMode>,
    /// Windows: copyright string
    pub app_copyright: Option<String>,
    /// App version (also Windows file version)
    pub app_version: Option<String>,
    /// Windows: build version
    pub build_version: Option<String>,
    /// Windows: version-string resource table
    pub version_string: Option<BTreeMap<String, String>>,
    /// Windows: Win32 metadata resource table
    pub win32_metadata: Option<BTreeMap<String, String>>,
    /// Directory of app template sources copied into the staging directory
    pub template: Option<PathBuf>,
    /// Directory holding the prebuilt runtime shell
    pub runtime: Option<PathBuf>,
    /// Initial window width
    pub width: Option<u32>,
    /// Initial window height
    pub height: Option<u32>,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Allow only one running instance
    pub single_instance: Option<bool>,
    /// Regex of URLs that stay inside the app window
    pub internal_urls: Option<String>,
    /// Suppress info/debug logging
    pub quiet: bool,
    /// Let the packaging engine print its own progress
    pub verbose: bool,
}

impl RawRequest {
    /// Fills every unset field of `self` from `fallback`.
    ///
    /// Flags are OR-ed: a flag set in either request stays set.
    pub fn or(self, fallback: RawRequest) -> RawRequest {
        RawRequest {
            target_url: self.target_url.or(fallback.target_url),
            name: self.name.or(fallback.name),
            platform: self.platform.or(fallback.platform),
            arch: self.arch.or(fallback.arch),
            out: self.out.or(fallback.out),
            overwrite: self.overwrite || fallback.overwrite,
            upgrade: self.upgrade.or(fallback.upgrade),
            upgrade_from: self.upgrade_from.or(fallback.upgrade_from),
            is_upgrade: self.is_upgrade || fallback.is_upgrade,
            icon: self.icon.or(fallback.icon),
            tray: self.tray.or(fallback.tray),
            app_copyright: self.app_copyright.or(fallback.app_copyright),
            app_version: self.app_version.or(fallback.app_version),
            build_version: self.build_version.or(fallback.build_version),
            version_string: self.version_string.or(fallback.version_string),
            win32_metadata: self.win32_metadata.or(fallback.win32_metadata),
            template: self.template.or(fallback.template),
            runtime: self.runtime.or(fallback.runtime),
            width: self.width.or(fallback.width),
            height: self.height.or(fallback.height),
            user_agent: self.user_agent.or(fallback.user_agent),
            single_instance: self.single_instance.or(fallback.single_instance),
            internal_urls: self.internal_urls.or(fallback.internal_urls),
            quiet: self.quiet || fallback.quiet,
            verbose: self.verbose || fallback.verbose,
        }
    }
}

/// Runtime behaviour of the generated app.
///
/// This is what gets persisted inside every bundle and read back on upgrade.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    /// App name
    pub name: String,
    /// Normalized URL the app opens
    pub target_url: String,
    /// Tray behaviour
    #[serde(default)]
    pub tray: TrayMode,
    /// Initial window width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Initial window height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Custom user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Allow only one running instance
    #[serde(default)]
    pub single_instance: bool,
    /// Regex of URLs that stay inside the app window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_urls: Option<String>,
    /// Build-time verbosity; not persisted
    #[serde(skip)]
    pub verbose: bool,
}

/// What the packaging engine needs to produce a bundle.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Staged app sources (reassigned to the staging directory before packing)
    pub dir: PathBuf,
    /// Directory the bundle is written into
    pub out: PathBuf,
    /// Bundle / executable name
    pub name: String,
    /// Target platform
    pub platform: TargetPlatform,
    /// Target architecture
    pub arch: Arch,
    /// App icon
    pub icon: Option<PathBuf>,
    /// Replace an existing bundle
    pub overwrite: bool,
    /// Suppress the engine's own progress output
    pub quiet: bool,
    /// Windows: copyright string
    pub app_copyright: Option<String>,
    /// App version
    pub app_version: Option<String>,
    /// Windows: build version
    pub build_version: Option<String>,
    /// Windows: version-string resource table
    pub version_string: Option<BTreeMap<String, String>>,
    /// Windows: Win32 metadata resource table
    pub win32_metadata: Option<BTreeMap<String, String>>,
    /// Prebuilt runtime shell copied into the bundle
    pub runtime_dir: Option<PathBuf>,
}

/// Fully resolved build configuration, owned by one build.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    /// Packaging engine configuration
    pub engine: EngineConfig,
    /// Generated app configuration
    pub features: FeatureConfig,
}
