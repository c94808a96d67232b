//! Command line argument parsing.
//!
//! Flags map one-to-one onto [`RawRequest`] fields. An optional TOML file
//! (`--config`) supplies defaults for anything not given on the command line.

use crate::error::{CliError, Result};
use crate::options::{Arch, RawRequest, TargetPlatform, TrayMode};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Wrap any web site in a desktop app
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_webapp",
    version,
    about = "Wrap any web site in a desktop app",
    long_about = "Build a desktop app for Linux, Windows or macOS around a web site.

Usage:
  kodegen_bundler_webapp https://example.com
  kodegen_bundler_webapp example.com --name Example --platform windows --out dist
  kodegen_bundler_webapp --upgrade ./output-apps/Example-linux-x64 --overwrite"
)]
pub struct Args {
    /// URL of the site to wrap (optional when upgrading)
    #[arg(index = 1, value_name = "TARGET_URL")]
    pub target_url: Option<String>,

    /// App name (defaults to the site's host name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Target platform: linux, windows, mac, mas
    #[arg(short, long)]
    pub platform: Option<TargetPlatform>,

    /// Target architecture: x64, ia32, arm64, armv7l, universal
    #[arg(short, long)]
    pub arch: Option<Arch>,

    /// Output directory (default: ./output-apps)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Replace an existing app in the output directory
    #[arg(long)]
    pub overwrite: bool,

    /// Upgrade a previously built app, reusing its settings
    #[arg(short, long, value_name = "PATH")]
    pub upgrade: Option<String>,

    /// App icon (.png, .ico or .icns)
    #[arg(short, long, value_name = "FILE")]
    pub icon: Option<PathBuf>,

    /// Tray icon: true, false or start-in-tray
    #[arg(long, value_name = "MODE")]
    pub tray: Option<TrayMode>,

    /// Copyright string (Windows)
    #[arg(long)]
    pub app_copyright: Option<String>,

    /// App version
    #[arg(long)]
    pub app_version: Option<String>,

    /// Build version (Windows)
    #[arg(long)]
    pub build_version: Option<String>,

    /// Version string table as JSON (Windows)
    #[arg(long, value_name = "JSON", value_parser = parse_string_map)]
    pub version_string: Option<BTreeMap<String, String>>,

    /// Win32 metadata as JSON (Windows)
    #[arg(long = "win32metadata", value_name = "JSON", value_parser = parse_string_map)]
    pub win32_metadata: Option<BTreeMap<String, String>>,

    /// App template directory copied into the app
    #[arg(long, value_name = "DIR")]
    pub template: Option<PathBuf>,

    /// Prebuilt runtime shell directory
    #[arg(long, value_name = "DIR")]
    pub runtime: Option<PathBuf>,

    /// Initial window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    pub height: Option<u32>,

    /// Custom user agent
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Allow only one running instance
    #[arg(long)]
    pub single_instance: bool,

    /// Regex of URLs that open inside the app instead of the browser
    #[arg(long, value_name = "REGEX")]
    pub internal_urls: Option<String>,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Show packaging engine output
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML file with default options
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the request, layering command line values over `--config`.
    pub async fn into_request(self) -> Result<RawRequest> {
        let defaults = match &self.config {
            Some(path) => load_defaults(path).await?,
            None => RawRequest::default(),
        };

        let explicit = RawRequest {
            target_url: self.target_url,
            name: self.name,
            platform: self.platform,
            arch: self.arch,
            out: self.out,
            overwrite: self.overwrite,
            upgrade: self.upgrade,
            icon: self.icon,
            tray: self.tray,
            app_copyright: self.app_copyright,
            app_version: self.app_version,
            build_version: self.build_version,
            version_string: self.version_string,
            win32_metadata: self.win32_metadata,
            template: self.template,
            runtime: self.runtime,
            width: self.width,
            height: self.height,
            user_agent: self.user_agent,
            single_instance: self.single_instance.then_some(true),
            internal_urls: self.internal_urls,
            quiet: self.quiet,
            verbose: self.verbose,
            ..Default::default()
        };

        Ok(explicit.or(defaults))
    }
}

async fn load_defaults(path: &Path) -> Result<RawRequest> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let defaults = toml::from_str(&contents).map_err(|e| CliError::ConfigFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(defaults)
}

fn parse_string_map(value: &str) -> std::result::Result<BTreeMap<String, String>, String> {
    serde_json::from_str(value).map_err(|e| format!("expected a JSON object of strings: {e}"))
}
