//! macOS application bundle (.app) layout.

use super::{copy_staged_app, install_runtime};
use crate::bundler::{
    Context,
    error::{ErrorExt, Result},
};
use crate::options::EngineConfig;
use std::path::Path;
use tokio::fs as tokio_fs;

/// Lays out `<bundle_dir>/<name>.app`.
///
/// ```text
/// <name>.app/Contents/
///   Info.plist
///   MacOS/<name>          renamed runtime executable
///   Frameworks/           from the runtime shell (created empty otherwise)
///   Resources/app/        staged app
///   Resources/<name>.icns when the icon is an .icns file
/// ```
pub async fn layout_app_bundle(config: &EngineConfig, bundle_dir: &Path) -> Result<()> {
    let app_bundle_path = bundle_dir.join(format!("{}.app", config.name));
    let contents_dir = app_bundle_path.join("Contents");
    let macos_dir = contents_dir.join("MacOS");
    let resources_dir = contents_dir.join("Resources");
    let frameworks_dir = contents_dir.join("Frameworks");

    log::info!("Bundling {} at {}", config.name, app_bundle_path.display());

    for dir in [&macos_dir, &resources_dir, &frameworks_dir] {
        tokio_fs::create_dir_all(dir)
            .await
            .fs_context("failed to create bundle directory", dir)?;
    }

    // The runtime shell mirrors `Contents/`, with its executable under MacOS/.
    if let Some(runtime_dir) = &config.runtime_dir {
        let shell_macos = runtime_dir.join("MacOS");
        if shell_macos.is_dir() {
            install_runtime(config, &shell_macos, &macos_dir)
                .await
                .context("failed to install runtime executable")?;
        }
        for sub in ["Frameworks", "Resources"] {
            let from = runtime_dir.join(sub);
            if from.is_dir() {
                copy_staged_app(&from, &contents_dir.join(sub)).await?;
            }
        }
    }

    copy_staged_app(&config.dir, &resources_dir.join("app")).await?;

    let icon_file = match &config.icon {
        Some(icon) if icon.extension().is_some_and(|ext| ext == "icns") => {
            let file_name = format!("{}.icns", config.name);
            let dest = resources_dir.join(&file_name);
            tokio_fs::copy(icon, &dest)
                .await
                .fs_context("failed to copy app icon", icon)?;
            Some(file_name)
        }
        _ => None,
    };

    create_info_plist(&contents_dir, config, icon_file).await
}

/// Writes `Contents/Info.plist`.
async fn create_info_plist(
    contents_dir: &Path,
    config: &EngineConfig,
    icon_file: Option<String>,
) -> Result<()> {
    use plist::Value;

    let version = config.app_version.clone().unwrap_or_else(|| "1.0.0".into());
    let build_version = config
        .build_version
        .clone()
        .unwrap_or_else(|| version.clone());

    let mut dict = plist::Dictionary::new();
    dict.insert("CFBundleDevelopmentRegion".into(), "en".into());
    dict.insert("CFBundleDisplayName".into(), config.name.clone().into());
    dict.insert("CFBundleExecutable".into(), config.name.clone().into());
    dict.insert(
        "CFBundleIdentifier".into(),
        bundle_identifier(&config.name).into(),
    );
    dict.insert("CFBundleInfoDictionaryVersion".into(), "6.0".into());
    dict.insert("CFBundleName".into(), config.name.clone().into());
    dict.insert("CFBundlePackageType".into(), "APPL".into());
    dict.insert("CFBundleShortVersionString".into(), version.into());
    dict.insert("CFBundleVersion".into(), build_version.into());

    if let Some(icon_file) = icon_file {
        dict.insert("CFBundleIconFile".into(), icon_file.into());
    }
    if let Some(copyright) = &config.app_copyright {
        dict.insert("NSHumanReadableCopyright".into(), copyright.clone().into());
    }
    dict.insert("NSHighResolutionCapable".into(), true.into());

    let plist_path = contents_dir.join("Info.plist");
    Value::Dictionary(dict).to_file_xml(&plist_path)?;
    Ok(())
}

/// `com.webapp.<name>`, keeping only characters valid in a bundle identifier.
fn bundle_identifier(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' => Some(c.to_ascii_lowercase()),
            ' ' | '_' | '.' => Some('-'),
            _ => None,
        })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "com.webapp.app".to_string()
    } else {
        format!("com.webapp.{slug}")
    }
}
