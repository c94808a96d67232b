//! Local directory packager.

use super::{PackagingEngine, Result, error::ErrorExt, platform};
use crate::bail;
use crate::options::{Arch, EngineConfig};
use crate::utils::fs as fs_utils;
use async_trait::async_trait;
use std::path::PathBuf;

/// Packaging engine that assembles bundles from a prebuilt runtime shell.
///
/// The runtime directory (`EngineConfig::runtime_dir`) holds a ready-to-run
/// shell whose executable is named [`RUNTIME_EXECUTABLE`](platform::RUNTIME_EXECUTABLE).
/// The packager copies it next to the staged app and renames the executable
/// after the app.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalPackager;

impl LocalPackager {
    /// Create a new packager
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PackagingEngine for LocalPackager {
    async fn pack(&self, config: &EngineConfig) -> Result<Vec<PathBuf>> {
        if config.arch == Arch::Universal && !config.platform.is_macos_family() {
            return Err(super::Error::UnsupportedTarget {
                platform: config.platform.to_string(),
                arch: config.arch.to_string(),
            });
        }
        if !config.dir.is_dir() {
            bail!(
                "staged app directory {} does not exist",
                config.dir.display()
            );
        }

        let bundle_dir = config.out.join(platform::bundle_dir_name(config));

        if bundle_dir.exists() {
            if !config.overwrite {
                log::info!(
                    "Skipping {} {}: {} already exists (pass overwrite to replace it)",
                    config.platform,
                    config.arch,
                    bundle_dir.display()
                );
                return Ok(Vec::new());
            }
            log::debug!("Overwriting existing bundle {}", bundle_dir.display());
            fs_utils::remove_dir_all(&bundle_dir)
                .await
                .fs_context("removing old bundle", &bundle_dir)?;
        }

        if !config.quiet {
            log::info!(
                "Packaging {} for {} {} into {}",
                config.name,
                config.platform,
                config.arch,
                bundle_dir.display()
            );
        }

        fs_utils::create_dir_all(&bundle_dir, false)
            .await
            .fs_context("creating bundle directory", &bundle_dir)?;

        if config.runtime_dir.is_none() {
            log::warn!(
                "No runtime shell configured; {} will contain app resources only",
                bundle_dir.display()
            );
        }

        if config.platform.is_macos_family() {
            platform::macos::layout_app_bundle(config, &bundle_dir).await?;
        } else {
            platform::layout_directory_bundle(config, &bundle_dir).await?;
        }

        log::info!("✓ Created bundle: {}", bundle_dir.display());
        Ok(vec![bundle_dir])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TargetPlatform;
    use std::path::Path;
    use tempfile::TempDir;

    fn engine_config(root: &Path, platform: TargetPlatform) -> EngineConfig {
        let staged = root.join("staged");
        std::fs::create_dir_all(&staged).unwrap();
        std::fs::write(staged.join("webapp.json"), "{}").unwrap();

        EngineConfig {
            dir: staged,
            out: root.join("out"),
            name: "Foo".into(),
            platform,
            arch: Arch::X64,
            icon: None,
            overwrite: false,
            quiet: true,
            app_copyright: None,
            app_version: None,
            build_version: None,
            version_string: None,
            win32_metadata: None,
            runtime_dir: None,
        }
    }

    #[tokio::test]
    async fn test_linux_layout_places_app_under_resources() {
        let temp = TempDir::new().unwrap();
        let config = engine_config(temp.path(), TargetPlatform::Linux);

        let paths = LocalPackager.pack(&config).await.unwrap();
        assert_eq!(paths, vec![temp.path().join("out/Foo-linux-x64")]);
        assert!(paths[0].join("resources/app/webapp.json").is_file());
    }

    #[tokio::test]
    async fn test_existing_bundle_without_overwrite_yields_no_paths() {
        let temp = TempDir::new().unwrap();
        let config = engine_config(temp.path(), TargetPlatform::Linux);
        std::fs::create_dir_all(temp.path().join("out/Foo-linux-x64")).unwrap();

        let paths = LocalPackager.pack(&config).await.unwrap();
        assert!(paths.is_empty());

        let overwrite = EngineConfig {
            overwrite: true,
            ..config
        };
        let paths = LocalPackager.pack(&overwrite).await.unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[tokio::test]
    async fn test_runtime_executable_is_renamed_after_app() {
        let temp = TempDir::new().unwrap();
        let runtime = temp.path().join("runtime");
        std::fs::create_dir_all(runtime.join("locales")).unwrap();
        std::fs::write(runtime.join(platform::RUNTIME_EXECUTABLE), "#!/bin/sh\n").unwrap();
        std::fs::write(runtime.join("locales/en.pak"), "").unwrap();

        let config = EngineConfig {
            runtime_dir: Some(runtime),
            ..engine_config(temp.path(), TargetPlatform::Linux)
        };
        let paths = LocalPackager.pack(&config).await.unwrap();
        let bundle = &paths[0];

        assert!(bundle.join("Foo").is_file());
        assert!(!bundle.join(platform::RUNTIME_EXECUTABLE).exists());
        assert!(bundle.join("locales/en.pak").is_file());
    }

    #[tokio::test]
    async fn test_macos_layout_writes_info_plist() {
        let temp = TempDir::new().unwrap();
        let config = EngineConfig {
            app_version: Some("2.1.0".into()),
            app_copyright: Some("Foo & Sons <2024>".into()),
            ..engine_config(temp.path(), TargetPlatform::Darwin)
        };

        let paths = LocalPackager.pack(&config).await.unwrap();
        let contents = paths[0].join("Foo.app/Contents");
        assert!(contents.join("Resources/app/webapp.json").is_file());

        let plist = plist::Value::from_file(contents.join("Info.plist")).unwrap();
        let dict = plist.as_dictionary().unwrap();
        let string = |key: &str| dict.get(key).and_then(plist::Value::as_string);
        assert_eq!(string("CFBundleExecutable"), Some("Foo"));
        assert_eq!(string("CFBundleIdentifier"), Some("com.webapp.foo"));
        assert_eq!(string("CFBundleShortVersionString"), Some("2.1.0"));
        assert_eq!(string("NSHumanReadableCopyright"), Some("Foo & Sons <2024>"));
    }

    #[tokio::test]
    async fn test_universal_arch_rejected_outside_macos() {
        let temp = TempDir::new().unwrap();
        let config = EngineConfig {
            arch: Arch::Universal,
            ..engine_config(temp.path(), TargetPlatform::Windows)
        };
        let err = LocalPackager.pack(&config).await.unwrap_err();
        assert!(matches!(err, crate::bundler::Error::UnsupportedTarget { .. }));
    }
}
