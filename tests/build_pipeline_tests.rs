#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use kodegen_bundler_webapp::bundler::{self, PackagingEngine};
    use kodegen_bundler_webapp::host::HostOs;
    use kodegen_bundler_webapp::options::{EngineConfig, TargetPlatform};
    use kodegen_bundler_webapp::stage::SavedAppConfig;
    use kodegen_bundler_webapp::{AppBuilder, BuildError, HostEnvironment, RawRequest};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn host(root: &Path) -> HostEnvironment {
        std::fs::create_dir_all(root.join("tmp")).unwrap();
        HostEnvironment {
            os: HostOs::Linux,
            elevated: true,
            has_wine: false,
            cwd: root.to_path_buf(),
            temp_root: root.join("tmp"),
            system_install_root: root.join("opt"),
            user_applications_dir: Some(root.join("applications")),
            invoking_user: None,
        }
    }

    fn linux_request(name: &str, out: &Path) -> RawRequest {
        RawRequest {
            target_url: Some("https://example.com".into()),
            name: Some(name.into()),
            platform: Some(TargetPlatform::Linux),
            out: Some(out.to_path_buf()),
            quiet: true,
            ..Default::default()
        }
    }

    /// Records the engine config it was called with and returns fixed paths.
    #[derive(Clone, Default)]
    struct RecordingEngine {
        seen: Arc<Mutex<Option<EngineConfig>>>,
        outputs: Vec<&'static str>,
    }

    #[async_trait]
    impl PackagingEngine for RecordingEngine {
        async fn pack(&self, config: &EngineConfig) -> bundler::Result<Vec<PathBuf>> {
            *self.seen.lock().unwrap() = Some(config.clone());
            let mut paths = Vec::new();
            for output in &self.outputs {
                let path = config.out.join(output);
                std::fs::create_dir_all(&path)?;
                paths.push(path);
            }
            Ok(paths)
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl PackagingEngine for FailingEngine {
        async fn pack(&self, _config: &EngineConfig) -> bundler::Result<Vec<PathBuf>> {
            Err(bundler::Error::GenericError("runtime download failed".into()))
        }
    }

    #[tokio::test]
    async fn test_fresh_linux_build_writes_desktop_entry_beside_app() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");

        let result = AppBuilder::new(host(temp.path()))
            .build(linux_request("Foo", &out))
            .await
            .expect("build succeeds");

        assert_eq!(result.path.parent(), Some(out.as_path()));
        assert!(
            result
                .path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("Foo-linux-")
        );
        assert!(result.path.join("resources/app/webapp.json").is_file());

        let entry = out.join("Foo.desktop");
        assert!(entry.is_file());
        assert_eq!(result.desktop_entry, Some(entry.clone()));
        let contents = std::fs::read_to_string(&entry).unwrap();
        assert!(contents.contains("Name=Foo\n"));
        assert!(contents.contains("StartupWMClass=Foo\n"));

        assert_eq!(result.system_install, Some(temp.path().join("opt/Foo")));
        assert!(temp.path().join("applications/Foo.desktop").is_file());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[tokio::test]
    async fn test_overwrite_upgrade_lands_on_prior_install() {
        let temp = TempDir::new().unwrap();
        let prior_root = temp.path().join("installed/OldApp");
        let prior_app = prior_root.join("resources/app");
        std::fs::create_dir_all(&prior_app).unwrap();
        std::fs::write(
            prior_app.join("webapp.json"),
            r#"{"name":"OldApp","targetUrl":"https://old.example/","tray":"false","platform":"linux","arch":"x64","width":900}"#,
        )
        .unwrap();
        std::fs::write(prior_app.join("stale.txt"), "kept").unwrap();

        let result = AppBuilder::new(host(temp.path()))
            .build(RawRequest {
                upgrade: Some(prior_root.display().to_string()),
                overwrite: true,
                quiet: true,
                ..Default::default()
            })
            .await
            .expect("upgrade succeeds");

        assert_eq!(result.path, prior_root);

        let saved = SavedAppConfig::load(&prior_app).await.unwrap();
        assert_eq!(saved.features.name, "OldApp");
        assert_eq!(saved.features.target_url, "https://old.example/");
        assert_eq!(saved.features.width, Some(900));
        assert!(saved.built_at.is_some());
        assert!(prior_app.join("stale.txt").is_file());

        assert!(temp.path().join("installed/OldApp.desktop").is_file());

        let leftovers: Vec<_> = std::fs::read_dir(temp.path().join("tmp"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("webapp-upgrade"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_upgrade_of_system_install_keeps_it_in_place() {
        let temp = TempDir::new().unwrap();
        let prior_root = temp.path().join("opt/OldApp");
        let prior_app = prior_root.join("resources/app");
        std::fs::create_dir_all(&prior_app).unwrap();
        std::fs::write(
            prior_app.join("webapp.json"),
            r#"{"name":"OldApp","targetUrl":"https://old.example/","platform":"linux","arch":"x64"}"#,
        )
        .unwrap();
        let frameworks = prior_root.join("Contents/Frameworks");
        std::fs::create_dir_all(&frameworks).unwrap();
        std::fs::write(frameworks.join("shared.so"), "lib").unwrap();

        let result = AppBuilder::new(host(temp.path()))
            .build(RawRequest {
                upgrade: Some(prior_root.display().to_string()),
                overwrite: true,
                quiet: true,
                ..Default::default()
            })
            .await
            .expect("upgrade succeeds");

        assert_eq!(result.path, prior_root);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert!(prior_app.join("webapp.json").is_file());
        assert!(frameworks.join("shared.so").is_file());

        assert_eq!(result.system_install, Some(prior_root.clone()));
        assert_eq!(result.desktop_entry, Some(temp.path().join("opt/OldApp.desktop")));
        assert!(temp.path().join("applications/OldApp.desktop").is_file());
    }

    #[tokio::test]
    async fn test_existing_output_without_overwrite_is_directory_exists() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let builder = AppBuilder::new(host(temp.path()));

        builder.build(linux_request("Foo", &out)).await.unwrap();
        let err = builder.build(linux_request("Foo", &out)).await.unwrap_err();

        assert!(matches!(err, BuildError::DirectoryExists { out: ref dir } if *dir == out));

        let overwrite = RawRequest {
            overwrite: true,
            ..linux_request("Foo", &out)
        };
        assert!(builder.build(overwrite).await.is_ok());
    }

    #[tokio::test]
    async fn test_multiple_engine_outputs_keep_first_with_warning() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let engine = RecordingEngine {
            outputs: vec!["Foo-win32-x64", "Foo-win32-ia32"],
            ..Default::default()
        };

        let result = AppBuilder::new(host(temp.path()))
            .with_engine(engine)
            .build(RawRequest {
                platform: Some(TargetPlatform::Windows),
                ..linux_request("Foo", &out)
            })
            .await
            .unwrap();

        assert_eq!(result.path, out.join("Foo-win32-x64"));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("2 apps"));
        assert_eq!(result.desktop_entry, None);
    }

    #[tokio::test]
    async fn test_engine_sees_staged_dir_and_filtered_options() {
        let temp = TempDir::new().unwrap();
        let icon = temp.path().join("icon.png");
        image::RgbaImage::from_pixel(64, 64, image::Rgba([0, 128, 255, 255]))
            .save(&icon)
            .unwrap();
        let engine = RecordingEngine {
            outputs: vec!["Foo-win32-x64"],
            ..Default::default()
        };
        let seen = engine.seen.clone();

        let result = AppBuilder::new(host(temp.path()))
            .with_engine(engine)
            .build(RawRequest {
                platform: Some(TargetPlatform::Windows),
                icon: Some(icon),
                app_version: Some("2.0.0".into()),
                ..linux_request("Foo", &temp.path().join("out"))
            })
            .await
            .unwrap();

        let config = seen.lock().unwrap().clone().expect("engine was called");
        assert!(config.dir.join("webapp.json").is_file());
        assert!(config.dir.join("icon.ico").is_file());
        assert!(config.quiet);
        assert_eq!(config.icon, None);
        assert_eq!(config.app_version, None);

        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("icon"));
        assert!(result.warnings[0].contains("appVersion"));
    }

    #[tokio::test]
    async fn test_engine_errors_propagate_unmodified() {
        let temp = TempDir::new().unwrap();

        let err = AppBuilder::new(host(temp.path()))
            .with_engine(FailingEngine)
            .build(linux_request("Foo", &temp.path().join("out")))
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::Engine(_)));
        assert_eq!(err.to_string(), "runtime download failed");
    }

    #[tokio::test]
    async fn test_default_out_is_under_cwd() {
        let temp = TempDir::new().unwrap();
        let engine = RecordingEngine {
            outputs: vec!["Foo-win32-x64"],
            ..Default::default()
        };
        let seen = engine.seen.clone();

        AppBuilder::new(host(temp.path()))
            .with_engine(engine)
            .build(RawRequest {
                target_url: Some("example.com".into()),
                name: Some("Foo".into()),
                platform: Some(TargetPlatform::Windows),
                quiet: true,
                ..Default::default()
            })
            .await
            .unwrap();

        let config = seen.lock().unwrap().clone().unwrap();
        assert_eq!(config.out, temp.path().join("output-apps"));
    }
}
