//! Build orchestration.
//!
//! [`AppBuilder::build`] turns a [`RawRequest`] into a finished app bundle.
//! Each stage takes the value produced by the previous one and returns a new
//! value; nothing is shared between builds.
//!
//! # Stages
//!
//! 1. Apply the quiet flag to the build's [`Logger`]
//! 2. Default the output directory to `<cwd>/output-apps`
//! 3. Upgrade detection and merging of the previous build's configuration
//! 4. Option resolution
//! 5. Privilege check for macOS targets on other hosts
//! 6. Staging into a fresh temporary directory
//! 7. Icon conversion and copy
//! 8. Engine verbosity
//! 9. Dropping options the host cannot honor
//! 10. Packaging
//! 11. Result path normalization
//! 12. Relocation onto the upgraded install
//! 13. Linux desktop integration
//!
//! Stages 1-9 fail without leaving artifacts behind. Later stages may leave
//! partial output; temporary directories are kept for diagnosis.

use crate::bundler::{LocalPackager, PackagingEngine};
use crate::constraints::filter_unprocessable_options;
use crate::error::{BuildError, FsContext, Result};
use crate::finalize::{LinuxIntegrator, finalize_upgrade};
use crate::host::{HostEnvironment, HostOs};
use crate::icons::{IconConverter, ImageIconConverter, copy_icons};
use crate::logger::Logger;
use crate::options::{
    DefaultOptionsResolver, EngineConfig, OptionsResolver, RawRequest, ResolvedConfig,
    TargetPlatform,
};
use crate::outcome::Outcome;
use crate::stage::{AppStager, TemplateStager};
use crate::upgrade::{FsUpgradeDetector, UpgradeDetector, merge_defaults, normalize_upgrade};
use crate::utils::fs as fs_utils;
use std::path::{Path, PathBuf};

/// Default output directory name, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "output-apps";

/// What a successful build produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildResult {
    /// Final location of the app (bundle directory or upgraded install)
    pub path: PathBuf,
    /// Problems that degraded the build without failing it
    pub warnings: Vec<String>,
    /// Linux desktop entry written beside the app
    pub desktop_entry: Option<PathBuf>,
    /// Linux system-wide install directory
    pub system_install: Option<PathBuf>,
}

/// Runs builds against a fixed host and set of collaborators.
pub struct AppBuilder {
    host: HostEnvironment,
    log: Logger,
    resolver: Box<dyn OptionsResolver>,
    detector: Box<dyn UpgradeDetector>,
    stager: Box<dyn AppStager>,
    icon_converter: Box<dyn IconConverter>,
    engine: Box<dyn PackagingEngine>,
}

impl AppBuilder {
    /// Builder with the default collaborators for `host`.
    pub fn new(host: HostEnvironment) -> Self {
        Self {
            icon_converter: Box::new(ImageIconConverter::new(host.temp_root.clone())),
            detector: Box::new(FsUpgradeDetector),
            resolver: Box::new(DefaultOptionsResolver),
            stager: Box::new(TemplateStager),
            engine: Box::new(LocalPackager::new()),
            host,
            log: Logger::default(),
        }
    }

    /// Replace the base logger
    pub fn with_logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    /// Replace the options resolver
    pub fn with_resolver(mut self, resolver: impl OptionsResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replace the upgrade detector
    pub fn with_upgrade_detector(mut self, detector: impl UpgradeDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Replace the stager
    pub fn with_stager(mut self, stager: impl AppStager + 'static) -> Self {
        self.stager = Box::new(stager);
        self
    }

    /// Replace the icon converter
    pub fn with_icon_converter(mut self, converter: impl IconConverter + 'static) -> Self {
        self.icon_converter = Box::new(converter);
        self
    }

    /// Replace the packaging engine
    pub fn with_engine(mut self, engine: impl PackagingEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Host this builder targets
    pub fn host(&self) -> &HostEnvironment {
        &self.host
    }

    /// Builds the app described by `raw`.
    pub async fn build(&self, raw: RawRequest) -> Result<BuildResult> {
        let log = self.log.with_quiet(raw.quiet || self.log.is_quiet());
        let mut warnings = Vec::new();

        let explicit_out = raw.out.is_some();
        let raw = RawRequest {
            out: Some(
                raw.out
                    .clone()
                    .unwrap_or_else(|| self.host.cwd.join(DEFAULT_OUT_DIR)),
            ),
            ..raw
        };

        let (raw, upgrade_dest) = self.apply_upgrade(raw, explicit_out, &log).await?;

        let template = raw.template.clone();
        let config = self.resolver.resolve(raw)?;
        log.debug(format!(
            "Resolved {} for {} {}",
            config.features.name, config.engine.platform, config.engine.arch
        ));

        self.check_privileges(config.engine.platform)?;

        let staged = fs_utils::create_temp_dir(&self.host.temp_root, "webapp-staging")
            .await
            .fs_context("creating staging directory", &self.host.temp_root)?;
        log.debug(format!("Staging app in {}", staged.display()));
        self.stager
            .stage(template.as_deref(), &staged, &config)
            .await?;
        let config = with_engine(config, |engine| EngineConfig {
            dir: staged.clone(),
            ..engine
        });

        let config = self.icon_converter.convert(config, &log);
        copy_icons(&config, &staged, &log).await?;

        let verbose = config.features.verbose;
        let config = with_engine(config, |engine| EngineConfig {
            quiet: !verbose,
            ..engine
        });

        let filtered = filter_unprocessable_options(config, &self.host, &log);
        warnings.extend(filtered.warning);
        let config = filtered.config;

        log.info(format!(
            "Packaging {} ({} {})...",
            config.features.name, config.engine.platform, config.engine.arch
        ));
        let paths = self.engine.pack(&config.engine).await?;

        let normalized = normalize_app_paths(paths, &config.engine.out, &log)?;
        warnings.extend(normalized.warnings);
        let mut app_path = normalized.value;

        if let Some(dest) = upgrade_dest {
            let finalized =
                finalize_upgrade(&app_path, &dest, &config.engine.out, &config.engine, &log)
                    .await?;
            warnings.extend(finalized.warnings);
            app_path = finalized.value;
        }

        let mut result = BuildResult {
            path: app_path,
            ..Default::default()
        };

        if config.engine.platform == TargetPlatform::Linux {
            let integration = LinuxIntegrator::new(self.host.clone(), log)
                .integrate(&result.path, &config)
                .await;
            warnings.extend(integration.warnings);
            result.desktop_entry = integration.value.desktop_entry;
            result.system_install = integration.value.system_install;
        }

        result.warnings = warnings;
        log.info(format!("App built at {}", result.path.display()));
        Ok(result)
    }

    /// Stage 3. Returns the merged request and, for an overwrite-upgrade
    /// without an explicit output directory, the install to replace.
    async fn apply_upgrade(
        &self,
        raw: RawRequest,
        explicit_out: bool,
        log: &Logger,
    ) -> Result<(RawRequest, Option<PathBuf>)> {
        let (raw, is_upgrade) = normalize_upgrade(raw);
        let from = match (&raw.upgrade_from, is_upgrade) {
            (Some(from), true) => from.clone(),
            _ => return Ok((raw, None)),
        };

        let prior = self
            .detector
            .find(&from, log)
            .await
            .ok_or(BuildError::UpgradeNotFound { path: from })?;
        log.info(format!(
            "Upgrading {} found at {}",
            prior.saved.features.name,
            prior.root.display()
        ));

        let raw = merge_defaults(raw, &prior);
        if explicit_out || !raw.overwrite {
            return Ok((raw, None));
        }

        let working = fs_utils::create_temp_dir(&self.host.temp_root, "webapp-upgrade")
            .await
            .fs_context("creating upgrade working directory", &self.host.temp_root)?;
        log.debug(format!(
            "Building into {} before replacing {}",
            working.display(),
            prior.root.display()
        ));
        Ok((
            RawRequest {
                out: Some(working),
                ..raw
            },
            Some(prior.root),
        ))
    }

    /// Stage 5.
    fn check_privileges(&self, platform: TargetPlatform) -> Result<()> {
        if platform.is_macos_family() && self.host.os != HostOs::MacOs && !self.host.elevated {
            return Err(BuildError::InsufficientPrivileges {
                target: platform.to_string(),
                host: self.host.os.name().to_string(),
            });
        }
        Ok(())
    }
}

fn with_engine(
    config: ResolvedConfig,
    f: impl FnOnce(EngineConfig) -> EngineConfig,
) -> ResolvedConfig {
    ResolvedConfig {
        engine: f(config.engine),
        features: config.features,
    }
}

/// Reduces the engine's output paths to the single app path.
///
/// - no paths: the output already existed and overwriting was refused
/// - one path: that path
/// - several paths: the first, with the anomaly logged and recorded
pub fn normalize_app_paths(
    paths: Vec<PathBuf>,
    out: &Path,
    log: &Logger,
) -> Result<Outcome<PathBuf>> {
    let count = paths.len();
    let mut paths = paths.into_iter();
    let Some(first) = paths.next() else {
        return Err(BuildError::DirectoryExists {
            out: out.to_path_buf(),
        });
    };

    let mut outcome = Outcome::clean(first);
    if count > 1 {
        let warning = format!(
            "Packaging produced {} apps instead of one; using {}",
            count,
            outcome.value.display()
        );
        log.warn(&warning);
        outcome.warn(warning);
    }
    Ok(outcome)
}
