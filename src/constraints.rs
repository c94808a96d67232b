//! Dropping options the host cannot honor.
//!
//! Editing Windows executable resources (icon, version info) needs Windows
//! or Wine. Rather than failing deep inside the packaging engine, those
//! options are removed up front with a warning.

use crate::host::{HostEnvironment, HostOs};
use crate::logger::Logger;
use crate::options::{EngineConfig, ResolvedConfig, TargetPlatform};

/// Result of [`filter_unprocessable_options`].
#[derive(Clone, Debug, PartialEq)]
pub struct Filtered {
    /// Configuration with unprocessable options cleared
    pub config: ResolvedConfig,
    /// Names of the options that were cleared, in a fixed order
    pub dropped: Vec<&'static str>,
    /// The single warning emitted, when anything was dropped
    pub warning: Option<String>,
}

/// Clears Windows-only resource options when building a Windows app on a
/// non-Windows host without Wine.
pub fn filter_unprocessable_options(
    config: ResolvedConfig,
    host: &HostEnvironment,
    log: &Logger,
) -> Filtered {
    let needs_wine = config.engine.platform == TargetPlatform::Windows
        && host.os != HostOs::Windows
        && !host.has_wine;
    if !needs_wine {
        return Filtered {
            config,
            dropped: Vec::new(),
            warning: None,
        };
    }

    let ResolvedConfig {
        engine,
        features,
    } = config;
    let mut dropped = Vec::new();

    let engine = EngineConfig {
        icon: take("icon", engine.icon, &mut dropped),
        app_copyright: take("appCopyright", engine.app_copyright, &mut dropped),
        app_version: take("appVersion", engine.app_version, &mut dropped),
        build_version: take("buildVersion", engine.build_version, &mut dropped),
        version_string: take("versionString", engine.version_string, &mut dropped),
        win32_metadata: take("win32metadata", engine.win32_metadata, &mut dropped),
        ..engine
    };

    let warning = (!dropped.is_empty()).then(|| {
        format!(
            "Some options ({}) cannot be applied when building a Windows app on {} without Wine \
             and were ignored. Install Wine (https://www.winehq.org) to use them.",
            dropped.join(", "),
            host.os.name()
        )
    });
    if let Some(warning) = &warning {
        log.warn(warning);
    }

    Filtered {
        config: ResolvedConfig { engine, features },
        dropped,
        warning,
    }
}

fn take<T>(name: &'static str, value: Option<T>, dropped: &mut Vec<&'static str>) -> Option<T> {
    if value.is_some() {
        dropped.push(name);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DefaultOptionsResolver, OptionsResolver, RawRequest};
    use std::path::PathBuf;

    fn host(os: HostOs, has_wine: bool) -> HostEnvironment {
        HostEnvironment {
            os,
            elevated: false,
            has_wine,
            cwd: PathBuf::from("/work"),
            temp_root: PathBuf::from("/tmp"),
            system_install_root: PathBuf::from("/opt"),
            user_applications_dir: None,
            invoking_user: None,
        }
    }

    fn windows_config() -> ResolvedConfig {
        let mut config = DefaultOptionsResolver
            .resolve(RawRequest {
                target_url: Some("https://example.com".into()),
                platform: Some(TargetPlatform::Windows),
                out: Some(PathBuf::from("/tmp/out")),
                ..Default::default()
            })
            .unwrap();
        config.engine.icon = Some(PathBuf::from("/x/icon.png"));
        config
    }

    #[test]
    fn test_icon_dropped_without_wine() {
        let filtered =
            filter_unprocessable_options(windows_config(), &host(HostOs::Linux, false), &Logger::new(true));

        assert_eq!(filtered.config.engine.icon, None);
        assert_eq!(filtered.dropped, vec!["icon"]);
        let warning = filtered.warning.expect("warning");
        assert!(warning.contains("icon"));
        assert!(warning.contains("Wine"));
    }

    #[test]
    fn test_config_untouched_with_wine_or_on_windows() {
        for host in [host(HostOs::Linux, true), host(HostOs::Windows, false)] {
            let config = windows_config();
            let filtered =
                filter_unprocessable_options(config.clone(), &host, &Logger::new(true));
            assert_eq!(filtered.config, config);
            assert!(filtered.dropped.is_empty());
            assert!(filtered.warning.is_none());
        }
    }

    #[test]
    fn test_names_every_dropped_field_once() {
        let mut config = windows_config();
        config.engine.app_version = Some("1.0.0".into());
        config.engine.win32_metadata = Some(Default::default());

        let filtered =
            filter_unprocessable_options(config, &host(HostOs::MacOs, false), &Logger::new(true));
        assert_eq!(filtered.dropped, vec!["icon", "appVersion", "win32metadata"]);
        assert_eq!(filtered.config.engine.app_version, None);
    }

    #[test]
    fn test_nothing_set_means_no_warning() {
        let mut config = windows_config();
        config.engine.icon = None;
        let filtered =
            filter_unprocessable_options(config, &host(HostOs::Linux, false), &Logger::new(true));
        assert!(filtered.warning.is_none());
    }
}
