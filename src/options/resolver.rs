//! Validation and normalization of build requests.

use super::{Arch, EngineConfig, FeatureConfig, RawRequest, ResolvedConfig, TargetPlatform};
use crate::error::ValidationError;
use path_absolutize::Absolutize;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters that cannot appear in a bundle or executable name on any target.
static RESERVED_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("reserved character pattern is valid")
});

/// Turns a raw build request into a resolved configuration.
pub trait OptionsResolver: Send + Sync {
    /// Validates `raw` and produces a new [`ResolvedConfig`].
    fn resolve(&self, raw: RawRequest) -> Result<ResolvedConfig, ValidationError>;
}

/// Resolver used by the command line tool.
///
/// - Adds `https://` to scheme-less URLs
/// - Infers the app name from the URL host when none is given
/// - Defaults platform and architecture to the host
/// - Checks that icon, template and runtime paths exist
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultOptionsResolver;

impl OptionsResolver for DefaultOptionsResolver {
    fn resolve(&self, raw: RawRequest) -> Result<ResolvedConfig, ValidationError> {
        let raw_url = raw
            .target_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ValidationError::MissingTargetUrl)?;
        let target_url = normalize_url(raw_url)?;

        let name = match raw.name.as_deref() {
            Some(name) => sanitize_name(name)?,
            None => sanitize_name(&infer_name(&target_url))?,
        };

        let icon = raw
            .icon
            .as_deref()
            .map(|path| existing_path(path, |path| ValidationError::IconNotFound { path }))
            .transpose()?;
        let runtime_dir = raw
            .runtime
            .as_deref()
            .map(|path| existing_path(path, |path| ValidationError::RuntimeNotFound { path }))
            .transpose()?;
        if let Some(template) = raw.template.as_deref() {
            existing_path(template, |path| ValidationError::TemplateNotFound { path })?;
        }

        for (dimension, value) in [("width", raw.width), ("height", raw.height)] {
            if value == Some(0) {
                return Err(ValidationError::InvalidDimension {
                    dimension,
                    value: 0,
                });
            }
        }

        let out = absolute(raw.out.as_deref().unwrap_or(Path::new("output-apps")));

        let engine = EngineConfig {
            dir: PathBuf::new(),
            out,
            name: name.clone(),
            platform: raw.platform.unwrap_or_else(TargetPlatform::host),
            arch: raw.arch.unwrap_or_else(Arch::host),
            icon,
            overwrite: raw.overwrite,
            quiet: raw.quiet,
            app_copyright: raw.app_copyright,
            app_version: raw.app_version,
            build_version: raw.build_version,
            version_string: raw.version_string,
            win32_metadata: raw.win32_metadata,
            runtime_dir,
        };

        let features = FeatureConfig {
            name,
            target_url,
            tray: raw.tray.unwrap_or_default(),
            width: raw.width,
            height: raw.height,
            user_agent: raw.user_agent,
            single_instance: raw.single_instance.unwrap_or(false),
            internal_urls: raw.internal_urls,
            verbose: raw.verbose,
        };

        Ok(ResolvedConfig { engine, features })
    }
}

/// Normalizes a user-supplied URL, defaulting the scheme to `https`.
pub fn normalize_url(raw: &str) -> Result<String, ValidationError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = url::Url::parse(&candidate).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" | "file" => Ok(url.to_string()),
        scheme => Err(ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

/// Removes characters that are invalid in file names and trims the result.
pub fn sanitize_name(name: &str) -> Result<String, ValidationError> {
    let cleaned = RESERVED_NAME_CHARS.replace_all(name, "");
    let cleaned = cleaned.trim().trim_end_matches('.').trim();
    if cleaned.is_empty() {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(cleaned.to_string())
}

/// Derives an app name from a URL host: `https://www.example.com` → `Example`.
fn infer_name(url: &str) -> String {
    let host = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let label = host.split('.').next().unwrap_or_default();

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "WebApp".to_string(),
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.absolutize()
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_path_buf())
}

fn existing_path(
    path: &Path,
    missing: impl FnOnce(PathBuf) -> ValidationError,
) -> Result<PathBuf, ValidationError> {
    let path = absolute(path);
    if path.exists() {
        Ok(path)
    } else {
        Err(missing(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TrayMode;

    fn request(url: &str) -> RawRequest {
        RawRequest {
            target_url: Some(url.to_string()),
            out: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com/");
        assert_eq!(
            normalize_url("http://example.com/app").unwrap(),
            "http://example.com/app"
        );
        assert!(normalize_url("ftp://example.com").is_err());
        assert!(normalize_url("https://").is_err());
    }

    #[test]
    fn test_sanitize_name_strips_reserved_characters() {
        assert_eq!(sanitize_name("My:App?").unwrap(), "MyApp");
        assert_eq!(sanitize_name("  Spaced App. ").unwrap(), "Spaced App");
        assert!(matches!(
            sanitize_name("/:*"),
            Err(ValidationError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_resolve_infers_name_and_defaults() {
        let config = DefaultOptionsResolver
            .resolve(request("www.example.com"))
            .expect("valid request");

        assert_eq!(config.features.name, "Example");
        assert_eq!(config.engine.name, "Example");
        assert_eq!(config.features.target_url, "https://www.example.com/");
        assert_eq!(config.features.tray, TrayMode::Disabled);
        assert_eq!(config.engine.platform, TargetPlatform::host());
        assert_eq!(config.engine.out, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_resolve_requires_target_url() {
        let err = DefaultOptionsResolver
            .resolve(RawRequest::default())
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingTargetUrl));
    }

    #[test]
    fn test_resolve_rejects_missing_icon() {
        let raw = RawRequest {
            icon: Some(PathBuf::from("/definitely/not/here/icon.png")),
            ..request("https://example.com")
        };
        let err = DefaultOptionsResolver.resolve(raw).unwrap_err();
        assert!(matches!(err, ValidationError::IconNotFound { .. }));
    }

    #[test]
    fn test_resolve_rejects_zero_width() {
        let raw = RawRequest {
            width: Some(0),
            ..request("https://example.com")
        };
        let err = DefaultOptionsResolver.resolve(raw).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidDimension {
                dimension: "width",
                ..
            }
        ));
    }
}
