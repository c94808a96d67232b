//! Comprehensive error types for web app build operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for all build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// Bad or missing configuration, raised before anything is staged
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// Packaging for this target needs administrator rights on the host
    #[error(
        "Building a {target} app on a {host} host requires administrator privileges, \
         because the packaging engine must extract archive entries that need elevated rights. \
         Please rerun this command from an administrator shell."
    )]
    InsufficientPrivileges {
        /// Target platform requested
        target: String,
        /// Host operating system
        host: String,
    },

    /// `--upgrade` pointed somewhere without a previous build
    #[error("Could not find a previously built app in \"{}\"", path.display())]
    UpgradeNotFound {
        /// Path that was searched
        path: PathBuf,
    },

    /// The packaging engine produced nothing because the output already exists
    #[error(
        "Output directory for this app already exists in \"{}\" and overwriting was not allowed",
        out.display()
    )]
    DirectoryExists {
        /// Output directory the engine refused to replace
        out: PathBuf,
    },

    /// Opaque packaging engine failure, propagated unmodified
    #[error(transparent)]
    Engine(#[from] crate::bundler::Error),

    /// File system error with path context
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// Operation that failed (e.g. "copying icon")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        error: std::io::Error,
    },

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// No target URL given and none could be restored from a previous build
    #[error("A target URL is required")]
    MissingTargetUrl,

    /// Target URL could not be parsed
    #[error("Invalid target URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as given
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// App name is empty after sanitization
    #[error("Invalid app name '{name}': nothing usable remains after removing reserved characters")]
    InvalidName {
        /// Name as given
        name: String,
    },

    /// Unknown target platform
    #[error("Unknown platform '{value}'. Valid platforms: linux, windows, mac, mas")]
    UnknownPlatform {
        /// Platform as given
        value: String,
    },

    /// Unknown target architecture
    #[error("Unknown architecture '{value}'. Valid architectures: x64, ia32, arm64, armv7l, universal")]
    UnknownArch {
        /// Architecture as given
        value: String,
    },

    /// Unknown tray mode
    #[error("Unknown tray mode '{value}'. Valid values: true, false, start-in-tray")]
    UnknownTrayMode {
        /// Tray mode as given
        value: String,
    },

    /// Icon file does not exist
    #[error("Icon file not found: {}", path.display())]
    IconNotFound {
        /// Path that was given
        path: PathBuf,
    },

    /// App template directory does not exist
    #[error("App template directory not found: {}", path.display())]
    TemplateNotFound {
        /// Path that was given
        path: PathBuf,
    },

    /// Runtime shell directory does not exist
    #[error("Runtime shell directory not found: {}", path.display())]
    RuntimeNotFound {
        /// Path that was given
        path: PathBuf,
    },

    /// Window dimension out of range
    #[error("Invalid window {dimension}: {value} (must be greater than zero)")]
    InvalidDimension {
        /// Either "width" or "height"
        dimension: &'static str,
        /// Value as given
        value: u32,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Defaults file could not be read
    #[error("Failed to read config file {}: {reason}", path.display())]
    ConfigFile {
        /// Path to the file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl BuildError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BuildError::Validation(ValidationError::MissingTargetUrl) => vec![
                "Pass the URL of the site to wrap as the first argument".to_string(),
            ],
            BuildError::Validation(ValidationError::IconNotFound { path }) => vec![
                format!("Check that {} exists and is readable", path.display()),
                "Omit --icon to build without a custom icon".to_string(),
            ],
            BuildError::InsufficientPrivileges { .. } => vec![
                "Windows: right-click your terminal and choose 'Run as administrator'".to_string(),
                "Linux: rerun the command with sudo".to_string(),
                "Or build the macOS app on a macOS machine".to_string(),
            ],
            BuildError::UpgradeNotFound { path } => vec![
                format!(
                    "Point --upgrade at the app directory or executable, not at {}",
                    path.display()
                ),
                "Only apps built by this tool (containing webapp.json) can be upgraded".to_string(),
            ],
            BuildError::DirectoryExists { out } => vec![
                "Pass --overwrite to replace the existing app".to_string(),
                format!("Or choose another --out than {}", out.display()),
            ],
            BuildError::Fs { path, .. } => vec![format!(
                "Check permissions and free space for {}",
                path.display()
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Extension trait for filesystem operations with automatic path context.
///
/// Mirrors the packaging engine's `ErrorExt`, producing [`BuildError::Fs`].
pub trait FsContext<T> {
    /// Add filesystem context to an I/O error.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> FsContext<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| BuildError::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}
