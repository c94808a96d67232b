//! Host environment detection.
//!
//! Everything the pipeline needs to know about the machine it runs on is
//! captured once in a [`HostEnvironment`] value and handed to the builder,
//! so stages never probe the machine themselves.

use std::path::PathBuf;
use std::sync::LazyLock;

/// Operating system of the machine running the build.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HostOs {
    /// Any Linux distribution
    Linux,
    /// macOS
    MacOs,
    /// Windows
    Windows,
    /// Anything else (BSDs, ...)
    Other,
}

impl HostOs {
    /// Detects the operating system this binary was compiled for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "linux" => HostOs::Linux,
            "macos" => HostOs::MacOs,
            "windows" => HostOs::Windows,
            _ => HostOs::Other,
        }
    }

    /// Human-readable name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            HostOs::Linux => "Linux",
            HostOs::MacOs => "macOS",
            HostOs::Windows => "Windows",
            HostOs::Other => std::env::consts::OS,
        }
    }
}

/// Check if Wine is available for building Windows apps on non-Windows hosts.
///
/// Cached result to avoid repeated subprocess calls.
pub static HAS_WINE: LazyLock<bool> = LazyLock::new(|| {
    for candidate in ["wine", "wine64"] {
        match which::which(candidate) {
            Ok(path) => {
                log::debug!("Found {} at: {}", candidate, path.display());
                match std::process::Command::new(&path).arg("--version").output() {
                    Ok(output) if output.status.success() => {
                        let version = String::from_utf8_lossy(&output.stdout);
                        log::info!("✓ {} available: {}", candidate, version.trim());
                        return true;
                    }
                    Ok(output) => {
                        log::warn!(
                            "{} found at {} but --version check failed (exit code: {:?})",
                            candidate,
                            path.display(),
                            output.status.code()
                        );
                    }
                    Err(e) => {
                        log::warn!(
                            "{} found at {} but failed to execute: {}. Check file permissions.",
                            candidate,
                            path.display(),
                            e
                        );
                    }
                }
            }
            Err(e) => log::debug!("{} not found in PATH: {}", candidate, e),
        }
    }
    false
});

/// Whether the current process holds administrator / superuser rights.
#[cfg(unix)]
pub fn is_elevated() -> bool {
    users::get_effective_uid() == 0
}

/// Whether the current process holds administrator / superuser rights.
///
/// `net session` only succeeds from an elevated prompt.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    std::process::Command::new("net")
        .arg("session")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Whether the current process holds administrator / superuser rights.
#[cfg(not(any(unix, windows)))]
pub fn is_elevated() -> bool {
    false
}

/// Snapshot of the machine a build runs on.
#[derive(Clone, Debug)]
pub struct HostEnvironment {
    /// Host operating system
    pub os: HostOs,
    /// Process runs with administrator / superuser rights
    pub elevated: bool,
    /// Wine is available for Windows resource editing
    pub has_wine: bool,
    /// Working directory used to resolve relative paths and the default output
    pub cwd: PathBuf,
    /// Root under which temporary build directories are created
    pub temp_root: PathBuf,
    /// Root of the Linux system install (`/opt`)
    pub system_install_root: PathBuf,
    /// Per-user desktop entry directory (`~/.local/share/applications`)
    pub user_applications_dir: Option<PathBuf>,
    /// Name of the invoking user, used to hand system installs back to them
    pub invoking_user: Option<String>,
}

impl HostEnvironment {
    /// Probes the current machine.
    pub fn detect() -> std::io::Result<Self> {
        let os = HostOs::current();
        let has_wine = if os == HostOs::Windows {
            false
        } else {
            *HAS_WINE
        };

        Ok(Self {
            os,
            elevated: is_elevated(),
            has_wine,
            cwd: std::env::current_dir()?,
            temp_root: std::env::temp_dir(),
            system_install_root: PathBuf::from("/opt"),
            user_applications_dir: dirs::data_dir().map(|dir| dir.join("applications")),
            invoking_user: invoking_user(),
        })
    }
}

/// The user who launched the build, looking through `sudo` when present.
fn invoking_user() -> Option<String> {
    if let Ok(user) = std::env::var("SUDO_USER")
        && !user.is_empty()
    {
        return Some(user);
    }

    #[cfg(unix)]
    {
        users::get_current_username().map(|name| name.to_string_lossy().into_owned())
    }
    #[cfg(not(unix))]
    {
        std::env::var("USERNAME").ok()
    }
}
