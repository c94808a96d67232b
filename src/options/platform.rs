//! Target platform, architecture and tray mode.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform an app bundle is built for.
///
/// Serialized with the runtime's platform identifiers (`linux`, `win32`,
/// `darwin`, `mas`), which is also how the saved app configuration spells them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TargetPlatform {
    /// Linux directory bundle
    #[serde(rename = "linux")]
    Linux,
    /// Windows directory bundle
    #[serde(rename = "win32", alias = "windows")]
    Windows,
    /// macOS `.app` bundle
    #[serde(rename = "darwin", alias = "mac", alias = "macos", alias = "osx")]
    Darwin,
    /// Mac App Store `.app` bundle
    #[serde(rename = "mas")]
    Mas,
}

impl TargetPlatform {
    /// Platform matching the host this binary was compiled for.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "macos" => TargetPlatform::Darwin,
            "windows" => TargetPlatform::Windows,
            _ => TargetPlatform::Linux,
        }
    }

    /// Identifier used in bundle directory names and the saved configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Linux => "linux",
            TargetPlatform::Windows => "win32",
            TargetPlatform::Darwin => "darwin",
            TargetPlatform::Mas => "mas",
        }
    }

    /// Both macOS bundle flavours share layout and finalization rules.
    pub fn is_macos_family(&self) -> bool {
        matches!(self, TargetPlatform::Darwin | TargetPlatform::Mas)
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "linux" => Ok(TargetPlatform::Linux),
            "windows" | "win32" => Ok(TargetPlatform::Windows),
            "mac" | "macos" | "osx" | "darwin" => Ok(TargetPlatform::Darwin),
            "mas" => Ok(TargetPlatform::Mas),
            _ => Err(ValidationError::UnknownPlatform {
                value: value.to_string(),
            }),
        }
    }
}

/// CPU architecture of the produced bundle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// x86_64 / AMD64
    X64,
    /// 32-bit x86
    Ia32,
    /// AArch64 / ARM64
    Arm64,
    /// 32-bit ARM (hard float)
    Armv7l,
    /// macOS universal (x64 + arm64)
    Universal,
}

impl Arch {
    /// Architecture of the host this binary was compiled for.
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Arch::Ia32,
            "aarch64" => Arch::Arm64,
            "arm" => Arch::Armv7l,
            _ => Arch::X64,
        }
    }

    /// Identifier used in bundle directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Ia32 => "ia32",
            Arch::Arm64 => "arm64",
            Arch::Armv7l => "armv7l",
            Arch::Universal => "universal",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "ia32" | "x86" | "i686" => Ok(Arch::Ia32),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            "armv7l" | "armhf" => Ok(Arch::Armv7l),
            "universal" => Ok(Arch::Universal),
            _ => Err(ValidationError::UnknownArch {
                value: value.to_string(),
            }),
        }
    }
}

/// Whether the app lives in the system tray.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum TrayMode {
    /// No tray icon
    #[default]
    #[serde(rename = "false")]
    Disabled,
    /// Tray icon alongside the window
    #[serde(rename = "true")]
    Enabled,
    /// Start hidden in the tray
    #[serde(rename = "start-in-tray")]
    StartInTray,
}

impl TrayMode {
    /// True unless the tray is turned off.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, TrayMode::Disabled)
    }
}

impl FromStr for TrayMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "false" => Ok(TrayMode::Disabled),
            "true" => Ok(TrayMode::Enabled),
            "start-in-tray" => Ok(TrayMode::StartInTray),
            _ => Err(ValidationError::UnknownTrayMode {
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_aliases() {
        assert_eq!("mac".parse::<TargetPlatform>().unwrap(), TargetPlatform::Darwin);
        assert_eq!("Windows".parse::<TargetPlatform>().unwrap(), TargetPlatform::Windows);
        assert_eq!(TargetPlatform::Windows.as_str(), "win32");
        assert!(TargetPlatform::Mas.is_macos_family());
        assert!(!TargetPlatform::Linux.is_macos_family());
        assert!("beos".parse::<TargetPlatform>().is_err());
    }

    #[test]
    fn test_platform_serializes_as_runtime_identifier() {
        let json = serde_json::to_string(&TargetPlatform::Windows).unwrap();
        assert_eq!(json, "\"win32\"");
        let parsed: TargetPlatform = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(parsed, TargetPlatform::Windows);
    }

    #[test]
    fn test_tray_mode_round_trips_through_strings() {
        assert_eq!("start-in-tray".parse::<TrayMode>().unwrap(), TrayMode::StartInTray);
        assert!(!TrayMode::Disabled.is_enabled());
        assert!(TrayMode::StartInTray.is_enabled());
        assert_eq!(serde_json::to_string(&TrayMode::Disabled).unwrap(), "\"false\"");
    }

    #[test]
    fn test_arch_aliases() {
        assert_eq!("x86_64".parse::<Arch>().unwrap(), Arch::X64);
        assert_eq!("aarch64".parse::<Arch>().unwrap(), Arch::Arm64);
        assert!("sparc".parse::<Arch>().is_err());
    }
}
