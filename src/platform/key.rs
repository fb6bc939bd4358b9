use anyhow::{Result, anyhow};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Linux,
    Darwin,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
}

/// A supported (OS, architecture) pair that release artifacts are published for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKey {
    LinuxX64,
    LinuxArm64,
    DarwinX64,
    DarwinArm64,
    Win32X64,
}

impl PlatformKey {
    #[cfg(test)]
    const ALL: [PlatformKey; 5] = [
        PlatformKey::LinuxX64,
        PlatformKey::LinuxArm64,
        PlatformKey::DarwinX64,
        PlatformKey::DarwinArm64,
        PlatformKey::Win32X64,
    ];

    /// Map an OS and architecture identifier onto a key.
    ///
    /// Returns `None` for anything outside the supported set. That is an
    /// expected answer, not a failure.
    pub fn resolve(os: &str, arch: &str) -> Option<Self> {
        let os = match os.to_ascii_lowercase().as_str() {
            "linux" => OsFamily::Linux,
            "macos" | "darwin" => OsFamily::Darwin,
            "windows" | "win32" => OsFamily::Windows,
            _ => return None,
        };
        let arch = match arch.to_ascii_lowercase().as_str() {
            "x86_64" | "x64" | "amd64" => Arch::X64,
            "aarch64" | "arm64" => Arch::Arm64,
            _ => return None,
        };

        match (os, arch) {
            (OsFamily::Linux, Arch::X64) => Some(PlatformKey::LinuxX64),
            (OsFamily::Linux, Arch::Arm64) => Some(PlatformKey::LinuxArm64),
            (OsFamily::Darwin, Arch::X64) => Some(PlatformKey::DarwinX64),
            (OsFamily::Darwin, Arch::Arm64) => Some(PlatformKey::DarwinArm64),
            (OsFamily::Windows, Arch::X64) => Some(PlatformKey::Win32X64),
            (OsFamily::Windows, Arch::Arm64) => None,
        }
    }

    pub fn os(&self) -> OsFamily {
        match self {
            PlatformKey::LinuxX64 | PlatformKey::LinuxArm64 => OsFamily::Linux,
            PlatformKey::DarwinX64 | PlatformKey::DarwinArm64 => OsFamily::Darwin,
            PlatformKey::Win32X64 => OsFamily::Windows,
        }
    }

    pub fn arch(&self) -> Arch {
        match self {
            PlatformKey::LinuxX64 | PlatformKey::DarwinX64 | PlatformKey::Win32X64 => Arch::X64,
            PlatformKey::LinuxArm64 | PlatformKey::DarwinArm64 => Arch::Arm64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKey::LinuxX64 => "linux-x64",
            PlatformKey::LinuxArm64 => "linux-arm64",
            PlatformKey::DarwinX64 => "darwin-x64",
            PlatformKey::DarwinArm64 => "darwin-arm64",
            PlatformKey::Win32X64 => "win32-x64",
        }
    }
}

impl std::fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux-x64" => Ok(PlatformKey::LinuxX64),
            "linux-arm64" => Ok(PlatformKey::LinuxArm64),
            "darwin-x64" => Ok(PlatformKey::DarwinX64),
            "darwin-arm64" => Ok(PlatformKey::DarwinArm64),
            "win32-x64" => Ok(PlatformKey::Win32X64),
            _ => Err(anyhow!("Unknown platform key '{}'.", s)),
        }
    }
}
