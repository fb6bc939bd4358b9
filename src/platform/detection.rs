use super::{BINARY_NAME, PlatformKey};

/// Raw platform information as reported by the runtime or an override
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the current platform
    pub fn detect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Detect the current platform, replacing either half with an override.
    pub fn detect_with(os: Option<String>, arch: Option<String>) -> Self {
        let detected = Self::detect();
        Self {
            os: os.unwrap_or(detected.os),
            arch: arch.unwrap_or(detected.arch),
        }
    }

    pub fn key(&self) -> Option<PlatformKey> {
        PlatformKey::resolve(&self.os, &self.arch)
    }

    pub fn is_windows(&self) -> bool {
        matches!(
            self.os.to_ascii_lowercase().as_str(),
            "windows" | "win32"
        )
    }

    pub fn is_linux(&self) -> bool {
        self.os.eq_ignore_ascii_case("linux")
    }

    /// File name the provisioned executable carries on this platform.
    pub fn binary_file_name(&self) -> String {
        if self.is_windows() {
            format!("{}.exe", BINARY_NAME)
        } else {
            BINARY_NAME.to_string()
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
