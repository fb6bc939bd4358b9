//! Platform detection and canonical platform keys
//!
//! This module detects the current platform (OS and architecture) and maps
//! it onto the small set of platforms prebuilt binaries are published for.

mod detection;
mod key;

pub use detection::Platform;
pub use key::{Arch, OsFamily, PlatformKey};

/// Name of the provisioned executable, without any platform suffix.
pub const BINARY_NAME: &str = "metasweep";

/// Override the detected operating system.
pub const TARGET_OS_ENV: &str = "METASWEEP_TARGET_OS";

/// Override the detected architecture.
pub const TARGET_ARCH_ENV: &str = "METASWEEP_TARGET_ARCH";
