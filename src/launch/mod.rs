//! Running the provisioned binary on behalf of the shim.

use crate::error::ProvisionError;
use crate::locate::locate;
use crate::paths::resolve_vendor_dir;
use crate::platform::{Platform, TARGET_ARCH_ENV, TARGET_OS_ENV};
use crate::runtime::Runtime;
use anyhow::Result;
use log::{debug, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Makes AppImage-style executables unpack themselves instead of mounting
/// through FUSE, which is frequently unavailable on Linux hosts.
pub const EXTRACT_AND_RUN_VAR: &str = "APPIMAGE_EXTRACT_AND_RUN";

/// Where to look for the binary and which platform we are on
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub vendor_dir: PathBuf,
    pub platform: Platform,
}

impl LaunchConfig {
    pub fn from_env<R: Runtime>(runtime: &R) -> Result<Self> {
        let var = |key: &str| runtime.env_var(key).ok().filter(|v| !v.trim().is_empty());
        Ok(Self {
            vendor_dir: resolve_vendor_dir(runtime, None)?,
            platform: Platform::detect_with(var(TARGET_OS_ENV), var(TARGET_ARCH_ENV)),
        })
    }
}

/// Variables added on top of the inherited environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchEnvironment {
    overrides: Vec<(String, String)>,
}

impl LaunchEnvironment {
    pub fn for_platform<R: Runtime>(runtime: &R, platform: &Platform) -> Self {
        let mut overrides = Vec::new();
        if platform.is_linux() && runtime.env_var(EXTRACT_AND_RUN_VAR).is_err() {
            overrides.push((EXTRACT_AND_RUN_VAR.to_string(), "1".to_string()));
        }
        Self { overrides }
    }

    pub fn overrides(&self) -> &[(String, String)] {
        &self.overrides
    }
}

/// Find the binary for this launch. Never cached: the vendor tree is read
/// fresh on every invocation.
pub fn resolve_binary<R: Runtime>(runtime: &R, config: &LaunchConfig) -> Result<PathBuf> {
    let file_name = config.platform.binary_file_name();
    locate(runtime, &config.vendor_dir, &file_name, config.platform.key()).ok_or_else(|| {
        ProvisionError::BinaryNotFound {
            vendor_root: config.vendor_dir.clone(),
        }
        .into()
    })
}

/// Locate the binary, run it with `args` and stdio inherited, and return the
/// exit code the shim should exit with.
#[tracing::instrument(skip(runtime, args))]
pub fn launch<R: Runtime>(runtime: &R, config: &LaunchConfig, args: Vec<OsString>) -> Result<i32> {
    let binary = resolve_binary(runtime, config)?;
    let env = LaunchEnvironment::for_platform(runtime, &config.platform);
    run_binary(&binary, args, &env)
}

fn run_binary(binary: &Path, args: Vec<OsString>, env: &LaunchEnvironment) -> Result<i32> {
    debug!("Launching {:?} with {} argument(s)", binary, args.len());

    let status = Command::new(binary)
        .args(args)
        .envs(env.overrides().iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ProvisionError::Launch {
            path: binary.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(exit_code(status))
}

/// Map a child's exit status onto the shim's exit code.
///
/// A normal exit keeps its code. On Unix a signal-terminated child maps to
/// `128 + signal`, like a shell reports it. Anything else becomes 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            match nix::sys::signal::Signal::try_from(signal) {
                Ok(name) => warn!("metasweep terminated by {}", name),
                Err(_) => warn!("metasweep terminated by signal {}", signal),
            }
            return 128 + signal;
        }
    }

    1
}
