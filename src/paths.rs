//! Where the vendor tree lives.

use crate::runtime::Runtime;
use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub const VENDOR_DIR_ENV: &str = "METASWEEP_VENDOR_DIR";

/// Name of the vendor directory placed next to the executables.
pub const VENDOR_DIR_NAME: &str = ".vendor";

/// Resolve the vendor directory.
///
/// Precedence: explicit value, `METASWEEP_VENDOR_DIR`, then `.vendor` next
/// to the running executable (after resolving symlinks, so a shim linked
/// into `PATH` still finds its own tree).
pub fn resolve_vendor_dir<R: Runtime>(runtime: &R, explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }

    if let Ok(dir) = runtime.env_var(VENDOR_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    let exe = runtime.current_exe()?;
    let exe = runtime.canonicalize(&exe).unwrap_or(exe);
    let exe_dir = exe
        .parent()
        .ok_or_else(|| anyhow!("Executable path {:?} has no parent directory", exe))?;
    Ok(exe_dir.join(VENDOR_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::Path;

    #[test]
    fn test_explicit_value_wins() {
        // Strict mock: neither env nor exe lookups may happen.
        let runtime = MockRuntime::new();
        let dir = resolve_vendor_dir(&runtime, Some(PathBuf::from("/opt/vendor"))).unwrap();
        assert_eq!(dir, PathBuf::from("/opt/vendor"));
    }

    #[test]
    fn test_env_var_used_when_no_explicit_value() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(VENDOR_DIR_ENV))
            .returning(|_| Ok("/srv/metasweep".to_string()));

        let dir = resolve_vendor_dir(&runtime, None).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/metasweep"));
    }

    #[test]
    fn test_defaults_next_to_resolved_executable() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(VENDOR_DIR_ENV))
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime
            .expect_current_exe()
            .returning(|| Ok(PathBuf::from("/usr/local/bin/metasweep")));
        runtime
            .expect_canonicalize()
            .with(eq(Path::new("/usr/local/bin/metasweep").to_path_buf()))
            .returning(|_| Ok(PathBuf::from("/opt/metasweep/bin/metasweep")));

        let dir = resolve_vendor_dir(&runtime, None).unwrap();
        assert_eq!(dir, PathBuf::from("/opt/metasweep/bin/.vendor"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(VENDOR_DIR_ENV))
            .returning(|_| Ok("  ".to_string()));
        runtime
            .expect_current_exe()
            .returning(|| Ok(PathBuf::from("/tools/metasweep")));
        runtime
            .expect_canonicalize()
            .returning(|_| Err(anyhow!("no such file")));

        let dir = resolve_vendor_dir(&runtime, Some(PathBuf::new())).unwrap();
        assert_eq!(dir, PathBuf::from("/tools/.vendor"));
    }
}
