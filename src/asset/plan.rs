use anyhow::Result;
use log::{debug, warn};

use crate::error::ProvisionError;
use crate::github::{GitHubRepo, release_download_base};
use crate::platform::{Arch, BINARY_NAME, OsFamily, PlatformKey};

/// How a downloaded asset turns into the executable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    TarGz,
    Zip,
    /// The download already is the executable.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub url: String,
    pub kind: AssetKind,
}

impl AssetRef {
    pub fn new(url: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Last path segment of the URL, ignoring any query or fragment.
    pub fn file_name(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        path.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(BINARY_NAME)
    }
}

/// What to download for this install, and how to unpack it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPlan {
    pub tag: String,
    pub primary: AssetRef,
    /// Tried only when the primary asset was never published.
    pub fallback: Option<AssetRef>,
}

/// Inputs to [`build_plan`]
#[derive(Debug, Clone, Default)]
pub struct PlanRequest<'a> {
    pub version: &'a str,
    /// Explicit `owner/repo`, bypassing the repository URL.
    pub repo_override: Option<&'a str>,
    /// Repository URL from package metadata.
    pub repository_url: Option<&'a str>,
    /// Explicit asset URL; replaces the whole plan.
    pub download_url: Option<&'a str>,
    pub github_url: &'a str,
    pub platform: Option<PlatformKey>,
}

/// Build the download plan.
///
/// Returns `Ok(None)` when no prebuilt artifact exists for the platform; the
/// caller is expected to skip installation rather than fail.
#[tracing::instrument(skip(request))]
pub fn build_plan(request: &PlanRequest<'_>) -> Result<Option<AssetPlan>> {
    let version = normalize_version(request.version);
    let tag = format!("v{}", version);

    if let Some(url) = present(request.download_url) {
        debug!("Using explicit download URL {}", url);
        return Ok(Some(AssetPlan {
            tag,
            primary: AssetRef::new(url, AssetKind::Direct),
            fallback: None,
        }));
    }

    let repo = resolve_repo(request.repo_override, request.repository_url)?;
    debug!("Resolved repository {}", repo);

    let Some(key) = request.platform else {
        return Ok(None);
    };

    let base = release_download_base(request.github_url, &repo, &tag);
    let unix_arch = unix_arch_token(key.arch());

    let plan = match key.os() {
        OsFamily::Linux => AssetPlan {
            tag,
            primary: AssetRef::new(
                format!("{}/{}-{}-Linux-{}.tar.gz", base, BINARY_NAME, version, unix_arch),
                AssetKind::TarGz,
            ),
            fallback: Some(AssetRef::new(
                format!("{}/{}-{}.AppImage", base, BINARY_NAME, unix_arch),
                AssetKind::Direct,
            )),
        },
        OsFamily::Darwin => AssetPlan {
            tag,
            primary: AssetRef::new(
                format!("{}/{}-{}-Darwin-{}.tar.gz", base, BINARY_NAME, version, unix_arch),
                AssetKind::TarGz,
            ),
            fallback: None,
        },
        OsFamily::Windows => AssetPlan {
            tag,
            primary: AssetRef::new(
                format!(
                    "{}/{}-{}-Windows-{}.zip",
                    base,
                    BINARY_NAME,
                    version,
                    windows_arch_token(key.arch())
                ),
                AssetKind::Zip,
            ),
            fallback: None,
        },
    };

    Ok(Some(plan))
}

fn resolve_repo(repo_override: Option<&str>, repository_url: Option<&str>) -> Result<GitHubRepo> {
    if let Some(value) = present(repo_override) {
        return match value.parse::<GitHubRepo>() {
            Ok(repo) => Ok(repo),
            Err(e) => {
                warn!("Invalid repository override '{}': {}", value, e);
                Err(ProvisionError::UnresolvedRepository.into())
            }
        };
    }

    present(repository_url)
        .and_then(GitHubRepo::from_repository_url)
        .ok_or_else(|| ProvisionError::UnresolvedRepository.into())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_version(version: &str) -> &str {
    let version = version.trim();
    version.strip_prefix('v').unwrap_or(version)
}

/// Architecture token used in Linux and macOS tarball names.
fn unix_arch_token(arch: Arch) -> &'static str {
    match arch {
        Arch::X64 => "x86_64",
        Arch::Arm64 => "arm64",
    }
}

/// Architecture token used in Windows zip names.
fn windows_arch_token(arch: Arch) -> &'static str {
    match arch {
        Arch::X64 => "AMD64",
        Arch::Arm64 => "ARM64",
    }
}
