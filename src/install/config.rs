use anyhow::Result;
use std::path::PathBuf;

use crate::{
    archive::{ArchiveExtractor, Extractor},
    asset::PlanRequest,
    download::{Downloader, HttpDownloader},
    http::{HttpClient, SchemePolicy},
    platform::{Platform, PlatformKey},
    runtime::{RealRuntime, Runtime},
};

/// Collaborators the installer works with
pub struct Config<R: Runtime, D: Downloader, E: Extractor> {
    pub runtime: R,
    pub downloader: D,
    pub extractor: E,
}

impl Config<RealRuntime, HttpDownloader<RealRuntime>, ArchiveExtractor> {
    pub fn new(policy: SchemePolicy) -> Result<Self> {
        let downloader = HttpDownloader::new(RealRuntime, HttpClient::build_with(policy)?);

        Ok(Self {
            runtime: RealRuntime,
            downloader,
            extractor: ArchiveExtractor::new(),
        })
    }
}

/// What to install and where
#[derive(Debug, Clone)]
pub struct InstallSettings {
    pub version: String,
    pub repository_url: Option<String>,
    pub repo_override: Option<String>,
    pub download_url: Option<String>,
    pub github_url: String,
    pub platform: Platform,
    pub vendor_dir: PathBuf,
}

impl InstallSettings {
    pub fn plan_request(&self, platform: Option<PlatformKey>) -> PlanRequest<'_> {
        PlanRequest {
            version: &self.version,
            repo_override: self.repo_override.as_deref(),
            repository_url: self.repository_url.as_deref(),
            download_url: self.download_url.as_deref(),
            github_url: &self.github_url,
            platform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_request_borrows_settings() {
        let settings = InstallSettings {
            version: "1.2.3".to_string(),
            repository_url: Some("https://github.com/acme/metasweep".to_string()),
            repo_override: None,
            download_url: None,
            github_url: "https://github.com".to_string(),
            platform: Platform::new("linux", "x86_64"),
            vendor_dir: PathBuf::from("/vendor"),
        };

        let request = settings.plan_request(settings.platform.key());
        assert_eq!(request.version, "1.2.3");
        assert_eq!(
            request.repository_url,
            Some("https://github.com/acme/metasweep")
        );
        assert_eq!(request.platform, Some(PlatformKey::LinuxX64));
        assert!(request.download_url.is_none());
    }

    #[test]
    fn test_config_new_builds_for_every_policy() {
        assert!(Config::new(SchemePolicy::HttpsOnly).is_ok());
        assert!(Config::new(SchemePolicy::AllowLoopbackHttp).is_ok());
    }
}
