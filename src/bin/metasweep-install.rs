use anyhow::Result;
use clap::Parser;
use metasweep_shim::LOG_TAG;
use metasweep_shim::github::DEFAULT_GITHUB_URL;
use metasweep_shim::http::SchemePolicy;
use metasweep_shim::install::{InstallOutcome, InstallSettings, install};
use metasweep_shim::paths::resolve_vendor_dir;
use metasweep_shim::platform::{Platform, TARGET_ARCH_ENV, TARGET_OS_ENV};
use metasweep_shim::runtime::RealRuntime;
use std::path::PathBuf;
use std::process::ExitCode;

/// metasweep-install - fetch the prebuilt metasweep binary
///
/// Downloads the release asset matching this machine from GitHub, unpacks it
/// into the vendor directory and checks the binary can be found there.
///
/// Platforms without a prebuilt binary are skipped without error.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Vendor directory (defaults to `.vendor` next to this executable)
    #[arg(long, env = "METASWEEP_VENDOR_DIR", value_name = "PATH")]
    vendor_dir: Option<PathBuf>,

    /// Release version to install
    #[arg(
        long,
        env = "METASWEEP_RELEASE_VERSION",
        value_name = "VERSION",
        default_value = env!("METASWEEP_BUILD_VERSION")
    )]
    release_version: String,

    /// Repository URL the GitHub repo is derived from
    #[arg(
        long,
        env = "METASWEEP_REPOSITORY_URL",
        value_name = "URL",
        default_value = env!("CARGO_PKG_REPOSITORY")
    )]
    repository_url: String,

    /// GitHub repository override in the format "owner/repo"
    #[arg(long, env = "METASWEEP_GH_REPO", value_name = "OWNER/REPO")]
    repo: Option<String>,

    /// Download this URL as the binary instead of a release asset
    #[arg(long, env = "METASWEEP_DOWNLOAD_URL", value_name = "URL")]
    download_url: Option<String>,

    /// Base URL release downloads are served from
    #[arg(
        long,
        env = "METASWEEP_GITHUB_URL",
        value_name = "URL",
        default_value = DEFAULT_GITHUB_URL
    )]
    github_url: String,

    /// Operating system to install for (defaults to the current one)
    #[arg(long, env = TARGET_OS_ENV, value_name = "OS")]
    target_os: Option<String>,

    /// Architecture to install for (defaults to the current one)
    #[arg(long, env = TARGET_ARCH_ENV, value_name = "ARCH")]
    target_arch: Option<String>,

    /// Accept plain http for loopback hosts (local test servers only)
    #[arg(long, hide = true)]
    allow_loopback_http: bool,
}

impl Cli {
    fn scheme_policy(&self) -> SchemePolicy {
        if self.allow_loopback_http {
            SchemePolicy::AllowLoopbackHttp
        } else {
            SchemePolicy::HttpsOnly
        }
    }

    fn into_settings(self) -> Result<InstallSettings> {
        let vendor_dir = resolve_vendor_dir(
            &RealRuntime,
            self.vendor_dir.filter(|d| !d.as_os_str().is_empty()),
        )?;

        Ok(InstallSettings {
            version: self.release_version,
            repository_url: Some(self.repository_url),
            repo_override: self.repo,
            download_url: self.download_url,
            github_url: self.github_url,
            platform: Platform::detect_with(
                self.target_os.filter(|s| !s.is_empty()),
                self.target_arch.filter(|s| !s.is_empty()),
            ),
            vendor_dir,
        })
    }
}

async fn run(cli: Cli) -> Result<InstallOutcome> {
    let policy = cli.scheme_policy();
    let settings = cli.into_settings()?;
    install(&settings, policy).await
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} Failed to install binary: {:#}", LOG_TAG, e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["metasweep-install"]).unwrap();
        assert_eq!(cli.github_url, DEFAULT_GITHUB_URL);
        assert_eq!(cli.repository_url, env!("CARGO_PKG_REPOSITORY"));
        assert!(!cli.release_version.is_empty());
        assert_eq!(cli.scheme_policy(), SchemePolicy::HttpsOnly);
    }

    #[test]
    fn test_cli_loopback_http_opt_in() {
        let cli = Cli::try_parse_from(["metasweep-install", "--allow-loopback-http"]).unwrap();
        assert_eq!(cli.scheme_policy(), SchemePolicy::AllowLoopbackHttp);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "metasweep-install",
            "--vendor-dir",
            "/opt/metasweep/.vendor",
            "--release-version",
            "v2.0.1",
            "--repo",
            "acme/metasweep",
            "--target-os",
            "linux",
            "--target-arch",
            "aarch64",
        ])
        .unwrap();

        assert_eq!(cli.repo.as_deref(), Some("acme/metasweep"));
        let settings = cli.into_settings().unwrap();
        assert_eq!(settings.vendor_dir, PathBuf::from("/opt/metasweep/.vendor"));
        assert_eq!(settings.version, "v2.0.1");
        assert_eq!(settings.platform, Platform::new("linux", "aarch64"));
    }

    #[test]
    fn test_cli_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["metasweep-install", "acme/metasweep"]).is_err());
    }
}
