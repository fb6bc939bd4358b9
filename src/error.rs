//! Classified provisioning failures.
//!
//! These are raised inside `anyhow::Error` chains so callers can still attach
//! context, while tests and the installer's fallback logic can downcast to a
//! specific kind. An unsupported platform is deliberately absent: it is an
//! expected outcome, reported through `InstallOutcome::Skipped`.

use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum ProvisionError {
    /// No repository identity could be derived from configuration.
    UnresolvedRepository,
    /// The fetch failed, either with an HTTP status or at the network layer.
    Transport {
        url: String,
        status: Option<StatusCode>,
        reason: String,
    },
    /// An archive could not be unpacked.
    Extraction {
        tool: &'static str,
        archive: PathBuf,
        reason: String,
    },
    /// Every search strategy of the locator came up empty.
    BinaryNotFound { vendor_root: PathBuf },
    /// The binary exists but the child process could not be spawned.
    Launch { path: PathBuf, reason: String },
}

impl ProvisionError {
    /// True when the server answered 404, meaning the asset was never published.
    pub fn is_asset_missing(&self) -> bool {
        matches!(
            self,
            ProvisionError::Transport {
                status: Some(StatusCode::NOT_FOUND),
                ..
            }
        )
    }
}

impl std::fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisionError::UnresolvedRepository => {
                write!(
                    f,
                    "Cannot determine GitHub repo (set METASWEEP_GH_REPO=owner/repo)."
                )
            }
            ProvisionError::Transport {
                url,
                status: Some(status),
                ..
            } => {
                write!(f, "HTTP {} while fetching {}", status.as_u16(), url)
            }
            ProvisionError::Transport {
                url,
                status: None,
                reason,
            } => {
                write!(f, "Failed to fetch {}: {}", url, reason)
            }
            ProvisionError::Extraction {
                tool,
                archive,
                reason,
            } => {
                write!(
                    f,
                    "{} extraction of {} failed: {}",
                    tool,
                    archive.display(),
                    reason
                )
            }
            ProvisionError::BinaryNotFound { vendor_root } => {
                write!(
                    f,
                    "Binary not found under {}. Try reinstalling or set METASWEEP_DOWNLOAD_URL.",
                    vendor_root.display()
                )
            }
            ProvisionError::Launch { path, reason } => {
                write!(f, "Failed to launch {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ProvisionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_includes_url_and_status() {
        let err = ProvisionError::Transport {
            url: "https://example.com/a.tar.gz".to_string(),
            status: Some(StatusCode::FORBIDDEN),
            reason: "Forbidden".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("https://example.com/a.tar.gz"));
    }

    #[test]
    fn test_transport_display_without_status_uses_reason() {
        let err = ProvisionError::Transport {
            url: "https://example.com".to_string(),
            status: None,
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_is_asset_missing() {
        let missing = ProvisionError::Transport {
            url: "u".to_string(),
            status: Some(StatusCode::NOT_FOUND),
            reason: String::new(),
        };
        assert!(missing.is_asset_missing());

        let server_error = ProvisionError::Transport {
            url: "u".to_string(),
            status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            reason: String::new(),
        };
        assert!(!server_error.is_asset_missing());
        assert!(!ProvisionError::UnresolvedRepository.is_asset_missing());
    }

    #[test]
    fn test_binary_not_found_suggests_reinstall() {
        let err = ProvisionError::BinaryNotFound {
            vendor_root: PathBuf::from("/opt/metasweep/.vendor"),
        };
        let msg = err.to_string();
        assert!(msg.contains("reinstalling"));
        assert!(msg.contains("METASWEEP_DOWNLOAD_URL"));
    }
}
