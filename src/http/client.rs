//! HTTP client that follows redirects itself and streams downloads to a writer.

use anyhow::{Context, Result};
use log::debug;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, Url};
use std::io::Write;
use std::net::IpAddr;

use crate::error::ProvisionError;

const USER_AGENT: &str = concat!("metasweep-shim/", env!("CARGO_PKG_VERSION"));

/// Which URLs the client is willing to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemePolicy {
    #[default]
    HttpsOnly,
    /// Plain `http` is also accepted, but only for loopback hosts.
    AllowLoopbackHttp,
}

impl SchemePolicy {
    fn check(self, url: &Url) -> Result<(), String> {
        match url.scheme() {
            "https" => Ok(()),
            "http" if self == SchemePolicy::AllowLoopbackHttp && is_loopback(url) => Ok(()),
            scheme => Err(format!("refusing insecure '{}' URL, HTTPS is required", scheme)),
        }
    }
}

fn is_loopback(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        host.eq_ignore_ascii_case("localhost")
            || host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .is_ok_and(|ip| ip.is_loopback())
    })
}

/// A redirect may never leave HTTPS.
fn check_redirect(from: &Url, to: &Url) -> Result<(), String> {
    if from.scheme() == "https" && to.scheme() != "https" {
        return Err(format!("refusing redirect from HTTPS to {}", to));
    }
    Ok(())
}

/// HTTP client for fetching release assets.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    policy: SchemePolicy,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    ///
    /// The client should be built with redirects disabled; otherwise reqwest
    /// follows them before this type ever sees a redirect status.
    pub fn new(client: Client, policy: SchemePolicy) -> Self {
        Self { client, policy }
    }

    /// Builds the default client: rustls, our user agent, no automatic
    /// redirects, HTTPS only.
    pub fn build() -> Result<Self> {
        Self::build_with(SchemePolicy::HttpsOnly)
    }

    pub fn build_with(policy: SchemePolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .https_only(policy == SchemePolicy::HttpsOnly)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client, policy))
    }

    /// Downloads `url` into the writer produced by `create_writer`.
    ///
    /// The writer is only created once a successful response has arrived, so
    /// a failed request never touches the destination.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let mut response = self.follow_redirects(url).await?;
        let final_url = response.url().to_string();

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        loop {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| transport_error(&final_url, &e))?;
            let Some(chunk) = chunk else {
                break;
            };
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }

    /// Issues GETs until a non-redirect response arrives.
    ///
    /// There is no hop limit; a redirect loop keeps the install busy until it
    /// is interrupted.
    async fn follow_redirects(&self, url: &str) -> Result<Response> {
        let mut current = Url::parse(url).map_err(|e| ProvisionError::Transport {
            url: url.to_string(),
            status: None,
            reason: format!("invalid URL: {}", e),
        })?;

        loop {
            self.policy
                .check(&current)
                .map_err(|reason| ProvisionError::Transport {
                    url: current.to_string(),
                    status: None,
                    reason,
                })?;

            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| transport_error(current.as_str(), &e))?;

            let status = response.status();
            if status.is_redirection()
                && let Some(location) = response.headers().get(LOCATION)
            {
                let next = location
                    .to_str()
                    .ok()
                    .and_then(|location| current.join(location).ok())
                    .ok_or_else(|| ProvisionError::Transport {
                        url: current.to_string(),
                        status: Some(status),
                        reason: "redirect with an unusable Location header".to_string(),
                    })?;
                check_redirect(&current, &next).map_err(|reason| ProvisionError::Transport {
                    url: current.to_string(),
                    status: Some(status),
                    reason,
                })?;
                debug!("{} redirected ({}) to {}", current, status.as_u16(), next);
                current = next;
                continue;
            }

            if !status.is_success() {
                return Err(ProvisionError::Transport {
                    url: current.to_string(),
                    status: Some(status),
                    reason: status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string(),
                }
                .into());
            }

            return Ok(response);
        }
    }
}

fn transport_error(url: &str, error: &reqwest::Error) -> ProvisionError {
    ProvisionError::Transport {
        url: url.to_string(),
        status: error.status(),
        reason: error.to_string(),
    }
}
