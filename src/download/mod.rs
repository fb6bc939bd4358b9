use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::path::Path;

/// Fetches a URL into a local file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written.
    ///
    /// On failure nothing is left at `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Downloader backed by [`HttpClient`]; files are created executable.
pub struct HttpDownloader<R: Runtime> {
    runtime: R,
    http_client: HttpClient,
}

impl<R: Runtime> HttpDownloader<R> {
    pub fn new(runtime: R, http_client: HttpClient) -> Self {
        Self {
            runtime,
            http_client,
        }
    }
}

#[async_trait]
impl<R: Runtime> Downloader for HttpDownloader<R> {
    #[tracing::instrument(skip(self, dest))]
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let result = self
            .http_client
            .download_file(url, || {
                self.runtime
                    .create_executable(dest)
                    .with_context(|| format!("Failed to create {:?}", dest))
            })
            .await;

        if result.is_err() && self.runtime.exists(dest) {
            debug!("Removing partial download {:?}", dest);
            if let Err(e) = self.runtime.remove_file(dest) {
                warn!("Failed to remove partial download {:?}: {}", dest, e);
            }
        }

        result
    }
}
