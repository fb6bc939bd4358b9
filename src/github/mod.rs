//! GitHub repository identity and release download URLs.

mod repo;

pub use repo::GitHubRepo;

/// Host that serves release downloads unless overridden.
pub const DEFAULT_GITHUB_URL: &str = "https://github.com";

/// Base URL under which every asset of `tag` is published.
pub fn release_download_base(github_url: &str, repo: &GitHubRepo, tag: &str) -> String {
    format!(
        "{}/{}/{}/releases/download/{}",
        github_url.trim_end_matches('/'),
        repo.owner,
        repo.repo,
        tag
    )
}
