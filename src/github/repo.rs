use anyhow::{Result, anyhow};
use std::str::FromStr;

const GITHUB_HOST: &str = "github.com";

#[derive(Debug, PartialEq, Clone)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    /// Extract `owner/repo` from a repository URL such as
    /// `git+https://github.com/owner/repo.git` or `git@github.com:owner/repo.git`.
    pub fn from_repository_url(url: &str) -> Option<Self> {
        let start = url.find(GITHUB_HOST)? + GITHUB_HOST.len();
        let rest = &url[start..];
        let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('/'))?;
        let rest = rest.trim_end_matches('/');
        let rest = rest.strip_suffix(".git").unwrap_or(rest);
        rest.parse().ok()
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!("Invalid repository format. Expected 'owner/repo'."))
        } else {
            Ok(GitHubRepo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_repo_valid() {
        let repo = GitHubRepo::from_str("owner/repo").unwrap();
        assert_eq!(
            repo,
            GitHubRepo {
                owner: "owner".to_string(),
                repo: "repo".to_string()
            }
        );
    }

    #[test]
    fn test_parse_github_repo_invalid() {
        assert!(GitHubRepo::from_str("invalid").is_err());
        assert!(GitHubRepo::from_str("owner/").is_err());
        assert!(GitHubRepo::from_str("/repo").is_err());
        assert!(GitHubRepo::from_str("a/b/c").is_err());
        assert!(GitHubRepo::from_str("").is_err());
    }

    #[test]
    fn test_github_repo_display() {
        let repo = GitHubRepo {
            owner: "owner".to_string(),
            repo: "repo".to_string(),
        };
        assert_eq!(format!("{}", repo), "owner/repo");
    }

    #[test]
    fn test_from_repository_url_variants() {
        let expected = GitHubRepo {
            owner: "metasweep".to_string(),
            repo: "metasweep".to_string(),
        };
        for url in [
            "https://github.com/metasweep/metasweep",
            "https://github.com/metasweep/metasweep.git",
            "git+https://github.com/metasweep/metasweep.git",
            "git@github.com:metasweep/metasweep.git",
            "github.com/metasweep/metasweep/",
        ] {
            assert_eq!(
                GitHubRepo::from_repository_url(url),
                Some(expected.clone()),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_from_repository_url_rejects_other_shapes() {
        assert_eq!(GitHubRepo::from_repository_url(""), None);
        assert_eq!(
            GitHubRepo::from_repository_url("https://gitlab.com/owner/repo"),
            None
        );
        assert_eq!(
            GitHubRepo::from_repository_url("https://github.com/owner"),
            None
        );
        assert_eq!(
            GitHubRepo::from_repository_url("https://github.com/owner/repo/tree/main"),
            None
        );
    }
}
