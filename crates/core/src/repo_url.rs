//! GitHub repository reference parsing and normalization.
//!
//! User input arrives as a full URL (`https://github.com/Owner/Repo.git`)
//! or the bare `owner/repo` shorthand. Both normalize to a lowercase
//! `owner/repo` path, which is the persistence key for generated READMEs.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// The only code-hosting domain accepted.
pub const GITHUB_HOST: &str = "github.com";

/// Validation failures, worded for direct display next to the URL field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RepoUrlError {
    #[error("Your input is not a URL. Please enter a valid GitHub repo URL.")]
    NotAUrl,
    #[error("The URL provided is not a GitHub URL. It must start with https://github.com/")]
    NotGithub,
    #[error(
        "Could not parse the user/org and repo name. URL must be in the format \
         https://github.com/username/repo"
    )]
    MissingSegments,
}

/// A validated, normalized `owner/repo` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    owner: String,
    repo: String,
}

impl RepoRef {
    /// Parse user input into a repository reference.
    ///
    /// Accepts full GitHub URLs (extra path segments such as `/tree/main`
    /// are ignored) and the bare `owner/repo` shorthand. A trailing `.git`
    /// or `/` is stripped; the result is lowercased.
    pub fn parse(input: &str) -> Result<Self, RepoUrlError> {
        let input = input.trim();

        if !input.contains("://") {
            if let Some(reference) = Self::parse_shorthand(input) {
                return Ok(reference);
            }
            // Anything else without a scheme ("github.com/a/b", free text)
            // fails URL parsing below and reports NotAUrl.
        }

        let url = Url::parse(input).map_err(|_| RepoUrlError::NotAUrl)?;
        if url.host_str() != Some(GITHUB_HOST) {
            return Err(RepoUrlError::NotGithub);
        }

        let mut segments = url
            .path_segments()
            .ok_or(RepoUrlError::MissingSegments)?
            .filter(|s| !s.is_empty());
        let owner = segments.next().ok_or(RepoUrlError::MissingSegments)?;
        let repo = segments.next().ok_or(RepoUrlError::MissingSegments)?;

        Ok(Self::normalized(owner, repo))
    }

    fn parse_shorthand(input: &str) -> Option<Self> {
        let input = input.strip_suffix('/').unwrap_or(input);
        let (owner, repo) = input.split_once('/')?;
        let name_ok = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        (name_ok(owner) && name_ok(repo)).then(|| Self::normalized(owner, repo))
    }

    fn normalized(owner: &str, repo: &str) -> Self {
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        Self {
            owner: owner.to_lowercase(),
            repo: repo.to_lowercase(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// The normalized `owner/repo` persistence key.
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// The canonical https URL, handed to the packing service.
    pub fn url(&self) -> String {
        format!("https://{GITHUB_HOST}/{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_url() {
        let r = RepoRef::parse("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(r.owner(), "rust-lang");
        assert_eq!(r.repo(), "cargo");
        assert_eq!(r.path(), "rust-lang/cargo");
        assert_eq!(r.url(), "https://github.com/rust-lang/cargo");
    }

    #[test]
    fn normalizes_case_git_suffix_and_trailing_slash() {
        let r = RepoRef::parse("https://github.com/Tokio-RS/Tokio.git").unwrap();
        assert_eq!(r.path(), "tokio-rs/tokio");

        let r = RepoRef::parse("https://github.com/tokio-rs/tokio/").unwrap();
        assert_eq!(r.path(), "tokio-rs/tokio");
    }

    #[test]
    fn ignores_extra_path_segments() {
        let r = RepoRef::parse("https://github.com/rust-lang/cargo/tree/master/src").unwrap();
        assert_eq!(r.path(), "rust-lang/cargo");
    }

    #[test]
    fn accepts_owner_repo_shorthand() {
        let r = RepoRef::parse("Rust-Lang/Cargo").unwrap();
        assert_eq!(r.path(), "rust-lang/cargo");

        let r = RepoRef::parse("serde-rs/serde/").unwrap();
        assert_eq!(r.path(), "serde-rs/serde");
    }

    #[test]
    fn rejects_non_github_hosts() {
        assert_eq!(
            RepoRef::parse("https://gitlab.com/a/b"),
            Err(RepoUrlError::NotGithub)
        );
        assert_eq!(
            RepoRef::parse("https://www.github.com/a/b"),
            Err(RepoUrlError::NotGithub)
        );
    }

    #[test]
    fn rejects_missing_segments() {
        assert_eq!(
            RepoRef::parse("https://github.com"),
            Err(RepoUrlError::MissingSegments)
        );
        assert_eq!(
            RepoRef::parse("https://github.com/onlyowner"),
            Err(RepoUrlError::MissingSegments)
        );
    }

    #[test]
    fn rejects_non_urls() {
        assert_eq!(RepoRef::parse("not a url"), Err(RepoUrlError::NotAUrl));
        assert_eq!(
            RepoRef::parse("github.com/a/b"),
            Err(RepoUrlError::NotAUrl)
        );
    }

    #[test]
    fn error_messages_are_field_level_texts() {
        assert_eq!(
            RepoUrlError::NotGithub.to_string(),
            "The URL provided is not a GitHub URL. It must start with https://github.com/"
        );
        assert_eq!(
            RepoUrlError::NotAUrl.to_string(),
            "Your input is not a URL. Please enter a valid GitHub repo URL."
        );
        assert_eq!(
            RepoUrlError::MissingSegments.to_string(),
            "Could not parse the user/org and repo name. URL must be in the format \
             https://github.com/username/repo"
        );
    }
}
