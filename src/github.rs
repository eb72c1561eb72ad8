// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Repository metadata lookups against the GitHub REST API.
///
/// The [`MetadataFetcher`] trait is the seam the enrichment orchestrator
/// depends on; [`GitHubClient`] is the production implementation built on
/// octocrab. Exactly one request is issued per call and octocrab's own retry
/// layer is disabled, so a failing repository costs one API call.
use std::{error::Error as StdError, fmt, future::Future};

use http::{
    HeaderMap, HeaderValue, StatusCode,
    header::{ACCEPT, AUTHORIZATION},
};
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{
    error::{Error, FetchError},
    types::GitHubMetadata,
    validate::GITHUB_HOST,
};

/// Base URI of the public GitHub REST API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Versioned media type requested from the REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Owner/repository pair resolved from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub struct RepoPath
{
    /// Account that owns the repository.
    pub owner:      String,
    /// Repository name.
    pub repository: String,
}

impl RepoPath
{
    /// Resolves a github.com URL into its owner and repository segments.
    ///
    /// Trailing slashes, deeper sub-paths, query strings, and fragments are
    /// ignored. No network access happens here.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for unparseable input,
    /// [`FetchError::NotGitHub`] for other hosts, and
    /// [`FetchError::MissingRepository`] when fewer than two non-empty path
    /// segments are present.
    ///
    /// # Examples
    ///
    /// ```
    /// use hookhub::RepoPath;
    ///
    /// let path = RepoPath::parse("https://github.com/octocat/hello/tree/main?tab=readme",)?;
    /// assert_eq!(path.api_route(), "/repos/octocat/hello");
    /// # Ok::<(), hookhub::FetchError>(())
    /// ```
    pub fn parse(url: &str,) -> Result<Self, FetchError,>
    {
        let parsed = Url::parse(url,).map_err(|_| FetchError::InvalidUrl {
            url: url.to_owned(),
        },)?;

        if parsed.host_str() != Some(GITHUB_HOST,) {
            return Err(FetchError::NotGitHub {
                url: url.to_owned(),
            },);
        }

        let mut segments =
            parsed.path_segments().into_iter().flatten().filter(|segment| !segment.is_empty(),);

        match (segments.next(), segments.next(),) {
            (Some(owner,), Some(repository,),) => Ok(Self {
                owner:      owner.to_owned(),
                repository: repository.to_owned(),
            },),
            _ => Err(FetchError::MissingRepository {
                url: url.to_owned(),
            },),
        }
    }

    /// Returns the REST route for the repository document.
    pub fn api_route(&self,) -> String
    {
        format!("/repos/{}/{}", self.owner, self.repository)
    }

    /// Returns the absolute endpoint below the provided API base.
    pub fn api_url(&self, base: &str,) -> String
    {
        format!("{}{}", base.trim_end_matches('/',), self.api_route())
    }
}

impl fmt::Display for RepoPath
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}/{}", self.owner, self.repository)
    }
}

/// Source of live repository metadata.
///
/// Implementations must resolve each call independently; the orchestrator
/// awaits one call before issuing the next.
pub trait MetadataFetcher
{
    /// Fetches description, star count, and last update for `url`.
    fn fetch_metadata(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<GitHubMetadata, FetchError,>,>;
}

/// Builds the headers attached to every metadata request.
///
/// The `Accept` header is always present. `Authorization` is added only for
/// a non-empty token.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the token contains bytes that cannot
/// appear in an HTTP header.
pub fn api_headers(token: Option<&str,>,) -> Result<HeaderMap, Error,>
{
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT,),);

    if let Some(token,) = token.filter(|value| !value.is_empty(),) {
        let value = HeaderValue::from_str(&format!("Bearer {token}"),).map_err(|_| {
            Error::validation("GitHub token contains characters not allowed in an HTTP header",)
        },)?;
        headers.insert(AUTHORIZATION, value,);
    }

    Ok(headers,)
}

/// Maps a non-success HTTP status to a classified fetch error.
pub fn classify_status(status: StatusCode, repo: &RepoPath,) -> FetchError
{
    let repository = repo.to_string();
    let reason = status.canonical_reason().unwrap_or_default().to_owned();

    match status {
        StatusCode::FORBIDDEN => FetchError::RateLimited,
        StatusCode::NOT_FOUND => FetchError::NotFound {
            repository,
        },
        _ if status.is_server_error() => FetchError::Server {
            status: status.as_u16(),
            reason,
            repository,
        },
        _ => FetchError::Status {
            status: status.as_u16(),
            reason,
            repository,
        },
    }
}

/// Subset of the repository document the catalog needs.
#[derive(Debug, Deserialize,)]
struct RepositoryDocument
{
    #[serde(default)]
    description:      Option<String,>,
    #[serde(default)]
    stargazers_count: Option<u64,>,
    #[serde(default)]
    updated_at:       Option<String,>,
}

/// Decodes a repository document, defaulting absent or null fields.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] when the body is not a JSON object with
/// the expected field types.
pub fn parse_metadata(body: &str, repo: &RepoPath,) -> Result<GitHubMetadata, FetchError,>
{
    let document: RepositoryDocument =
        serde_json::from_str(body,).map_err(|error| FetchError::Decode {
            repository: repo.to_string(),
            message:    error.to_string(),
        },)?;

    Ok(GitHubMetadata {
        description:  document.description.unwrap_or_default(),
        stars_count:  document.stargazers_count.unwrap_or_default(),
        last_updated: document.updated_at.unwrap_or_default(),
    },)
}

/// Builds a one-line transport failure from an error and its causes.
///
/// octocrab renders a captured backtrace after the first line of its own
/// message, so only the first line of each link in the chain is kept.
fn network_error(error: &(dyn StdError + 'static),) -> FetchError
{
    let mut parts = Vec::new();
    let mut current = Some(error,);
    while let Some(link,) = current {
        let text = link.to_string();
        if let Some(line,) = text.lines().map(str::trim,).find(|line| !line.is_empty(),)
            && parts.last() != Some(&line.to_owned(),)
        {
            parts.push(line.to_owned(),);
        }
        current = link.source();
    }

    FetchError::Network {
        message: parts.join(": ",),
    }
}

/// Octocrab-backed [`MetadataFetcher`].
#[derive(Clone,)]
pub struct GitHubClient
{
    octocrab: Octocrab,
    headers:  HeaderMap,
}

impl GitHubClient
{
    /// Creates a client for the public GitHub API.
    ///
    /// # Errors
    ///
    /// See [`GitHubClient::with_base_uri`].
    pub fn new(token: Option<&str,>,) -> Result<Self, Error,>
    {
        Self::with_base_uri(DEFAULT_API_BASE, token,)
    }

    /// Creates a client that sends requests to `base_uri`.
    ///
    /// No timeout is configured; a hung connection blocks the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] when the base URI is invalid or octocrab
    /// cannot be initialized, and [`Error::Validation`] for a malformed token.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hookhub::{GitHubClient, MetadataFetcher};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let token = std::env::var("GITHUB_TOKEN",).ok();
    /// let client = GitHubClient::new(token.as_deref(),)?;
    /// let metadata = client.fetch_metadata("https://github.com/rust-lang/rust",).await?;
    /// println!("{} stars", metadata.stars_count);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_base_uri(base_uri: &str, token: Option<&str,>,) -> Result<Self, Error,>
    {
        let headers = api_headers(token,)?;

        let octocrab = Octocrab::builder()
            .base_uri(base_uri,)
            .map_err(|e| Error::service(format!("invalid GitHub API base URI {base_uri}: {e}"),),)?
            .add_retry_config(RetryConfig::None,)
            .build()
            .map_err(|e| Error::service(format!("failed to initialize GitHub client: {e}"),),)?;

        Ok(Self {
            octocrab,
            headers,
        },)
    }

    /// Returns `true` when requests carry an `Authorization` header.
    pub fn is_authenticated(&self,) -> bool
    {
        self.headers.contains_key(AUTHORIZATION,)
    }
}

impl MetadataFetcher for GitHubClient
{
    async fn fetch_metadata(&self, url: &str,) -> Result<GitHubMetadata, FetchError,>
    {
        let repo = RepoPath::parse(url,)?;
        debug!("Fetching repository metadata for {}", repo);

        let response = self
            .octocrab
            ._get_with_headers(repo.api_route(), Some(self.headers.clone(),),)
            .await
            .map_err(|e| network_error(&e,),)?;

        let status = response.status();
        if !status.is_success() {
            debug!("GitHub answered {} for {}", status, repo);
            return Err(classify_status(status, &repo,),);
        }

        let body =
            self.octocrab.body_to_string(response,).await.map_err(|e| network_error(&e,),)?;

        parse_metadata(&body, &repo,)
    }
}
