#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the enrichment pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Two error types live here. [`Error`] covers whole-run failures (unreadable
//! manifests, broken configuration, write failures) and is propagated to the
//! caller. [`FetchError`] covers a single metadata lookup; the orchestrator
//! turns it into data and keeps going.

use std::path::{Path, PathBuf};

/// Unified error type returned by the pipeline, readers, and CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors raised while reading or writing pipeline files.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// Location of the file being accessed.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps JSON decoding errors for manifest, artifact, and seed files.
    #[error("failed to parse JSON at {path:?}: {source}")]
    Manifest {
        /// Location of the document that failed to decode.
        path:   PathBuf,
        /// Source decoding error from serde_json.
        source: serde_json::Error
    },
    /// Wraps YAML decoding errors for the pipeline configuration.
    #[error("failed to parse configuration: {source}")]
    Config {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps serialization errors when writing the enriched artifact.
    #[error("failed to serialize hooks: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Returned when user input violates invariants.
    #[error("invalid input: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Service errors when constructing clients for external APIs.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// Intended for CLI contexts. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Config {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Manifest`] variant for a document that is not valid
/// JSON.
pub fn json_error(path: &Path, source: serde_json::Error) -> Error {
    Error::Manifest {
        path: path.to_path_buf(),
        source
    }
}

/// Classified failure of a single repository metadata lookup.
///
/// The `Display` output is the message recorded in enrichment failures and
/// link validation results, so every HTTP status variant includes the
/// numeric code verbatim.
#[derive(Debug, Clone, PartialEq, Eq, masterror::Error)]
pub enum FetchError {
    /// The URL could not be parsed at all.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// URL as supplied by the manifest.
        url: String
    },
    /// The URL points at a host other than `github.com`.
    #[error("Not a GitHub URL: {url}")]
    NotGitHub {
        /// URL as supplied by the manifest.
        url: String
    },
    /// The URL lacks an owner or repository path segment.
    #[error("GitHub URL must include owner/repo: {url}")]
    MissingRepository {
        /// URL as supplied by the manifest.
        url: String
    },
    /// GitHub answered 403, which in practice means the rate limit ran out.
    #[error("GitHub API rate limit exceeded (403). Use a GITHUB_TOKEN for higher limits.")]
    RateLimited,
    /// GitHub answered 404.
    #[error("GitHub API error: 404 Not Found for {repository}")]
    NotFound {
        /// `owner/repo` pair that was requested.
        repository: String
    },
    /// GitHub answered with a 5xx status.
    #[error("GitHub API error: {status} {reason} for {repository}")]
    Server {
        /// Numeric HTTP status code.
        status:     u16,
        /// Canonical reason phrase for the status.
        reason:     String,
        /// `owner/repo` pair that was requested.
        repository: String
    },
    /// Any other non-success status, including redirects.
    #[error("GitHub API error: {status} {reason} for {repository}")]
    Status {
        /// Numeric HTTP status code.
        status:     u16,
        /// Canonical reason phrase for the status.
        reason:     String,
        /// `owner/repo` pair that was requested.
        repository: String
    },
    /// The request never produced a response.
    #[error("{message}")]
    Network {
        /// Transport error message.
        message: String
    },
    /// GitHub answered 2xx with a body that is not a repository document.
    #[error("failed to decode GitHub response for {repository}: {message}")]
    Decode {
        /// `owner/repo` pair that was requested.
        repository: String,
        /// Decoder error message.
        message:    String
    }
}

impl FetchError {
    /// Returns the HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited => Some(403),
            Self::NotFound {
                ..
            } => Some(404),
            Self::Server {
                status, ..
            }
            | Self::Status {
                status, ..
            } => Some(*status),
            _ => None
        }
    }

    /// Returns `true` when the failure was detected before any request was
    /// issued.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::NotGitHub { .. } | Self::MissingRepository { .. }
        )
    }
}
