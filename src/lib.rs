// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Validation and enrichment pipeline for the HookHub manifest.
//!
//! The library reads a hand-authored manifest of assistant hooks, checks it
//! against the catalog's schema, fetches live repository metadata from
//! GitHub for each valid entry, and writes the merged records as the
//! artifact the catalog renders. Per-entry problems are reported as data so a
//! single bad row never aborts a run. Fetches are issued strictly one at a
//! time to stay within unauthenticated API quotas.

mod catalog;
mod config;
mod enrich;
mod error;
mod format;
mod github;
mod manifest;
mod output;
mod schema;
mod types;
mod validate;

pub use catalog::{
    Catalog, EnrichedDataReader, FilterState, HookDataSource, filter_hooks, load_catalog,
};
pub use config::{
    DEFAULT_MANIFEST_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_SEED_PATH, PipelineConfig, load_config,
    parse_config,
};
pub use enrich::{
    EnrichManifestOutput, EnrichmentFailure, LinkValidationResult, SCHEMA_FAILURE_SUMMARY,
    enrich_manifest, format_summary,
};
pub use error::{Error, FetchError, io_error, json_error};
pub use format::format_stars_count;
pub use github::{
    DEFAULT_API_BASE, GITHUB_ACCEPT, GitHubClient, MetadataFetcher, RepoPath, api_headers,
    classify_status, parse_metadata,
};
pub use manifest::{ManifestFile, ManifestSource, RawManifestSource};
pub use output::{WriteOutcome, write_hooks};
pub use schema::{SchemaValidation, validate_manifest_schema};
pub use types::{
    GitHubMetadata, Hook, LifecycleEvent, ManifestEntry, PurposeCategory, UnknownVariant,
    is_valid_lifecycle_event, is_valid_purpose_category,
};
pub use validate::{GITHUB_HOST, ValidationResult, validate_manifest_entry};
