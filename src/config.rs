// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Pipeline configuration loaded from an optional YAML document.
//!
//! Every field has a default, so an empty document (or no document at all)
//! describes the standard repository layout. Command-line flags take
//! precedence over values read here.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::{self, Error},
    github::DEFAULT_API_BASE,
};

/// Default location of the hand-authored manifest.
pub const DEFAULT_MANIFEST_PATH: &str = "data/hooks.json";
/// Default location of the enriched artifact.
pub const DEFAULT_OUTPUT_PATH: &str = "data/enriched-hooks.json";
/// Default location of the curated seed data.
pub const DEFAULT_SEED_PATH: &str = "data/seed-hooks.json";

/// Settings for an enrichment run.
///
/// # Examples
///
/// ```
/// use hookhub::parse_config;
///
/// let config = parse_config("schema_validation: false\n",).expect("valid configuration",);
/// assert!(!config.schema_validation);
/// assert_eq!(config.manifest_path.to_str(), Some("data/hooks.json"));
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig
{
    /// Manifest to enrich.
    pub manifest_path:     PathBuf,
    /// Destination of the enriched artifact.
    pub output_path:       PathBuf,
    /// Fallback data for the catalog.
    pub seed_path:         PathBuf,
    /// Root of the GitHub REST API.
    pub api_base_url:      String,
    /// Whether the raw manifest passes through the schema gate.
    pub schema_validation: bool,
}

impl Default for PipelineConfig
{
    fn default() -> Self
    {
        Self {
            manifest_path:     PathBuf::from(DEFAULT_MANIFEST_PATH,),
            output_path:       PathBuf::from(DEFAULT_OUTPUT_PATH,),
            seed_path:         PathBuf::from(DEFAULT_SEED_PATH,),
            api_base_url:      DEFAULT_API_BASE.to_owned(),
            schema_validation: true,
        }
    }
}

impl PipelineConfig
{
    fn validate(self,) -> Result<Self, Error,>
    {
        for (field, path,) in [
            ("manifest_path", &self.manifest_path,),
            ("output_path", &self.output_path,),
            ("seed_path", &self.seed_path,),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::validation(format!("{field} must not be empty"),),);
            }
        }

        match Url::parse(&self.api_base_url,) {
            Ok(url,) if matches!(url.scheme(), "http" | "https") => Ok(self,),
            _ => Err(Error::validation(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            ),),),
        }
    }
}

/// Loads the pipeline configuration from a YAML file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and the errors of
/// [`parse_config`] otherwise.
pub fn load_config(path: &Path,) -> Result<PipelineConfig, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses the pipeline configuration from a YAML string.
///
/// # Errors
///
/// Returns [`Error::Config`] for malformed YAML or unknown keys and
/// [`Error::Validation`] for empty paths or an unusable API base URL.
pub fn parse_config(contents: &str,) -> Result<PipelineConfig, Error,>
{
    if contents.trim().is_empty() {
        return Ok(PipelineConfig::default(),);
    }

    let config: PipelineConfig = serde_yaml::from_str(contents,)?;
    config.validate()
}
