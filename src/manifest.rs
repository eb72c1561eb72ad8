// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Readers for the curated hook manifest.
///
/// The orchestrator reads the manifest through two independent collaborators:
/// [`RawManifestSource`] hands the untyped payload to the schema gate and
/// [`ManifestSource`] hands typed entries to the per-entry loop.
/// [`ManifestFile`] implements both over a single JSON file.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{self, Error},
    types::ManifestEntry,
};

/// Supplies typed manifest entries.
pub trait ManifestSource
{
    /// Reads every entry in manifest order.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the manifest cannot be read or decoded.
    fn read_entries(&self,) -> Result<Vec<ManifestEntry,>, Error,>;
}

/// Supplies the manifest payload before any type is assumed.
pub trait RawManifestSource
{
    /// Reads the manifest as untyped JSON.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the manifest cannot be read or is not JSON.
    fn read_raw(&self,) -> Result<Value, Error,>;
}

/// Manifest stored as a JSON file on disk.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ManifestFile
{
    path: PathBuf,
}

impl ManifestFile
{
    /// Creates a reader for the manifest at `path`.
    pub fn new(path: impl Into<PathBuf,>,) -> Self
    {
        Self {
            path: path.into(),
        }
    }

    /// Location of the manifest.
    pub fn path(&self,) -> &Path
    {
        &self.path
    }
}

impl RawManifestSource for ManifestFile
{
    fn read_raw(&self,) -> Result<Value, Error,>
    {
        debug!("Reading manifest from {}", self.path.display());
        let contents =
            fs::read_to_string(&self.path,).map_err(|source| error::io_error(&self.path, source,),)?;
        serde_json::from_str(&contents,).map_err(|source| error::json_error(&self.path, source,),)
    }
}

impl ManifestSource for ManifestFile
{
    fn read_entries(&self,) -> Result<Vec<ManifestEntry,>, Error,>
    {
        let Value::Array(items,) = self.read_raw()? else {
            return Err(Error::validation(format!(
                "manifest at {} must be a JSON array",
                self.path.display()
            ),),);
        };

        // Rows that are not objects become empty entries and fail validation.
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(_,) => serde_json::from_value(item,)
                    .map_err(|source| error::json_error(&self.path, source,),),
                _ => Ok(ManifestEntry::default(),),
            },)
            .collect()
    }
}

impl ManifestSource for [ManifestEntry]
{
    fn read_entries(&self,) -> Result<Vec<ManifestEntry,>, Error,>
    {
        Ok(self.to_vec(),)
    }
}

impl ManifestSource for Vec<ManifestEntry,>
{
    fn read_entries(&self,) -> Result<Vec<ManifestEntry,>, Error,>
    {
        Ok(self.clone(),)
    }
}

impl RawManifestSource for Value
{
    fn read_raw(&self,) -> Result<Value, Error,>
    {
        Ok(self.clone(),)
    }
}
