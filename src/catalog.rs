// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Read side of the enriched artifact.
//!
//! The catalog loads hooks written by the pipeline, falls back to curated
//! seed data when no enrichment has happened yet, and offers the
//! category/event filtering used by the listing surfaces.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::{self, Error},
    types::{Hook, LifecycleEvent, PurposeCategory},
};

/// Supplies the full list of enriched hooks.
pub trait HookDataSource
{
    /// Returns every hook known to the source.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the backing data cannot be read.
    fn get_all(&self,) -> Result<Vec<Hook,>, Error,>;
}

impl HookDataSource for Vec<Hook,>
{
    fn get_all(&self,) -> Result<Vec<Hook,>, Error,>
    {
        Ok(self.clone(),)
    }
}

/// Reads the enriched artifact with an optional seed fallback.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct EnrichedDataReader
{
    path: PathBuf,
    seed: Option<PathBuf,>,
}

impl EnrichedDataReader
{
    /// Creates a reader for the artifact at `path` with no fallback.
    pub fn new(path: impl Into<PathBuf,>,) -> Self
    {
        Self {
            path: path.into(),
            seed: None,
        }
    }

    /// Uses `seed` when the artifact is missing or empty.
    pub fn with_seed(mut self, seed: impl Into<PathBuf,>,) -> Self
    {
        self.seed = Some(seed.into(),);
        self
    }

    fn read_seed(&self, seed: &Path,) -> Result<Vec<Hook,>, Error,>
    {
        info!(
            "Enriched data at {} is unavailable; using seed {}",
            self.path.display(),
            seed.display()
        );
        read_hooks(seed,)?.ok_or_else(|| {
            Error::validation(format!("seed data file not found at {}", seed.display()),)
        },)
    }
}

impl HookDataSource for EnrichedDataReader
{
    fn get_all(&self,) -> Result<Vec<Hook,>, Error,>
    {
        match (read_hooks(&self.path,)?, self.seed.as_deref(),) {
            (Some(hooks,), _,) if !hooks.is_empty() => Ok(hooks,),
            (_, Some(seed,),) => self.read_seed(seed,),
            (Some(hooks,), None,) => Ok(hooks,),
            (None, None,) => Err(Error::validation(format!(
                "enriched data file not found at {}. Run \"hookhub enrich\" first.",
                self.path.display()
            ),),),
        }
    }
}

/// Reads a JSON array of hooks, returning `None` when the file is absent.
fn read_hooks(path: &Path,) -> Result<Option<Vec<Hook,>,>, Error,>
{
    let contents = match fs::read_to_string(path,) {
        Ok(contents,) => contents,
        Err(source,) if source.kind() == ErrorKind::NotFound => return Ok(None,),
        Err(source,) => return Err(error::io_error(path, source,),),
    };
    debug!("Loaded {} bytes of hook data from {}", contents.len(), path.display());

    serde_json::from_str(&contents,).map(Some,).map_err(|source| error::json_error(path, source,),)
}

/// Hooks plus the filter vocabulary shown alongside them.
#[derive(Debug, Serialize, Clone, PartialEq, Eq,)]
#[serde(rename_all = "camelCase")]
pub struct Catalog
{
    /// Every hook in artifact order.
    pub hooks:       Vec<Hook,>,
    /// All purpose categories, in display order.
    pub categories:  Vec<PurposeCategory,>,
    /// All lifecycle events, in display order.
    pub events:      Vec<LifecycleEvent,>,
    /// Number of hooks.
    pub total_count: usize,
}

/// Loads the catalog from `source`.
///
/// # Errors
///
/// Propagates errors from [`HookDataSource::get_all`].
pub fn load_catalog<S,>(source: &S,) -> Result<Catalog, Error,>
where
    S: HookDataSource + ?Sized,
{
    let hooks = source.get_all()?;
    Ok(Catalog {
        total_count: hooks.len(),
        hooks,
        categories: PurposeCategory::ALL.to_vec(),
        events: LifecycleEvent::ALL.to_vec(),
    },)
}

/// Active catalog filters; `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct FilterState
{
    /// Category to keep.
    pub category: Option<PurposeCategory,>,
    /// Event to keep.
    pub event:    Option<LifecycleEvent,>,
}

impl FilterState
{
    /// Returns `true` when `hook` satisfies both filters.
    pub fn matches(&self, hook: &Hook,) -> bool
    {
        self.category.is_none_or(|category| hook.purpose_category == category,)
            && self.event.is_none_or(|event| hook.lifecycle_event == event,)
    }
}

/// Returns the hooks that satisfy `filters`, preserving order.
///
/// # Examples
///
/// ```
/// use hookhub::{FilterState, PurposeCategory, filter_hooks};
///
/// let filters = FilterState {
///     category: Some(PurposeCategory::Safety,),
///     event:    None,
/// };
/// assert!(filter_hooks(&[], &filters).is_empty());
/// ```
pub fn filter_hooks(hooks: &[Hook], filters: &FilterState,) -> Vec<Hook,>
{
    hooks.iter().filter(|hook| filters.matches(hook,),).cloned().collect()
}
