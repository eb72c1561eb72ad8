// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Persistence of the enriched artifact.
///
/// A run that enriches nothing must not wipe out a previously good artifact,
/// so an empty result leaves a non-empty existing file in place.
use std::{fs, path::Path};

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{self, Error},
    types::Hook,
};

/// What [`write_hooks`] did with the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum WriteOutcome
{
    /// The artifact now holds `count` hooks.
    Written
    {
        /// Number of hooks written.
        count: usize,
    },
    /// Nothing was enriched and the existing artifact was kept.
    Preserved
    {
        /// Number of hooks in the kept artifact.
        existing: usize,
    },
}

/// Writes `hooks` to `path` as pretty-printed JSON.
///
/// Parent directories are created as needed. When `hooks` is empty and `path`
/// already holds a non-empty JSON array, the file is left untouched.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory or file cannot be written and
/// [`Error::Serialize`] when encoding fails.
pub fn write_hooks(path: &Path, hooks: &[Hook],) -> Result<WriteOutcome, Error,>
{
    if hooks.is_empty()
        && let Some(existing,) = existing_hook_count(path,).filter(|count| *count > 0,)
    {
        warn!("No hooks were enriched; keeping {} existing hooks in {}", existing, path.display());
        return Ok(WriteOutcome::Preserved {
            existing,
        },);
    }

    if let Some(parent,) = path.parent().filter(|parent| !parent.as_os_str().is_empty(),) {
        fs::create_dir_all(parent,).map_err(|source| error::io_error(parent, source,),)?;
    }

    let mut contents = serde_json::to_string_pretty(hooks,)?;
    contents.push('\n',);
    fs::write(path, contents,).map_err(|source| error::io_error(path, source,),)?;

    info!("Wrote {} hooks to {}", hooks.len(), path.display());
    Ok(WriteOutcome::Written {
        count: hooks.len(),
    },)
}

/// Length of the JSON array stored at `path`, if it holds one.
fn existing_hook_count(path: &Path,) -> Option<usize,>
{
    let contents = fs::read_to_string(path,).ok()?;
    match serde_json::from_str::<Value,>(&contents,).ok()? {
        Value::Array(items,) => Some(items.len(),),
        _ => None,
    }
}
