// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Whole-manifest schema gate applied to the raw JSON payload.
//!
//! The gate inspects the payload before any type is assumed. Structural
//! failures (not an array, empty array) stop inspection immediately; all
//! per-entry problems are collected across the whole payload so an operator
//! can fix a manifest in one pass.

use std::collections::HashSet;

use serde_json::Value;

use crate::{types::ManifestEntry, validate::EntryFields};

/// Result of running the schema gate over a raw payload.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum SchemaValidation
{
    /// Payload is well-formed; entries are returned typed and in order.
    Valid(Vec<ManifestEntry,>,),
    /// Payload is malformed; every detected problem is listed.
    Invalid(Vec<String,>,),
}

impl SchemaValidation
{
    /// Returns `true` for [`SchemaValidation::Valid`].
    pub fn is_valid(&self,) -> bool
    {
        matches!(self, Self::Valid(_,))
    }

    /// Returns the collected errors, empty for a valid payload.
    pub fn errors(&self,) -> &[String]
    {
        match self {
            Self::Valid(_,) => &[],
            Self::Invalid(errors,) => errors,
        }
    }
}

/// Validates the raw manifest payload as a whole.
///
/// # Examples
///
/// ```
/// use hookhub::{SchemaValidation, validate_manifest_schema};
/// use serde_json::json;
///
/// let outcome = validate_manifest_schema(&json!([]));
/// assert_eq!(outcome, SchemaValidation::Invalid(vec!["Manifest must not be empty".to_owned()]));
/// ```
pub fn validate_manifest_schema(payload: &Value,) -> SchemaValidation
{
    let Some(items,) = payload.as_array() else {
        return SchemaValidation::Invalid(vec!["Manifest must be an array".to_owned()],);
    };

    if items.is_empty() {
        return SchemaValidation::Invalid(vec!["Manifest must not be empty".to_owned()],);
    }

    let mut errors = Vec::new();
    let mut seen_urls = HashSet::with_capacity(items.len(),);

    for (index, item,) in items.iter().enumerate() {
        let prefix = format!("Entry [{index}]");

        let Some(object,) = item.as_object() else {
            errors.push(format!("{prefix}: must be an object"),);
            continue;
        };

        let fields = EntryFields::from_object(object,);
        for message in fields.identity_errors() {
            errors.push(format!("{prefix}: {message}"),);
        }
        if let Some(url,) = fields.url()
            && !seen_urls.insert(url,)
        {
            errors.push(format!("{prefix}: duplicate githubRepoUrl \"{url}\""),);
        }
        for message in fields.classification_errors() {
            errors.push(format!("{prefix}: {message}"),);
        }
    }

    if !errors.is_empty() {
        return SchemaValidation::Invalid(errors,);
    }

    items
        .iter()
        .map(|item| serde_json::from_value::<ManifestEntry,>(item.clone(),),)
        .collect::<Result<Vec<_,>, _,>>()
        .map_or_else(
            |error| SchemaValidation::Invalid(vec![format!("Manifest could not be decoded: {error}")],),
            SchemaValidation::Valid,
        )
}
