// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Field-level validation for manifest entries.
//!
//! The checks operate on untyped JSON values so that the same logic serves
//! both typed [`ManifestEntry`] rows and raw payload objects inspected by the
//! schema gate. Every check runs independently; a maximally broken entry
//! reports one error per broken field.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::types::{
    LifecycleEvent, ManifestEntry, PurposeCategory, is_valid_lifecycle_event,
    is_valid_purpose_category,
};

/// Host every repository URL must point at.
pub const GITHUB_HOST: &str = "github.com";

/// Outcome of validating a single manifest entry.
#[derive(Debug, Serialize, Clone, PartialEq, Eq,)]
pub struct ValidationResult
{
    /// `true` when `errors` is empty.
    pub valid:  bool,
    /// Human-readable messages naming each offending field.
    pub errors: Vec<String,>,
}

impl ValidationResult
{
    fn from_errors(errors: Vec<String,>,) -> Self
    {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Borrowed view over the four manifest fields of an untyped entry.
#[derive(Debug, Clone, Copy, Default,)]
pub(crate) struct EntryFields<'a,>
{
    pub name:             Option<&'a Value,>,
    pub github_repo_url:  Option<&'a Value,>,
    pub purpose_category: Option<&'a Value,>,
    pub lifecycle_event:  Option<&'a Value,>,
}

impl<'a,> EntryFields<'a,>
{
    pub(crate) fn from_object(object: &'a Map<String, Value,>,) -> Self
    {
        Self {
            name:             object.get("name",),
            github_repo_url:  object.get("githubRepoUrl",),
            purpose_category: object.get("purposeCategory",),
            lifecycle_event:  object.get("lifecycleEvent",),
        }
    }

    /// Returns the repository URL when it is a non-empty string.
    pub(crate) fn url(&self,) -> Option<&'a str,>
    {
        required_string(self.github_repo_url,)
    }

    /// Runs every field check and returns the collected messages.
    pub(crate) fn errors(&self,) -> Vec<String,>
    {
        let mut errors = self.identity_errors();
        errors.extend(self.classification_errors(),);
        errors
    }

    /// Checks the fields that identify the entry: `name` and `githubRepoUrl`.
    pub(crate) fn identity_errors(&self,) -> Vec<String,>
    {
        let mut errors = Vec::new();

        if required_string(self.name,).is_none() {
            errors.push("name is required and must be a string".to_owned(),);
        }

        if let Some(error,) = check_repo_url(self.github_repo_url,) {
            errors.push(error,);
        }

        errors
    }

    /// Checks the enumeration fields: `purposeCategory` and `lifecycleEvent`.
    pub(crate) fn classification_errors(&self,) -> Vec<String,>
    {
        let mut errors = Vec::new();

        if !self.purpose_category.is_some_and(is_valid_purpose_category,) {
            errors.push(format!(
                "purposeCategory \"{}\" is not valid. Must be one of: {}",
                describe(self.purpose_category),
                member_list(PurposeCategory::ALL.iter().map(|c| c.as_str(),),),
            ),);
        }

        if !self.lifecycle_event.is_some_and(is_valid_lifecycle_event,) {
            errors.push(format!(
                "lifecycleEvent \"{}\" is not valid. Must be one of: {}",
                describe(self.lifecycle_event),
                member_list(LifecycleEvent::ALL.iter().map(|e| e.as_str(),),),
            ),);
        }

        errors
    }
}

/// Validates one manifest entry, collecting every applicable error.
///
/// URLs must parse and point at exactly `github.com`; scheme and path depth
/// are not enforced here. The fetch boundary applies the stricter
/// owner/repository check.
///
/// # Examples
///
/// ```
/// use hookhub::{ManifestEntry, validate_manifest_entry};
///
/// let entry = ManifestEntry {
///     name:             "safe-rm".to_owned(),
///     github_repo_url:  "https://github.com/owner/safe-rm".to_owned(),
///     purpose_category: "Safety".to_owned(),
///     lifecycle_event:  "PreToolUse".to_owned(),
/// };
/// assert!(validate_manifest_entry(&entry).valid);
/// ```
pub fn validate_manifest_entry(entry: &ManifestEntry,) -> ValidationResult
{
    let name = Value::String(entry.name.clone(),);
    let url = Value::String(entry.github_repo_url.clone(),);
    let category = Value::String(entry.purpose_category.clone(),);
    let event = Value::String(entry.lifecycle_event.clone(),);

    let fields = EntryFields {
        name:             Some(&name,),
        github_repo_url:  Some(&url,),
        purpose_category: Some(&category,),
        lifecycle_event:  Some(&event,),
    };

    ValidationResult::from_errors(fields.errors(),)
}

fn required_string(value: Option<&Value,>,) -> Option<&str,>
{
    value.and_then(Value::as_str,).filter(|text| !text.is_empty(),)
}

fn check_repo_url(value: Option<&Value,>,) -> Option<String,>
{
    let Some(raw,) = required_string(value,) else {
        return Some("githubRepoUrl is required and must be a string".to_owned(),);
    };

    match Url::parse(raw,) {
        Ok(url,) if url.host_str() == Some(GITHUB_HOST,) => None,
        Ok(_,) => Some(format!("githubRepoUrl must be a GitHub URL ({GITHUB_HOST})"),),
        Err(_,) => Some("githubRepoUrl must be a valid URL".to_owned(),),
    }
}

/// Renders an offending value for inclusion in an error message.
fn describe(value: Option<&Value,>,) -> String
{
    match value {
        None => "undefined".to_owned(),
        Some(Value::String(text,),) => text.clone(),
        Some(other,) => other.to_string(),
    }
}

fn member_list<'a,>(members: impl Iterator<Item = &'a str,>,) -> String
{
    members.collect::<Vec<_,>>().join(", ",)
}
