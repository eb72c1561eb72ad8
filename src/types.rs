// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Domain types describing manifest entries and enriched hooks.
//!
//! The manifest is hand-authored, so [`ManifestEntry`] keeps the category and
//! lifecycle event as raw strings: a typo in one row must surface as a
//! validation error for that row rather than a decode failure for the whole
//! file. [`Hook`] is the validated, enriched counterpart and carries the
//! typed enumerations.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Closed set of purposes a hook can serve.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash,)]
pub enum PurposeCategory
{
    /// Guards against destructive tool calls.
    Safety,
    /// Automates repetitive follow-up work.
    Automation,
    /// Surfaces events to the user.
    Notification,
    /// Formats code after edits.
    Formatting,
    /// Runs tests in response to changes.
    Testing,
    /// Enforces security policy.
    Security,
    /// Records activity.
    Logging,
    /// Anything else.
    Custom,
}

impl PurposeCategory
{
    /// Every category in display order.
    pub const ALL: [Self; 8] = [
        Self::Safety,
        Self::Automation,
        Self::Notification,
        Self::Formatting,
        Self::Testing,
        Self::Security,
        Self::Logging,
        Self::Custom,
    ];

    /// Returns the canonical manifest spelling.
    pub const fn as_str(self,) -> &'static str
    {
        match self {
            Self::Safety => "Safety",
            Self::Automation => "Automation",
            Self::Notification => "Notification",
            Self::Formatting => "Formatting",
            Self::Testing => "Testing",
            Self::Security => "Security",
            Self::Logging => "Logging",
            Self::Custom => "Custom",
        }
    }
}

/// Closed set of assistant lifecycle events a hook can attach to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash,)]
pub enum LifecycleEvent
{
    /// Fires before a tool call runs.
    PreToolUse,
    /// Fires after a tool call completes.
    PostToolUse,
    /// Fires when the user submits a prompt.
    UserPromptSubmit,
    /// Fires when the assistant emits a notification.
    Notification,
    /// Fires when the assistant stops.
    Stop,
}

impl LifecycleEvent
{
    /// Every event in display order.
    pub const ALL: [Self; 5] = [
        Self::PreToolUse,
        Self::PostToolUse,
        Self::UserPromptSubmit,
        Self::Notification,
        Self::Stop,
    ];

    /// Returns the canonical manifest spelling.
    pub const fn as_str(self,) -> &'static str
    {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::Notification => "Notification",
            Self::Stop => "Stop",
        }
    }
}

/// Error returned when a string names no enumeration member.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct UnknownVariant
{
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for UnknownVariant
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "unknown variant \"{}\"", self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for PurposeCategory
{
    type Err = UnknownVariant;

    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == value,).ok_or_else(|| {
            UnknownVariant {
                value: value.to_owned(),
            }
        },)
    }
}

impl FromStr for LifecycleEvent
{
    type Err = UnknownVariant;

    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == value,).ok_or_else(|| {
            UnknownVariant {
                value: value.to_owned(),
            }
        },)
    }
}

impl fmt::Display for PurposeCategory
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

impl fmt::Display for LifecycleEvent
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

/// Returns `true` when `value` is a JSON string naming a [`PurposeCategory`].
///
/// Matching is exact: padded or differently-cased strings and non-string
/// values are rejected.
///
/// # Examples
///
/// ```
/// use hookhub::is_valid_purpose_category;
/// use serde_json::json;
///
/// assert!(is_valid_purpose_category(&json!("Safety")));
/// assert!(!is_valid_purpose_category(&json!("safety")));
/// assert!(!is_valid_purpose_category(&json!(42)));
/// ```
pub fn is_valid_purpose_category(value: &Value,) -> bool
{
    value.as_str().is_some_and(|name| name.parse::<PurposeCategory,>().is_ok(),)
}

/// Returns `true` when `value` is a JSON string naming a [`LifecycleEvent`].
pub fn is_valid_lifecycle_event(value: &Value,) -> bool
{
    value.as_str().is_some_and(|name| name.parse::<LifecycleEvent,>().is_ok(),)
}

/// Hand-authored manifest row awaiting enrichment.
///
/// Decoding never fails on a single field, so the entry validator can report
/// the problem for that row. Missing fields decode as empty strings. A
/// non-string `name` or `githubRepoUrl` also decodes as empty. A non-string
/// category or event decodes as its JSON rendering, which names no member.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq,)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry
{
    /// Display name of the hook.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name:             String,
    /// Repository URL on github.com; unique across the manifest.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub github_repo_url:  String,
    /// Raw purpose category as written in the manifest.
    #[serde(default, deserialize_with = "string_or_rendered")]
    pub purpose_category: String,
    /// Raw lifecycle event as written in the manifest.
    #[serde(default, deserialize_with = "string_or_rendered")]
    pub lifecycle_event:  String,
}

fn string_or_empty<'de, D,>(deserializer: D,) -> Result<String, D::Error,>
where
    D: Deserializer<'de,>,
{
    Ok(match Value::deserialize(deserializer,)? {
        Value::String(text,) => text,
        _ => String::new(),
    },)
}

fn string_or_rendered<'de, D,>(deserializer: D,) -> Result<String, D::Error,>
where
    D: Deserializer<'de,>,
{
    Ok(match Value::deserialize(deserializer,)? {
        Value::String(text,) => text,
        other => other.to_string(),
    },)
}

/// Live repository metadata fetched from GitHub.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq,)]
#[serde(rename_all = "camelCase")]
pub struct GitHubMetadata
{
    /// Repository description, empty when GitHub has none.
    pub description:  String,
    /// Stargazer count, zero when GitHub omits it.
    pub stars_count:  u64,
    /// Timestamp of the last repository update, empty when unknown.
    pub last_updated: String,
}

/// Enriched record rendered by the catalog.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq,)]
#[serde(rename_all = "camelCase")]
pub struct Hook
{
    /// Display name of the hook.
    pub name:             String,
    /// Repository URL on github.com.
    pub github_repo_url:  String,
    /// Purpose category.
    pub purpose_category: PurposeCategory,
    /// Lifecycle event.
    pub lifecycle_event:  LifecycleEvent,
    /// Repository description.
    pub description:      String,
    /// Stargazer count.
    pub stars_count:      u64,
    /// Timestamp of the last repository update.
    pub last_updated:     String,
}

impl ManifestEntry
{
    /// Returns the typed category and event when both name known members.
    pub fn classification(&self,) -> Option<(PurposeCategory, LifecycleEvent,),>
    {
        let category = self.purpose_category.parse().ok()?;
        let event = self.lifecycle_event.parse().ok()?;
        Some((category, event,),)
    }
}

impl Hook
{
    /// Merges a classified manifest entry with fetched metadata.
    pub fn new(
        entry: &ManifestEntry,
        purpose_category: PurposeCategory,
        lifecycle_event: LifecycleEvent,
        metadata: GitHubMetadata,
    ) -> Self
    {
        Self {
            name: entry.name.clone(),
            github_repo_url: entry.github_repo_url.clone(),
            purpose_category,
            lifecycle_event,
            description: metadata.description,
            stars_count: metadata.stars_count,
            last_updated: metadata.last_updated,
        }
    }
}
