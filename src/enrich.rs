// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Enrichment orchestrator for the hook manifest.
///
/// A run passes through an optional schema gate and then a per-entry loop.
/// The gate is fatal: a malformed payload produces an empty result with one
/// synthetic failure and no fetches. Inside the loop, validation and fetch
/// failures are recorded as data and never stop the remaining entries.
/// Entries are processed strictly one at a time; the next fetch starts only
/// after the previous one has resolved.
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    github::MetadataFetcher,
    manifest::{ManifestSource, RawManifestSource},
    schema::{SchemaValidation, validate_manifest_schema},
    types::{Hook, ManifestEntry},
    validate::validate_manifest_entry,
};

/// Summary reported when the schema gate rejects the manifest.
pub const SCHEMA_FAILURE_SUMMARY: &str = "Enriched 0/0 hooks; manifest schema validation failed";

/// Entry that could not be turned into a [`Hook`].
#[derive(Debug, Serialize, Clone, PartialEq, Eq,)]
pub struct EnrichmentFailure
{
    /// Manifest row as read, or an empty row for the synthetic schema failure.
    pub entry: ManifestEntry,
    /// Failure message.
    pub error: String,
}

/// Reachability of one repository link that reached the fetch stage.
#[derive(Debug, Serialize, Clone, PartialEq, Eq,)]
pub struct LinkValidationResult
{
    /// Repository URL from the manifest.
    pub url:       String,
    /// `true` when metadata was fetched successfully.
    pub reachable: bool,
    /// Fetch failure message for unreachable links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:     Option<String,>,
}

impl LinkValidationResult
{
    fn reachable(url: &str,) -> Self
    {
        Self {
            url:       url.to_owned(),
            reachable: true,
            error:     None,
        }
    }

    fn unreachable(url: &str, error: &str,) -> Self
    {
        Self {
            url:       url.to_owned(),
            reachable: false,
            error:     Some(error.to_owned(),),
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Serialize, Clone, PartialEq, Eq,)]
#[serde(rename_all = "camelCase")]
pub struct EnrichManifestOutput
{
    /// Enriched records in manifest order.
    pub hooks:              Vec<Hook,>,
    /// Entries that failed validation or fetching, in manifest order.
    pub failures:           Vec<EnrichmentFailure,>,
    /// One result per entry that passed validation, in manifest order.
    pub validation_results: Vec<LinkValidationResult,>,
    /// Operator-facing summary line.
    pub summary:            String,
}

impl EnrichManifestOutput
{
    fn schema_failure(errors: &[String],) -> Self
    {
        Self {
            hooks:              Vec::new(),
            failures:           vec![EnrichmentFailure {
                entry: ManifestEntry::default(),
                error: format!("Manifest schema validation failed: {}", errors.join("; ")),
            }],
            validation_results: Vec::new(),
            summary:            SCHEMA_FAILURE_SUMMARY.to_owned(),
        }
    }

    /// Number of links that reached the fetch stage and failed.
    pub fn unreachable_count(&self,) -> usize
    {
        self.validation_results.iter().filter(|result| !result.reachable,).count()
    }
}

/// Formats the summary line.
///
/// `link_counts` carries `(validated, unreachable)` when the schema gate ran
/// and selects the long form; `None` selects the legacy short form.
///
/// # Examples
///
/// ```
/// use hookhub::format_summary;
///
/// assert_eq!(format_summary(1, 2, None), "Enriched 1/2 hooks; 1 failed");
/// assert_eq!(
///     format_summary(1, 2, Some((2, 1))),
///     "Enriched 1/2 hooks; 1 failed. Validated 2 repo links; 1 unreachable"
/// );
/// ```
pub fn format_summary(enriched: usize, total: usize, link_counts: Option<(usize, usize,),>,) -> String
{
    let failed = total.saturating_sub(enriched,);
    let base = format!("Enriched {enriched}/{total} hooks; {failed} failed");

    match link_counts {
        Some((validated, unreachable,),) => {
            format!("{base}. Validated {validated} repo links; {unreachable} unreachable")
        }
        None => base,
    }
}

/// Runs the enrichment pipeline.
///
/// When `raw` is supplied, the raw payload passes through the schema gate
/// first and the summary uses the long form. Without it the gate is skipped
/// and the legacy short summary is produced.
///
/// # Errors
///
/// Read failures from either source propagate unchanged. Validation and
/// fetch failures never produce an `Err`; they are reported in
/// [`EnrichManifestOutput::failures`].
///
/// # Example
///
/// ```no_run
/// use hookhub::{GitHubClient, ManifestFile, RawManifestSource, enrich_manifest};
///
/// # async fn example() -> Result<(), hookhub::Error> {
/// let manifest = ManifestFile::new("data/hooks.json",);
/// let client = GitHubClient::new(None,)?;
/// let output =
///     enrich_manifest(&manifest, Some(&manifest as &dyn RawManifestSource,), &client,).await?;
/// println!("{}", output.summary);
/// # Ok(())
/// # }
/// ```
pub async fn enrich_manifest<M, F,>(
    manifest: &M,
    raw: Option<&dyn RawManifestSource,>,
    fetcher: &F,
) -> Result<EnrichManifestOutput, Error,>
where
    M: ManifestSource + ?Sized,
    F: MetadataFetcher,
{
    let schema_checked = match raw {
        Some(raw,) => {
            let payload = raw.read_raw()?;
            if let SchemaValidation::Invalid(errors,) = validate_manifest_schema(&payload,) {
                warn!("Manifest schema validation failed with {} error(s)", errors.len());
                return Ok(EnrichManifestOutput::schema_failure(&errors,),);
            }
            true
        }
        None => false,
    };

    let entries = manifest.read_entries()?;
    info!("Enriching {} manifest entries", entries.len());

    let mut hooks = Vec::with_capacity(entries.len(),);
    let mut failures = Vec::new();
    let mut validation_results = Vec::with_capacity(entries.len(),);

    for entry in &entries {
        let validation = validate_manifest_entry(entry,);
        let classification = entry.classification().filter(|_| validation.valid,);
        let Some((category, event,),) = classification else {
            let error = format!("Manifest validation failed: {}", validation.errors.join("; "));
            warn!("{}: {}", entry.name, error);
            failures.push(EnrichmentFailure {
                entry: entry.clone(),
                error,
            },);
            continue;
        };

        debug!("Fetching metadata for {} ({})", entry.name, entry.github_repo_url);
        match fetcher.fetch_metadata(&entry.github_repo_url,).await {
            Ok(metadata,) => {
                hooks.push(Hook::new(entry, category, event, metadata,),);
                validation_results.push(LinkValidationResult::reachable(&entry.github_repo_url,),);
            }
            Err(error,) => {
                match error.status() {
                    Some(status,) => warn!(
                        "{}: {} is unreachable (HTTP {}): {}",
                        entry.name, entry.github_repo_url, status, error
                    ),
                    None if error.is_local() => warn!("{}: {}", entry.name, error),
                    None => {
                        warn!("{}: {} is unreachable: {}", entry.name, entry.github_repo_url, error)
                    }
                }
                let error = error.to_string();
                validation_results.push(LinkValidationResult::unreachable(
                    &entry.github_repo_url,
                    &error,
                ),);
                failures.push(EnrichmentFailure {
                    entry: entry.clone(),
                    error,
                },);
            }
        }
    }

    let mut output = EnrichManifestOutput {
        hooks,
        failures,
        validation_results,
        summary: String::new(),
    };
    let link_counts =
        schema_checked.then(|| (output.validation_results.len(), output.unreachable_count(),),);
    output.summary = format_summary(output.hooks.len(), entries.len(), link_counts,);
    info!("{}", output.summary);

    Ok(output,)
}

#[cfg(test)]
mod tests
{
    use std::{
        cell::{Cell, RefCell},
        collections::HashMap,
        io,
        sync::{Arc, Mutex},
    };

    use serde_json::{Value, json};
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::{
        error::FetchError,
        types::{GitHubMetadata, LifecycleEvent, PurposeCategory},
    };

    /// Scripted fetcher that records call order and concurrency.
    #[derive(Default,)]
    struct ScriptedFetcher
    {
        failures:  HashMap<String, FetchError,>,
        events:    RefCell<Vec<String,>,>,
        in_flight: Cell<usize,>,
        peak:      Cell<usize,>,
    }

    impl ScriptedFetcher
    {
        fn failing(mut self, url: &str, error: FetchError,) -> Self
        {
            self.failures.insert(url.to_owned(), error,);
            self
        }

        fn calls(&self,) -> Vec<String,>
        {
            self.events
                .borrow()
                .iter()
                .filter_map(|event| event.strip_prefix("start ",),)
                .map(str::to_owned,)
                .collect()
        }
    }

    impl MetadataFetcher for ScriptedFetcher
    {
        async fn fetch_metadata(&self, url: &str,) -> Result<GitHubMetadata, FetchError,>
        {
            self.events.borrow_mut().push(format!("start {url}"),);
            self.in_flight.set(self.in_flight.get() + 1,);
            self.peak.set(self.peak.get().max(self.in_flight.get(),),);

            tokio::task::yield_now().await;

            self.in_flight.set(self.in_flight.get() - 1,);
            self.events.borrow_mut().push(format!("end {url}"),);

            match self.failures.get(url,) {
                Some(error,) => Err(error.clone(),),
                None => Ok(GitHubMetadata {
                    description:  "A great hook".to_owned(),
                    stars_count:  42,
                    last_updated: "2026-01-15T00:00:00Z".to_owned(),
                },),
            }
        }
    }

    /// In-memory log sink for asserting on emitted lines.
    #[derive(Clone, Default,)]
    struct CapturedLogs(Arc<Mutex<Vec<u8,>,>,>,);

    impl CapturedLogs
    {
        fn contents(&self,) -> String
        {
            String::from_utf8(self.0.lock().expect("log buffer poisoned",).clone(),)
                .expect("logs are UTF-8",)
        }
    }

    impl io::Write for CapturedLogs
    {
        fn write(&mut self, buf: &[u8],) -> io::Result<usize,>
        {
            self.0.lock().expect("log buffer poisoned",).extend_from_slice(buf,);
            Ok(buf.len(),)
        }

        fn flush(&mut self,) -> io::Result<(),>
        {
            Ok((),)
        }
    }

    impl<'a,> MakeWriter<'a,> for CapturedLogs
    {
        type Writer = Self;

        fn make_writer(&'a self,) -> Self::Writer
        {
            self.clone()
        }
    }

    struct UnreadableManifest;

    impl ManifestSource for UnreadableManifest
    {
        fn read_entries(&self,) -> Result<Vec<ManifestEntry,>, Error,>
        {
            Err(crate::error::io_error(
                std::path::Path::new("data/hooks.json",),
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing",),
            ),)
        }
    }

    fn entry(name: &str, url: &str,) -> ManifestEntry
    {
        ManifestEntry {
            name:             name.to_owned(),
            github_repo_url:  url.to_owned(),
            purpose_category: "Safety".to_owned(),
            lifecycle_event:  "PreToolUse".to_owned(),
        }
    }

    fn raw_of(entries: &[ManifestEntry],) -> Value
    {
        serde_json::to_value(entries,).expect("entries should serialize",)
    }

    #[tokio::test]
    async fn single_entry_produces_exact_summary()
    {
        let entries = vec![entry("test-hook", "https://github.com/owner/repo",)];
        let raw = raw_of(&entries,);
        let fetcher = ScriptedFetcher::default();

        let output = enrich_manifest(&entries, Some(&raw,), &fetcher,).await.expect("run failed",);

        assert_eq!(output.hooks.len(), 1);
        assert!(output.failures.is_empty());
        assert_eq!(output.summary, "Enriched 1/1 hooks; 0 failed. Validated 1 repo links; 0 unreachable");

        let hook = &output.hooks[0];
        assert_eq!(hook.name, "test-hook");
        assert_eq!(hook.purpose_category, PurposeCategory::Safety);
        assert_eq!(hook.lifecycle_event, LifecycleEvent::PreToolUse);
        assert_eq!(hook.description, "A great hook");
        assert_eq!(hook.stars_count, 42);
        assert_eq!(hook.last_updated, "2026-01-15T00:00:00Z");
        assert_eq!(output.validation_results, vec![LinkValidationResult {
            url:       "https://github.com/owner/repo".to_owned(),
            reachable: true,
            error:     None,
        }]);
    }

    #[tokio::test]
    async fn partial_fetch_failure_is_counted()
    {
        let entries = vec![
            entry("first", "https://github.com/owner/repo1",),
            entry("second", "https://github.com/owner/repo2",),
        ];
        let raw = raw_of(&entries,);
        let fetcher = ScriptedFetcher::default().failing(
            "https://github.com/owner/repo2",
            FetchError::NotFound {
                repository: "owner/repo2".to_owned(),
            },
        );

        let output = enrich_manifest(&entries, Some(&raw,), &fetcher,).await.expect("run failed",);

        assert_eq!(output.hooks.len(), 1);
        assert_eq!(output.failures.len(), 1);
        assert!(output.failures[0].error.contains("404"));
        assert_eq!(output.failures[0].entry.name, "second");
        assert_eq!(output.summary, "Enriched 1/2 hooks; 1 failed. Validated 2 repo links; 1 unreachable");
        assert_eq!(output.unreachable_count(), 1);
        assert_eq!(output.validation_results[1].error, Some(output.failures[0].error.clone()));
    }

    #[tokio::test]
    async fn invalid_entry_is_isolated_and_not_fetched()
    {
        let mut invalid = entry("broken", "https://github.com/owner/broken",);
        invalid.purpose_category = "Mystery".to_owned();
        let entries = vec![
            entry("zero", "https://github.com/owner/zero",),
            invalid,
            entry("two", "https://github.com/owner/two",),
        ];
        let fetcher = ScriptedFetcher::default();

        let output = enrich_manifest(&entries, None, &fetcher,).await.expect("run failed",);

        assert_eq!(fetcher.calls(), vec![
            "https://github.com/owner/zero".to_owned(),
            "https://github.com/owner/two".to_owned(),
        ]);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].entry.name, "broken");
        assert!(output.failures[0].error.starts_with("Manifest validation failed: "));
        assert!(output.failures[0].error.contains("purposeCategory"));
        assert_eq!(output.validation_results.len(), 2);
        assert_eq!(output.hooks.iter().map(|h| h.name.as_str()).collect::<Vec<_>>(), ["zero", "two"]);
    }

    #[tokio::test]
    async fn skipping_the_gate_uses_the_legacy_summary()
    {
        let entries = vec![
            entry("a", "https://github.com/owner/a",),
            entry("b", "https://github.com/owner/b",),
        ];
        let fetcher = ScriptedFetcher::default()
            .failing("https://github.com/owner/b", FetchError::RateLimited,);

        let output = enrich_manifest(&entries, None, &fetcher,).await.expect("run failed",);

        assert_eq!(output.summary, "Enriched 1/2 hooks; 1 failed");
        assert!(output.failures[0].error.contains("403"));
    }

    #[tokio::test]
    async fn wrong_typed_row_without_gate_is_recorded_as_a_failure()
    {
        let temp = tempfile::tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("hooks.json",);
        let json = r#"[
  { "name": "first", "githubRepoUrl": "https://github.com/owner/first",
    "purposeCategory": "Safety", "lifecycleEvent": "PreToolUse" },
  { "name": 42, "githubRepoUrl": "https://github.com/owner/typed",
    "purposeCategory": null, "lifecycleEvent": "Stop" },
  { "name": "third", "githubRepoUrl": "https://github.com/owner/third",
    "purposeCategory": "Testing", "lifecycleEvent": "PostToolUse" }
]"#;
        std::fs::write(&path, json,).expect("failed to write manifest",);
        let manifest = crate::manifest::ManifestFile::new(&path,);
        let fetcher = ScriptedFetcher::default();

        let output = enrich_manifest(&manifest, None, &fetcher,).await.expect("run failed",);

        assert_eq!(fetcher.calls(), vec![
            "https://github.com/owner/first".to_owned(),
            "https://github.com/owner/third".to_owned(),
        ]);
        assert_eq!(output.hooks.len(), 2);
        assert_eq!(output.failures.len(), 1);
        let error = &output.failures[0].error;
        assert!(error.starts_with("Manifest validation failed: "));
        assert!(error.contains("name is required and must be a string"));
        assert!(error.contains("purposeCategory \"null\" is not valid"));
        assert_eq!(output.summary, "Enriched 2/3 hooks; 1 failed");
    }

    #[tokio::test]
    async fn failure_logs_name_the_entry()
    {
        let logs = CapturedLogs::default();
        let subscriber =
            tracing_subscriber::fmt().with_writer(logs.clone(),).with_ansi(false,).finish();
        let _guard = tracing::subscriber::set_default(subscriber,);

        let mut invalid = entry("broken", "https://github.com/owner/broken",);
        invalid.lifecycle_event = "Never".to_owned();
        let entries = vec![entry("missing", "https://github.com/owner/missing",), invalid];
        let fetcher = ScriptedFetcher::default().failing(
            "https://github.com/owner/missing",
            FetchError::NotFound {
                repository: "owner/missing".to_owned(),
            },
        );

        enrich_manifest(&entries, None, &fetcher,).await.expect("run failed",);

        let text = logs.contents();
        assert!(
            text.contains("missing: https://github.com/owner/missing is unreachable (HTTP 404)"),
            "{text}"
        );
        assert!(text.contains("broken: Manifest validation failed: lifecycleEvent"), "{text}");
    }

    #[tokio::test]
    async fn fetches_run_strictly_in_sequence()
    {
        let entries: Vec<ManifestEntry,> = (0..5)
            .map(|index| entry(&format!("hook-{index}"), &format!("https://github.com/owner/r{index}"),),)
            .collect();
        let fetcher = ScriptedFetcher::default();

        enrich_manifest(&entries, None, &fetcher,).await.expect("run failed",);

        let expected: Vec<String,> = (0..5)
            .flat_map(|index| {
                let url = format!("https://github.com/owner/r{index}");
                [format!("start {url}"), format!("end {url}")]
            },)
            .collect();
        assert_eq!(*fetcher.events.borrow(), expected);
        assert_eq!(fetcher.peak.get(), 1);
    }

    #[tokio::test]
    async fn inputs_are_not_mutated()
    {
        let mut invalid = entry("", "https://gitlab.com/owner/x",);
        invalid.lifecycle_event = "Never".to_owned();
        let entries = vec![entry("ok", "https://github.com/owner/ok",), invalid];
        let raw = raw_of(&entries,);
        let entries_snapshot = entries.clone();
        let raw_snapshot = raw.clone();

        enrich_manifest(&entries, Some(&raw,), &ScriptedFetcher::default(),)
            .await
            .expect("run failed",);

        assert_eq!(entries, entries_snapshot);
        assert_eq!(raw, raw_snapshot);
    }

    #[tokio::test]
    async fn schema_gate_short_circuits_on_empty_manifest()
    {
        let raw = json!([]);
        let fetcher = ScriptedFetcher::default();
        let entries = vec![entry("never-read", "https://github.com/owner/never",)];

        let output = enrich_manifest(&entries, Some(&raw,), &fetcher,).await.expect("run failed",);

        assert!(output.hooks.is_empty());
        assert!(output.validation_results.is_empty());
        assert_eq!(output.failures.len(), 1);
        assert!(output.failures[0].error.contains("empty"));
        assert_eq!(output.failures[0].entry, ManifestEntry::default());
        assert_eq!(output.summary, SCHEMA_FAILURE_SUMMARY);
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn schema_gate_joins_all_errors_into_one_failure()
    {
        let raw = json!([
            { "name": "a", "githubRepoUrl": "https://github.com/o/a",
              "purposeCategory": "Safety", "lifecycleEvent": "Stop" },
            { "name": "a", "githubRepoUrl": "https://github.com/o/a",
              "purposeCategory": "Safety", "lifecycleEvent": "Stop" },
            42,
        ]);
        let fetcher = ScriptedFetcher::default();

        let output = enrich_manifest(&UnreadableManifest, Some(&raw,), &fetcher,)
            .await
            .expect("gate failure is not an error",);

        assert_eq!(output.failures.len(), 1);
        let message = &output.failures[0].error;
        assert!(message.starts_with("Manifest schema validation failed: "));
        assert!(message.contains("Entry [1]: duplicate"));
        assert!(message.contains("; Entry [2]: must be an object"));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn read_errors_propagate()
    {
        let raw = raw_of(&[entry("a", "https://github.com/o/a",)],);
        let error = enrich_manifest(&UnreadableManifest, Some(&raw,), &ScriptedFetcher::default(),)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Io { .. }));
    }

    #[tokio::test]
    async fn local_url_rejections_count_as_unreachable()
    {
        let entries = vec![entry("owner-only", "https://github.com/owner",)];
        let raw = raw_of(&entries,);
        let fetcher = ScriptedFetcher::default().failing(
            "https://github.com/owner",
            FetchError::MissingRepository {
                url: "https://github.com/owner".to_owned(),
            },
        );

        let output = enrich_manifest(&entries, Some(&raw,), &fetcher,).await.expect("run failed",);

        assert_eq!(output.summary, "Enriched 0/1 hooks; 1 failed. Validated 1 repo links; 1 unreachable");
        assert!(!output.validation_results[0].reachable);
    }

    #[test]
    fn summary_saturates_when_counts_disagree()
    {
        assert_eq!(format_summary(3, 2, None), "Enriched 3/2 hooks; 0 failed");
    }

    #[test]
    fn link_result_omits_error_when_reachable()
    {
        let value = serde_json::to_value(LinkValidationResult::reachable("https://github.com/o/r",),)
            .expect("result should serialize",);
        assert_eq!(value, json!({ "url": "https://github.com/o/r", "reachable": true }));
    }
}
