// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the HookHub pipeline.
//!
//! The CLI exposes subcommands for enriching the manifest with GitHub
//! metadata, checking the manifest against the schema without touching the
//! network, and printing the catalog built from the enriched artifact.

use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use hookhub::{
    Catalog, EnrichedDataReader, Error, FilterState, GitHubClient, LifecycleEvent, ManifestFile,
    PipelineConfig, PurposeCategory, RawManifestSource, SchemaValidation, WriteOutcome,
    enrich_manifest, filter_hooks, load_catalog, load_config, validate_manifest_schema,
    write_hooks,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line interface for the HookHub manifest pipeline.
#[derive(Debug, Parser,)]
#[command(name = "hookhub", version, about = "Validate and enrich the HookHub manifest")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Validate the manifest, fetch GitHub metadata, and write the artifact.
    Enrich(EnrichArgs,),
    /// Check the manifest against the schema without fetching anything.
    Validate(ValidateArgs,),
    /// Print the catalog built from the enriched artifact.
    Catalog(CatalogArgs,),
}

#[derive(Debug, Args, Default,)]
/// Arguments accepted by the `enrich` subcommand.
struct EnrichArgs
{
    /// Path to the YAML pipeline configuration.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Manifest to enrich, overriding the configuration.
    #[arg(long = "manifest", value_name = "PATH")]
    manifest: Option<PathBuf,>,

    /// Destination of the enriched artifact, overriding the configuration.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,

    /// Skip the whole-manifest schema gate.
    #[arg(long = "skip-schema", action = ArgAction::SetTrue)]
    skip_schema: bool,

    /// GitHub token used for authenticated requests.
    #[arg(long = "token", value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,
}

#[derive(Debug, Args,)]
struct ValidateArgs
{
    /// Manifest to check.
    #[arg(long = "manifest", value_name = "PATH", default_value = hookhub::DEFAULT_MANIFEST_PATH)]
    manifest: PathBuf,
}

#[derive(Debug, Args,)]
struct CatalogArgs
{
    /// Enriched artifact to read.
    #[arg(long = "data", value_name = "PATH", default_value = hookhub::DEFAULT_OUTPUT_PATH)]
    data: PathBuf,

    /// Seed data used when the artifact is missing or empty.
    #[arg(long = "seed", value_name = "PATH", default_value = hookhub::DEFAULT_SEED_PATH)]
    seed: PathBuf,

    /// Keep only hooks with this purpose category.
    #[arg(long = "category", value_name = "CATEGORY")]
    category: Option<PurposeCategory,>,

    /// Keep only hooks attached to this lifecycle event.
    #[arg(long = "event", value_name = "EVENT")]
    event: Option<LifecycleEvent,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Installs the stderr subscriber, honouring `RUST_LOG` and defaulting to
/// `info`.
fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    let _ = tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).try_init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates read, configuration, and write errors. Per-entry enrichment
/// failures are logged and do not produce an error.
async fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.command {
        Command::Enrich(args,) => run_enrich(args, &mut handle,).await,
        Command::Validate(args,) => run_validate(&args, &mut handle,),
        Command::Catalog(args,) => run_catalog(&args, &mut handle,),
    }
}

fn stdout_error(source: io::Error,) -> Error
{
    hookhub::io_error(Path::new("<stdout>",), source,)
}

/// Merges the configuration file with command-line overrides.
fn resolve_config(args: &EnrichArgs,) -> Result<PipelineConfig, Error,>
{
    let mut config = match args.config.as_deref() {
        Some(path,) => load_config(path,)?,
        None => PipelineConfig::default(),
    };

    if let Some(manifest,) = &args.manifest {
        config.manifest_path = manifest.clone();
    }
    if let Some(output,) = &args.output {
        config.output_path = output.clone();
    }
    if args.skip_schema {
        config.schema_validation = false;
    }

    Ok(config,)
}

async fn run_enrich<W: io::Write,>(args: EnrichArgs, writer: &mut W,) -> Result<(), Error,>
{
    let config = resolve_config(&args,)?;
    let token = args.token.as_deref().filter(|token| !token.is_empty(),);

    let client = GitHubClient::with_base_uri(&config.api_base_url, token,)?;
    if !client.is_authenticated() {
        info!("No GITHUB_TOKEN provided; using unauthenticated rate limits");
    }

    let manifest = ManifestFile::new(&config.manifest_path,);
    let raw = config.schema_validation.then_some(&manifest as &dyn RawManifestSource,);

    let output = enrich_manifest(&manifest, raw, &client,).await?;

    if !output.failures.is_empty() {
        warn!("{} manifest entries were not enriched", output.failures.len());
    }

    if let WriteOutcome::Preserved {
        existing,
    } = write_hooks(&config.output_path, &output.hooks,)?
    {
        warn!(
            "Kept {} previously enriched hooks in {}",
            existing,
            config.output_path.display()
        );
    }

    writeln!(writer, "{}", output.summary).map_err(stdout_error,)?;

    Ok((),)
}

/// Handles the `validate` subcommand.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the manifest violates the schema, in
/// addition to read errors.
fn run_validate<W: io::Write,>(args: &ValidateArgs, writer: &mut W,) -> Result<(), Error,>
{
    let payload = ManifestFile::new(&args.manifest,).read_raw()?;

    match validate_manifest_schema(&payload,) {
        SchemaValidation::Valid(entries,) => {
            writeln!(writer, "Manifest is valid ({} entries)", entries.len())
                .map_err(stdout_error,)?;
            Ok((),)
        }
        SchemaValidation::Invalid(errors,) => {
            for error in &errors {
                writeln!(writer, "{error}").map_err(stdout_error,)?;
            }
            Err(Error::validation(format!(
                "manifest {} has {} schema error(s)",
                args.manifest.display(),
                errors.len()
            ),),)
        }
    }
}

fn run_catalog<W: io::Write,>(args: &CatalogArgs, writer: &mut W,) -> Result<(), Error,>
{
    let reader = EnrichedDataReader::new(&args.data,).with_seed(&args.seed,);
    let mut catalog = load_catalog(&reader,)?;

    let filters = FilterState {
        category: args.category,
        event:    args.event,
    };
    catalog.hooks = filter_hooks(&catalog.hooks, &filters,);

    write_catalog(writer, &catalog, args.pretty,)
}

fn write_catalog<W: io::Write,>(writer: &mut W, catalog: &Catalog, pretty: bool,)
-> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, catalog,)?;
    } else {
        serde_json::to_writer(writer, catalog,)?;
    }

    Ok((),)
}
