// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the covbadge binary.
//!
//! The CLI renders single coverage or trend badges and drives the pull
//! request badge lifecycle: generation, inventory, cleanup and the closed-PR
//! hook. Structured results are written to stdout as JSON; diagnostics go to
//! stderr through `tracing`.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
    time::Duration
};

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use covbadge::{
    BadgeGenerator, BadgeStyle, BadgeType, Context, Error, PrBadgeConfig, PrBadgeManager,
    PrBadgeRequest, RenderOptions, Trend, badge_io_error
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::{signal, task};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line interface for coverage badge rendering.
#[derive(Debug, Parser)]
#[command(
    name = "covbadge",
    version,
    about = "Render coverage badges and manage pull request badge artifacts"
)]
struct Cli {
    /// Enables debug logging on stderr.
    #[arg(long = "verbose", short = 'v', global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command
}

#[derive(Debug, Subcommand)]
/// Supported commands exposed by the CLI.
enum Command {
    /// Render a single coverage badge.
    Badge(BadgeArgs),
    /// Render a trend badge comparing two coverage values.
    Trend(TrendArgs),
    /// Manage the badges of a pull request.
    Pr(PrArgs)
}

/// Rendering options shared by `badge` and `trend`.
#[derive(Debug, Args)]
struct RenderArgs {
    /// YAML configuration whose `badge` section supplies defaults.
    #[arg(long = "config", value_name = "PATH", env = "COVBADGE_CONFIG")]
    config: Option<PathBuf>,

    /// Badge style; unknown names fall back to `flat`.
    #[arg(long = "style", value_name = "STYLE")]
    style: Option<String>,

    /// Label shown on the left side of the badge.
    #[arg(long = "label", value_name = "TEXT")]
    label: Option<String>,

    /// Logo name (`go`, `github`) or an http/data URI.
    #[arg(long = "logo", value_name = "LOGO")]
    logo: Option<String>,

    /// Logo color; any value other than `white` selects the brand variant.
    #[arg(long = "logo-color", value_name = "COLOR")]
    logo_color: Option<String>,

    /// Timestamp embedded into the document as a comment.
    #[arg(long = "timestamp", value_name = "TEXT")]
    timestamp: Option<String>,

    /// Destination file; the SVG is written to stdout when omitted.
    #[arg(long = "output", value_name = "FILE")]
    output: Option<PathBuf>
}

#[derive(Debug, Args)]
struct BadgeArgs {
    /// Coverage percentage.
    #[arg(long = "percentage", value_name = "PERCENT", allow_negative_numbers = true)]
    percentage: f64,

    #[command(flatten)]
    render: RenderArgs
}

#[derive(Debug, Args)]
struct TrendArgs {
    /// Current coverage percentage.
    #[arg(long = "current", value_name = "PERCENT")]
    current: f64,

    /// Previous coverage percentage.
    #[arg(long = "previous", value_name = "PERCENT")]
    previous: f64,

    #[command(flatten)]
    render: RenderArgs
}

#[derive(Debug, Args)]
struct PrArgs {
    #[command(subcommand)]
    command: PrCommand
}

#[derive(Debug, Subcommand)]
enum PrCommand {
    /// Generate every requested badge of a pull request.
    Generate(PrGenerateArgs),
    /// Remove every badge of a pull request.
    Cleanup(PrCleanupArgs),
    /// List the badges stored for a pull request.
    Info(PrInfoArgs),
    /// Apply the cleanup policy to a closed pull request.
    Closed(PrClosedArgs)
}

/// Manager configuration shared by the `pr` subcommands.
#[derive(Debug, Args)]
struct ManagerArgs {
    /// YAML manager configuration.
    #[arg(long = "config", value_name = "PATH", env = "COVBADGE_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides `output_base_path` from the configuration.
    #[arg(long = "output-base", value_name = "DIR")]
    output_base: Option<PathBuf>
}

#[derive(Debug, Args)]
struct PrGenerateArgs {
    #[command(flatten)]
    manager: ManagerArgs,

    /// Repository owner.
    #[arg(long = "owner")]
    owner: String,

    /// Repository name.
    #[arg(long = "repo")]
    repo: String,

    /// Pull request number.
    #[arg(long = "pr", value_name = "NUMBER")]
    pr: u64,

    /// Head branch of the pull request.
    #[arg(long = "branch", default_value = "")]
    branch: String,

    /// Head commit SHA.
    #[arg(long = "commit", default_value = "")]
    commit: String,

    /// Pull request author.
    #[arg(long = "author", default_value = "")]
    author: String,

    /// Coverage of the head commit.
    #[arg(long = "coverage", value_name = "PERCENT")]
    coverage: f64,

    /// Coverage of the base branch.
    #[arg(long = "base-coverage", value_name = "PERCENT")]
    base_coverage: f64,

    /// Trend direction; derived from the coverage change when omitted.
    #[arg(long = "trend", value_name = "up|down|stable")]
    trend: Option<Trend>,

    /// Explicit quality grade.
    #[arg(long = "grade", value_name = "GRADE")]
    grade: Option<String>,

    /// Badge types to generate.
    #[arg(long = "type", value_name = "TYPE", value_delimiter = ',', default_value = "coverage")]
    types: Vec<String>,

    /// Styles to generate; the configuration decides when omitted.
    #[arg(long = "style", value_name = "STYLE", value_delimiter = ',')]
    styles: Vec<BadgeStyle>,

    /// Label override in `TYPE=TEXT` form.
    #[arg(long = "label", value_name = "TYPE=TEXT", value_parser = parse_label)]
    labels: Vec<(BadgeType, String)>,

    /// RFC 3339 time of the coverage run; defaults to now.
    #[arg(long = "timestamp", value_name = "RFC3339")]
    timestamp: Option<DateTime<Utc>>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool
}

#[derive(Debug, Args)]
struct PrCleanupArgs {
    #[command(flatten)]
    manager: ManagerArgs,

    /// Pull request number.
    #[arg(long = "pr", value_name = "NUMBER")]
    pr: u64
}

#[derive(Debug, Args)]
struct PrInfoArgs {
    #[command(flatten)]
    manager: ManagerArgs,

    /// Pull request number.
    #[arg(long = "pr", value_name = "NUMBER")]
    pr: u64,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool
}

#[derive(Debug, Args)]
struct PrClosedArgs {
    #[command(flatten)]
    manager: ManagerArgs,

    /// Pull request number.
    #[arg(long = "pr", value_name = "NUMBER")]
    pr: u64,

    /// Whether the pull request was merged.
    #[arg(long = "merged", action = ArgAction::SetTrue)]
    merged: bool,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool
}

/// Outcome of the `pr closed` hook.
#[derive(Debug, Serialize)]
struct ClosedReport {
    pr_number: u64,
    merged:    bool,
    cleaned:   bool
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "covbadge=debug" } else { "covbadge=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, validation and artifact errors.
async fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Badge(args) => run_badge(&args),
        Command::Trend(args) => run_trend(&args),
        Command::Pr(args) => run_pr(args).await
    }
}

fn run_badge(args: &BadgeArgs) -> Result<(), Error> {
    let generator = load_generator(&args.render)?;
    let svg = generator.generate(
        &Context::background(),
        args.percentage,
        &render_options(&args.render)
    )?;
    write_svg(args.render.output.as_deref(), &svg)
}

fn run_trend(args: &TrendArgs) -> Result<(), Error> {
    let generator = load_generator(&args.render)?;
    let svg = generator.generate_trend_badge(
        &Context::background(),
        args.current,
        args.previous,
        &render_options(&args.render)
    )?;
    write_svg(args.render.output.as_deref(), &svg)
}

fn load_generator(args: &RenderArgs) -> Result<BadgeGenerator, Error> {
    match args.config.as_deref() {
        Some(path) => Ok(BadgeGenerator::new(PrBadgeConfig::load(path)?.badge)),
        None => Ok(BadgeGenerator::default())
    }
}

fn render_options(args: &RenderArgs) -> RenderOptions {
    RenderOptions {
        style:      args.style.as_deref().map(BadgeStyle::resolve),
        label:      args.label.clone(),
        logo:       args.logo.clone(),
        logo_color: args.logo_color.clone(),
        timestamp:  args.timestamp.clone()
    }
}

fn write_svg(output: Option<&Path>, svg: &[u8]) -> Result<(), Error> {
    match output {
        Some(path) => fs::write(path, svg).map_err(|source| badge_io_error(path, source)),
        None => {
            let mut handle = io::stdout().lock();
            handle
                .write_all(svg)
                .and_then(|()| handle.flush())
                .map_err(|source| badge_io_error(Path::new("-"), source))
        }
    }
}

async fn run_pr(args: PrArgs) -> Result<(), Error> {
    match args.command {
        PrCommand::Generate(arguments) => {
            let (context, handle) = Context::with_cancel();
            let interrupt = tokio::spawn(async move {
                if signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, cancelling badge generation");
                    handle.cancel();
                }
            });
            let outcome = task::block_in_place(|| {
                run_pr_generate(&arguments, &context, &mut io::stdout().lock())
            });
            interrupt.abort();
            outcome
        }
        PrCommand::Cleanup(arguments) => run_pr_cleanup(&arguments),
        PrCommand::Info(arguments) => run_pr_info(&arguments, &mut io::stdout().lock()),
        PrCommand::Closed(arguments) => run_pr_closed(&arguments, &mut io::stdout().lock())
    }
}

fn load_manager(args: &ManagerArgs) -> Result<PrBadgeManager, Error> {
    let mut config = match args.config.as_deref() {
        Some(path) => PrBadgeConfig::load(path)?,
        None => PrBadgeConfig::default()
    };
    if let Some(base) = &args.output_base {
        config.output_base_path = base.clone();
    }
    PrBadgeManager::new(config)
}

fn build_request(args: &PrGenerateArgs) -> PrBadgeRequest {
    let mut request =
        PrBadgeRequest::new(&args.owner, &args.repo, args.pr, args.coverage, args.base_coverage);
    request.branch = args.branch.clone();
    request.commit_sha = args.commit.clone();
    request.author = args.author.clone();
    let change = request.change();
    request.trend = args.trend.unwrap_or_else(|| Trend::from_change(change));
    request.quality_grade = args.grade.clone();
    request.types = args.types.clone();
    request.styles = args.styles.clone();
    request.custom_labels = args.labels.iter().cloned().collect();
    if let Some(timestamp) = args.timestamp {
        request.timestamp = timestamp;
    }
    request
}

fn run_pr_generate<W: io::Write>(
    args: &PrGenerateArgs,
    context: &Context,
    writer: &mut W
) -> Result<(), Error> {
    let manager = load_manager(&args.manager)?;
    let request = build_request(args);

    let progress = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message(format!("Generating badges for PR #{}...", request.pr_number));

    let outcome = manager.generate_pr_badges(context, &request);
    progress.finish_and_clear();
    let result = outcome?;

    if !result.is_complete() {
        warn!(
            "{} of {} badge(s) failed for PR #{}",
            result.errors.len(),
            result.errors.len() + result.total_badges,
            request.pr_number
        );
    }
    write_json(writer, &result, args.pretty)
}

fn run_pr_cleanup(args: &PrCleanupArgs) -> Result<(), Error> {
    load_manager(&args.manager)?.cleanup_pr_badges(args.pr)?;
    info!("cleanup finished for PR #{}", args.pr);
    Ok(())
}

fn run_pr_info<W: io::Write>(args: &PrInfoArgs, writer: &mut W) -> Result<(), Error> {
    let inventory = load_manager(&args.manager)?.get_pr_info(args.pr)?;
    write_json(writer, &inventory, args.pretty)
}

fn run_pr_closed<W: io::Write>(args: &PrClosedArgs, writer: &mut W) -> Result<(), Error> {
    let cleaned = load_manager(&args.manager)?.handle_pr_closed(args.pr, args.merged)?;
    let report = ClosedReport {
        pr_number: args.pr,
        merged: args.merged,
        cleaned
    };
    write_json(writer, &report, args.pretty)
}

fn write_json<W, T>(writer: &mut W, value: &T, pretty: bool) -> Result<(), Error>
where
    W: io::Write,
    T: Serialize
{
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }

    Ok(())
}

fn parse_label(value: &str) -> Result<(BadgeType, String), String> {
    let (kind, label) = value
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=TEXT, got '{value}'"))?;
    let kind = kind
        .parse::<BadgeType>()
        .map_err(|error| error.to_display_string())?;
    Ok((kind, label.to_owned()))
}
