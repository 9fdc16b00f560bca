//! Cycletime CLI
//!
//! The `cycletime` command extracts issue changelogs from Jira and reports
//! how long each issue spent in active-work statuses.
//!
//! ## Commands
//!
//! - `extract`: Fetch from Jira, compute cycle times, write CSV (and JSON)
//! - `fetch`: Fetch from Jira and save the raw issues for offline runs
//! - `compute`: Compute cycle times from a saved raw issue file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use cycletime_core::{
    json_path_for, parse_timestamp, write_csv_file, write_json_file, write_raw_issues,
    BatchSpan, BatchSummary, CycleStatuses, CycleTimeConfig, CycleTimePipeline, IssueSource,
    JsonFileSource, RawIssue, METRICS,
};
use jira_source::{JiraClient, JiraConfig};
use tracing::{info, Level};

const DEFAULT_JQL: &str = "project = YOUR_PROJECT AND status changed DURING (-30d, now())";

#[derive(Parser)]
#[command(name = "cycletime")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract cycle time metrics from Jira issue changelogs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch issues from Jira, compute cycle times and export them
    Extract {
        #[command(flatten)]
        jira: JiraArgs,

        #[command(flatten)]
        compute: ComputeArgs,
    },

    /// Fetch issues from Jira and save them for offline computation
    Fetch {
        #[command(flatten)]
        jira: JiraArgs,

        /// Raw issues output file (JSON)
        #[arg(short, long, default_value = "jira_issues.json")]
        output: PathBuf,
    },

    /// Compute cycle times from a raw issues file written by `fetch`
    Compute {
        /// Raw issues file (JSON)
        input: PathBuf,

        #[command(flatten)]
        compute: ComputeArgs,
    },
}

/// Jira connection and query options
#[derive(Args, Debug, Clone)]
struct JiraArgs {
    /// Jira base URL, e.g. https://your-company.atlassian.net
    #[arg(long, env = "JIRA_URL")]
    url: Option<String>,

    /// Jira account e-mail
    #[arg(long, env = "JIRA_USERNAME")]
    username: Option<String>,

    /// Jira API token
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// JQL query selecting the issues
    #[arg(long, default_value = DEFAULT_JQL)]
    jql: String,

    /// Maximum number of issues to fetch
    #[arg(long, default_value = "10000")]
    max_results: usize,

    /// Jira requests per minute
    #[arg(long, default_value = "60")]
    rate_limit: u32,
}

/// Cycle-time computation and export options
#[derive(Args, Debug, Clone)]
struct ComputeArgs {
    /// Statuses counted as cycle time (space or comma separated)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    statuses: Vec<String>,

    /// CSV output file
    #[arg(short, long, default_value = "jira_metrics.csv")]
    output: PathBuf,

    /// Also write a detailed JSON export next to the CSV
    #[arg(long)]
    json: bool,

    /// Decimal places for cycle time values
    #[arg(long)]
    precision: Option<u32>,

    /// Evaluation instant for unresolved issues (RFC 3339, default: now)
    #[arg(long)]
    now: Option<String>,

    /// Worker tasks for the computation
    #[arg(long, default_value = "1")]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    cycletime_core::init_tracing(cli.json_logs, level);

    let result = match cli.command {
        Commands::Extract { jira, compute } => cmd_extract(&jira, &compute).await.map(|_| ()),
        Commands::Fetch { jira, output } => cmd_fetch(&jira, &output).await,
        Commands::Compute { input, compute } => {
            cmd_compute(&input, &compute).await.map(|_| ())
        }
    };

    METRICS.flush();
    result
}

/// Fetch from Jira, compute and export
async fn cmd_extract(jira: &JiraArgs, compute: &ComputeArgs) -> Result<BatchSummary> {
    let _span = BatchSpan::enter(&jira.jql);
    let raws = fetch_from_jira(jira).await?;
    compute_and_export(raws, compute).await
}

/// Fetch from Jira and save raw issues
async fn cmd_fetch(jira: &JiraArgs, output: &Path) -> Result<()> {
    let _span = BatchSpan::enter(&jira.jql);
    let raws = fetch_from_jira(jira).await?;

    write_raw_issues(output, &raws)
        .context(format!("Failed to write raw issues to {:?}", output))?;
    println!("Saved {} issues to {}", raws.len(), output.display());
    Ok(())
}

/// Compute and export from a saved raw issues file
async fn cmd_compute(input: &Path, compute: &ComputeArgs) -> Result<BatchSummary> {
    let _span = BatchSpan::enter(&input.display().to_string());
    let source = JsonFileSource::new(input);
    let raws = source
        .fetch("", usize::MAX)
        .await
        .context(format!("Failed to read raw issues from {:?}", input))?;

    compute_and_export(raws, compute).await
}

async fn fetch_from_jira(jira: &JiraArgs) -> Result<Vec<RawIssue>> {
    let client = JiraClient::new(jira_config(jira)).context("Invalid Jira configuration")?;
    let raws = client
        .fetch_issues(&jira.jql, jira.max_results)
        .await
        .context("Failed to fetch issues from Jira")?;
    println!("Fetched {} issues", raws.len());
    Ok(raws)
}

fn jira_config(jira: &JiraArgs) -> JiraConfig {
    JiraConfig::new(
        jira.url.as_deref().unwrap_or_default(),
        jira.username.as_deref().unwrap_or_default(),
        jira.token.as_deref().unwrap_or_default(),
    )
    .with_rate_limit(jira.rate_limit)
}

/// Compute every issue, write the CSV (and JSON) and print the summary
async fn compute_and_export(raws: Vec<RawIssue>, args: &ComputeArgs) -> Result<BatchSummary> {
    let config = cycle_config(args)?;
    let now = resolve_now(args.now.as_deref())?;
    info!(statuses = %config.statuses, precision = config.precision, "computing cycle times");

    let pipeline = Arc::new(CycleTimePipeline::new(&config));
    let outcome = if args.workers > 1 {
        Arc::clone(&pipeline)
            .process_batch_concurrent(raws, now, args.workers)
            .await
            .context("Cycle time computation failed")?
    } else {
        pipeline.process_batch(&raws, now)
    };

    write_csv_file(&args.output, &outcome.records)
        .context(format!("Failed to write CSV to {:?}", args.output))?;
    println!(
        "Exported {} issues to {}",
        outcome.records.len(),
        args.output.display()
    );

    if args.json {
        let json_path = json_path_for(&args.output);
        write_json_file(&json_path, &outcome.records, now)
            .context(format!("Failed to write JSON to {:?}", json_path))?;
        println!("Detailed data written to {}", json_path.display());
    }

    let summary = BatchSummary::new(&outcome, pipeline.statuses());
    println!();
    print!("{}", summary.render());
    Ok(summary)
}

/// Environment defaults overridden by command-line flags
fn cycle_config(args: &ComputeArgs) -> Result<CycleTimeConfig> {
    let base = CycleTimeConfig::from_env().context("Invalid cycle time environment")?;
    let statuses = if args.statuses.is_empty() {
        base.statuses
    } else {
        CycleStatuses::new(args.statuses.iter().map(|s| s.trim().to_string()))
    };
    let precision = args.precision.unwrap_or(base.precision);
    CycleTimeConfig::new(statuses, precision).context("Invalid cycle time configuration")
}

fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(value) => parse_timestamp("now", value).context("Invalid --now value"),
        None => Ok(Utc::now()),
    }
}
