//! `pipematch` - validate a Jenkins to GitHub Actions pipeline migration.
//!
//! Compares test results, artifact checksums, and build outcomes for one
//! build/run pair, writes an HTML report, and exits 0 iff the confidence
//! score clears the auto-migrate bar (>= 95).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pipematch_core::{render_html, render_summary};
use pipematch_sources::{GitHubActionsSource, JenkinsSource, MigrationValidator, RunRef};

#[derive(Parser, Debug)]
#[command(
    name = "pipematch",
    version,
    about = "Validate that a Jenkins build and a GitHub Actions run produced equivalent outputs"
)]
struct Cli {
    /// Jenkins base URL, e.g. http://jenkins.internal:8080
    #[arg(long)]
    jenkins_url: String,

    /// Jenkins username for API authentication
    #[arg(long, default_value = "admin")]
    jenkins_user: String,

    /// Jenkins API token (prefer the environment variable)
    #[arg(long, env = "JENKINS_API_TOKEN", hide_env_values = true)]
    jenkins_token: String,

    /// Jenkins job name
    #[arg(long)]
    jenkins_job: String,

    /// Jenkins build number
    #[arg(long)]
    jenkins_build: u64,

    /// GitHub repository, owner/repo
    #[arg(long)]
    gha_repo: String,

    /// GitHub token (prefer the environment variable)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    gha_token: String,

    /// GitHub Actions run id
    #[arg(long)]
    gha_run: u64,

    /// Where to write the HTML report
    #[arg(long, default_value = "validation-report.html")]
    output: PathBuf,

    /// Also print the validation result as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let jenkins = JenkinsSource::new(&cli.jenkins_url, &cli.jenkins_user, &cli.jenkins_token);
    let gha = GitHubActionsSource::new(&cli.gha_repo, &cli.gha_token);

    let jenkins_ref = RunRef::jenkins(&cli.jenkins_job, cli.jenkins_build);
    let gha_ref = RunRef::gha(cli.gha_run);

    let validator = MigrationValidator::new(Arc::new(jenkins), Arc::new(gha));

    // A fatal fetch error propagates here: no report is written and the
    // process exits non-zero via the anyhow error path.
    let result = validator
        .validate(&jenkins_ref, &gha_ref)
        .await
        .context("validation failed")?;

    let html = render_html(&result);
    std::fs::write(&cli.output, html)
        .with_context(|| format!("failed to write report to {}", cli.output.display()))?;
    tracing::info!(path = %cli.output.display(), "Report written");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    print!("{}", render_summary(&result));

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
