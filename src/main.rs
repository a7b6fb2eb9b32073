//! stagecraft - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use git2::Repository;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use stagecraft::chat::OpenAiTransport;
use stagecraft::commit::CommitAgent;
use stagecraft::config::Config;
use stagecraft::git::{
    FileStatus, StagedChanges, collect_staged, create_commit, open_repository, push_current_branch,
    stage_files,
};

/// Answer used when the user just presses Enter. Committing and pushing both
/// need an explicit yes.
const COMMIT_CONFIRM_DEFAULT: bool = false;
const PUSH_CONFIRM_DEFAULT: bool = false;

/// Propose and create a conventional commit from the staged diff using an LLM.
#[derive(Parser, Debug)]
#[command(name = "stagecraft")]
#[command(about = "Propose and create a conventional commit from the staged diff using an LLM")]
#[command(version)]
struct Cli {
    /// Commit (and push, with --push) without asking for confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Push the current branch after committing
    #[arg(short = 'p', long)]
    push: bool,

    /// Extra context used to refine the generated message
    #[arg(short = 's', long)]
    seed: Option<String>,

    /// Model identifier (overrides STAGECRAFT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Dry run - print the proposal without committing
    #[arg(long)]
    dry_run: bool,

    /// Show debug logs for the chat exchanges
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "stagecraft=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // Step 1: Resolve configuration
    let mut config = Config::from_env();
    if let Some(model) = cli.model {
        config.model = model;
    }

    // Step 2: Open git repository and read the staged diff
    let repo = open_repository(".")
        .context("Not a git repository. Run stagecraft from within a git repository.")?;

    let staged = collect_staged(&repo).context("Failed to read staged changes")?;
    if staged.is_empty() {
        println!("No staged changes. Stage files with `git add` first.");
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "Analyzing {} staged files (+{} -{})...",
        staged.files.len(),
        staged.additions,
        staged.deletions
    );

    // Step 3: Ask the model for files and a message
    let transport = OpenAiTransport::from_config(&config)?;
    let agent = CommitAgent::new(Arc::new(transport), &config.model, &config.personas);

    let analysis = agent
        .analyze_changes(&staged.diff_text, cli.seed.as_deref())
        .await
        .context("Failed to analyze staged changes")?;

    if analysis.malformed {
        eprintln!("The model reply did not contain usable FILES: and MESSAGE: sections.");
        eprintln!("Run with --verbose to see the raw reply.");
        return Ok(ExitCode::FAILURE);
    }

    if analysis.is_empty() {
        println!("No files to commit");
        return Ok(ExitCode::FAILURE);
    }

    // Step 4: Show the proposal
    println!();
    println!("Files:");
    for file in &analysis.files {
        match staged_status(&staged, file) {
            Some(status) => println!("  [{}] {}", status, file),
            None => {
                println!("  [Unstaged] {}", file);
                warn!("{} was proposed but is not staged; it will be staged as-is", file);
            }
        }
    }

    println!();
    println!("Message:");
    for line in analysis.message.lines() {
        println!("  {}", line);
    }

    println!();
    println!("Cost: {}", analysis.cost);

    if cli.dry_run {
        println!();
        println!("Dry run complete. No changes made.");
        return Ok(ExitCode::SUCCESS);
    }

    // Step 5: Confirm, stage, and commit
    if !cli.yes && !confirm("Proceed with commit?", COMMIT_CONFIRM_DEFAULT)? {
        println!("Commit cancelled");
        return Ok(ExitCode::SUCCESS);
    }

    stage_files(&repo, &analysis.files).context("Failed to stage files")?;
    let oid = create_commit(&repo, &analysis.message).context("Failed to create commit")?;
    println!("  [DONE] Created commit {}", short_id(&oid.to_string()));

    // Step 6: Push
    let should_push =
        cli.push || (!cli.yes && confirm("Push changes to remote?", PUSH_CONFIRM_DEFAULT)?);
    if should_push {
        push(&repo)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn push(repo: &Repository) -> Result<()> {
    let target = push_current_branch(repo).context("Failed to push")?;
    println!(
        "  [DONE] Pushed {} to {}{}",
        target.branch,
        target.remote,
        target
            .url
            .as_ref()
            .map(|url| format!(" ({})", url))
            .unwrap_or_default()
    );
    Ok(())
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    println!();
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .context("Failed to read confirmation")
}

/// Status of a proposed path in the staged diff, if it is staged at all.
fn staged_status<'a>(staged: &'a StagedChanges, path: &str) -> Option<&'a FileStatus> {
    staged
        .files
        .iter()
        .find(|f| f.path == path)
        .map(|f| &f.status)
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
