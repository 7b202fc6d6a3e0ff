use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_autotag::cli::orchestration::{TagWorkflow, WorkflowArgs, WorkflowResult};
use git_autotag::config::{self, ActionInputs};
use git_autotag::repository::{Git2Repository, GitHubClient};
use git_autotag::{ui, AutotagError};

#[derive(clap::Parser)]
#[command(
    name = "git-autotag",
    about = "Tag the main branch with the next semantic version"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Tag prefix, overrides the tag_prefix input")]
    prefix: Option<String>,

    #[arg(long, help = "Read every page of tags instead of the first 100")]
    fetch_all_tags: bool,

    #[arg(long, help = "Fetch commits since the previous tag and emit a changelog")]
    changelog: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Tag a local clone instead of calling the GitHub API"
    )]
    local: Option<PathBuf>,

    #[arg(long, help = "Compute the new tag without creating it")]
    dry_run: bool,

    #[arg(long, help = "Enable debug logging")]
    verbose: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if args.version {
        println!("git-autotag {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    let default_directive = if verbose || runner_debug {
        "git_autotag=debug,info"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_env("AUTOTAG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let mut inputs = ActionInputs::from_env(&config);
    if let Some(prefix) = args.prefix {
        inputs.tag_prefix = prefix;
    }
    inputs.fetch_all_tags |= args.fetch_all_tags;
    inputs.changelog |= args.changelog;
    tracing::debug!(?inputs, "Resolved inputs");

    let workflow_args = WorkflowArgs::from_inputs(&inputs, args.dry_run);
    let result = execute(args.local.as_deref(), &inputs, &workflow_args).await?;

    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_proposed_tag(&result.previous_tag.name, &result.new_tag);

    let outputs = result.outputs();
    match &inputs.output_path {
        Some(path) => ui::write_github_output(path, &outputs)
            .with_context(|| format!("Failed to write outputs to {}", path.display()))?,
        None => ui::print_outputs(&outputs),
    }

    if result.created {
        ui::display_success(&format!("Created tag {}", result.new_tag));
    } else {
        ui::display_status(&format!("Dry run: tag {} was not created", result.new_tag));
    }

    Ok(())
}

/// Pick the tag repository backend and run the workflow against it
async fn execute(
    local: Option<&std::path::Path>,
    inputs: &ActionInputs,
    workflow_args: &WorkflowArgs,
) -> git_autotag::Result<WorkflowResult> {
    match local {
        Some(path) => {
            let repo = Git2Repository::open(path)?;
            TagWorkflow::new(repo).run(workflow_args).await
        }
        None => {
            let repository = inputs.repository.as_deref().ok_or_else(|| {
                AutotagError::config("Missing repository (GITHUB_REPOSITORY).")
            })?;
            let client = GitHubClient::new(&inputs.api_url, repository, &inputs.github_token)?;
            TagWorkflow::new(client).run(workflow_args).await
        }
    }
}
