use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pr_review_client::{
    Endpoints, LoadOutcome, RecordedTransport, ReviewClient, ReviewTransport, ViewLoader,
};
use pr_review_config::{paths, AppConfig};
use pr_review_json::{parse_activities, parse_changed_files};
use pr_review_tree::FileTree;
use std::path::PathBuf;
use std::sync::Arc;

mod logger;
mod render;

#[derive(Parser, Debug)]
#[command(name = "pr-review")]
#[command(version)]
#[command(about = "Browse pull request changes and comments from recorded responses", long_about = None)]
struct Args {
    /// Directory holding recorded responses
    #[arg(long)]
    recordings: Option<PathBuf>,

    /// Project key (defaults to `default_project` from the config file)
    #[arg(short, long)]
    project: Option<String>,

    /// Repository slug (defaults to `default_repository` from the config file)
    #[arg(short, long)]
    repo: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List pull requests
    Prs,

    /// Show the changed files of a pull request as a tree
    Files {
        /// Pull request id
        pr_id: i64,
    },

    /// Show the comment threads of a pull request
    Comments {
        /// Pull request id
        pr_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_file = logger::init();
    log::info!("Starting pr-review, logging to {}", log_file.display());

    let config = AppConfig::load();
    let project = args
        .project
        .or_else(|| config.default_project.clone())
        .context("No project given, pass --project or set default_project")?;
    let repo = args
        .repo
        .or_else(|| config.default_repository.clone())
        .context("No repository given, pass --repo or set default_repository")?;
    let recordings = match args.recordings.or_else(|| config.recordings_dir.clone()) {
        Some(dir) => dir,
        None => paths::recordings_dir()?,
    };

    let endpoints = Endpoints::new(config.base_url.clone())
        .with_page_limit(config.page_limit)
        .with_state(config.pull_request_state.clone());
    let transport = Arc::new(RecordedTransport::new(recordings).with_endpoints(endpoints));

    let lines = match args.command {
        Commands::Prs => {
            let client = ReviewClient::new(Arc::clone(&transport));
            let prs = client.pull_requests(&project, &repo).await?;
            render::pull_request_lines(&prs)
        }
        Commands::Files { pr_id } => {
            let loader = ViewLoader::new("files");
            let fetch = {
                let transport = Arc::clone(&transport);
                async move { transport.fetch_changes(&project, &repo, pr_id).await }
            };
            loader
                .start(fetch, |body| FileTree::build(&parse_changed_files(body)))
                .await?;
            loader.with_state(|state| outcome_lines(state.outcome.as_ref(), render::file_tree_lines))?
        }
        Commands::Comments { pr_id } => {
            let loader = ViewLoader::new("comments");
            let fetch = {
                let transport = Arc::clone(&transport);
                async move { transport.fetch_activities(&project, &repo, pr_id).await }
            };
            loader.start(fetch, parse_activities).await?;
            loader.with_state(|state| outcome_lines(state.outcome.as_ref(), render::comment_lines))?
        }
    };

    for line in lines {
        println!("{}", line);
    }

    log::info!("Exiting pr-review");
    Ok(())
}

fn outcome_lines<P>(
    outcome: Option<&LoadOutcome<P>>,
    render: impl Fn(&P) -> Vec<String>,
) -> Result<Vec<String>> {
    match outcome {
        Some(LoadOutcome::Loaded(payload)) => Ok(render(payload)),
        Some(LoadOutcome::Failed(message)) => anyhow::bail!("{}", message),
        None => anyhow::bail!("Load was superseded"),
    }
}
