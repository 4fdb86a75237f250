use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::PagerWriter;
use gitlet::artifacts::core::config::{Config, LOG_FILTER_ENV};
use gitlet::artifacts::core::error::GitletError;
use is_terminal::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    about = "A small local version-control system",
    long_about = "Gitlet tracks snapshots of the files in a directory, organizes them into \
    a commit history and supports branching and three-way merging. \
    It keeps everything in a .gitlet directory next to the tracked files.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates a .gitlet directory in the current directory \
        holding a single root commit on the master branch."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "rm", about = "Unstage a file or stage it for removal")]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with a matching message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and untracked files")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch; checkout -- <file> restores a file \
        from the current commit; checkout <commit> -- <file> restores it from another commit."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch, or the commit a file is restored from")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit and check it out")]
    Reset {
        #[arg(index = 1, help = "A full commit id or an abbreviated prefix")]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "add-remote", about = "Register a remote repository (unsupported)")]
    AddRemote { name: String, path: String },
    #[command(name = "rm-remote", about = "Forget a remote repository (unsupported)")]
    RmRemote { name: String },
    #[command(name = "push", about = "Push a branch to a remote (unsupported)")]
    Push { remote: String, branch: String },
    #[command(name = "fetch", about = "Fetch a branch from a remote (unsupported)")]
    Fetch { remote: String, branch: String },
    #[command(name = "pull", about = "Fetch and merge a remote branch (unsupported)")]
    Pull { remote: String, branch: String },
}

fn main() -> ExitCode {
    init_tracing();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match parse_cli().and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match GitletError::find(&err) {
                Some(gitlet_error) => eprintln!("{gitlet_error}"),
                None => eprintln!("{err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Parse the command line, reporting a wrong number of operands as a gitlet error
fn parse_cli() -> Result<Cli> {
    Cli::try_parse().or_else(|err| match err.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::WrongNumberOfValues
        | ErrorKind::TooManyValues
        | ErrorKind::UnknownArgument => Err(GitletError::InvalidArgumentCount.into()),
        _ => err.exit(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Init => open_repository()?.init(),
        Commands::Add { file } => open_repository()?.add(file),
        Commands::Commit { message } => open_repository()?.commit(message),
        Commands::Rm { file } => open_repository()?.rm(file),
        Commands::Log => with_pager(|repository| repository.log()),
        Commands::GlobalLog => with_pager(|repository| repository.global_log()),
        Commands::Find { message } => open_repository()?.find(message),
        Commands::Status => open_repository()?.status(),
        Commands::Checkout { target, file } => {
            let mut repository = open_repository()?;
            match (target, file) {
                (Some(branch), None) => repository.checkout_branch(branch),
                (commit, Some(file)) => repository.checkout_file(commit.as_deref(), file),
                (None, None) => Err(GitletError::InvalidArgumentCount.into()),
            }
        }
        Commands::Branch { name } => open_repository()?.branch(name),
        Commands::RmBranch { name } => open_repository()?.rm_branch(name),
        Commands::Reset { commit } => open_repository()?.reset(commit),
        Commands::Merge { branch } => open_repository()?.merge(branch),
        Commands::AddRemote { name, path } => open_repository()?.add_remote(name, path),
        Commands::RmRemote { name } => open_repository()?.rm_remote(name),
        Commands::Push { remote, branch } => open_repository()?.push(remote, branch),
        Commands::Fetch { remote, branch } => open_repository()?.fetch(remote, branch),
        Commands::Pull { remote, branch } => open_repository()?.pull(remote, branch),
    }
}

/// Run a long-output command through the pager when stdout is a terminal
fn with_pager(command: impl FnOnce(&Repository) -> Result<()>) -> Result<()> {
    let config = Config::load_from_env()?;
    let pwd = std::env::current_dir()?;

    if config.no_pager || !std::io::stdout().is_terminal() {
        let repository =
            Repository::with_config(&pwd.to_string_lossy(), Box::new(std::io::stdout()), config)?;
        return command(&repository);
    }

    let pager = minus::Pager::new();
    {
        let repository = Repository::with_config(
            &pwd.to_string_lossy(),
            Box::new(PagerWriter::new(pager.clone())),
            config,
        )?;
        command(&repository)?;
    }
    minus::page_all(pager)?;

    Ok(())
}
