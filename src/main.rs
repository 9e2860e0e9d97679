mod commands;
mod components;
mod config;
mod error;
mod event;
mod filter;
mod fs;
mod handler;
mod host;
mod logging;
mod path;
mod picker;
mod search;
mod tui;
mod ui;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::commands::{Command, Outcome};
use crate::config::{AppConfig, FilterConfig, GeneralConfig, SearchConfig, TestConfig};
use crate::error::AppError;
use crate::host::{ListFormat, TerminalHost};
use crate::logging::Verbosity;

/// Jump between source files, their tests, same-stem siblings and index files.
#[derive(Parser, Debug)]
#[command(name = "jsrc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,

    /// Config file, layered over the discovered ones
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Workspace root for index listing (defaults to current directory)
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    workspace: PathBuf,

    /// Editor command, shell-quoted; the path is appended
    #[arg(long, global = true, value_name = "CMD")]
    open_with: Option<String>,

    /// Test file suffix (`test` in `foo.test.ts`)
    #[arg(long, global = true)]
    suffix: Option<String>,

    /// Folder holding tests next to their sources; empty for side by side
    #[arg(long, global = true)]
    sub_folder: Option<String>,

    /// Match picker queries case-sensitively
    #[arg(long, global = true)]
    case_sensitive: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Open the test for a source file, or the source for a test
    Test(FileArg),
    /// Open the index file next to a file
    Index(FileArg),
    /// Create a file's test if missing, then open it
    CreateTest(FileArg),
    /// Open the next file sharing this file's name
    Cycle(FileArg),
    /// Pick among all index files in the workspace.
    /// Hidden and gitignored paths are skipped unless `--no-ignore` is given.
    ListIndex {
        /// Current file, left out of the list
        file: Option<PathBuf>,

        /// Initial picker query
        #[arg(long)]
        query: Option<String>,

        /// Print the list as JSON when not on a terminal
        #[arg(long)]
        json: bool,

        /// Also search hidden and gitignored paths
        #[arg(long)]
        no_ignore: bool,
    },
}

#[derive(Args, Debug)]
struct FileArg {
    /// The file you are on
    file: PathBuf,
}

impl Cli {
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                editor: self.open_with.clone(),
            },
            test: TestConfig {
                file_suffix: self.suffix.clone(),
                sub_folder: self.sub_folder.clone(),
                ..Default::default()
            },
            filter: FilterConfig {
                case_sensitive: self.case_sensitive.then_some(true),
            },
            search: SearchConfig {
                respect_ignore: match self.command {
                    CliCommand::ListIndex { no_ignore: true, .. } => Some(false),
                    _ => None,
                },
                ..Default::default()
            },
        }
    }
}

/// Absolute form of `path`; resolved through symlinks when it exists.
fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| cwd.join(path))
}

#[tokio::main]
async fn main() -> error::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    let cwd = std::env::current_dir()?;
    let workspace = cli.workspace.canonicalize().map_err(|_| {
        AppError::InvalidPath(format!("{} does not exist", cli.workspace.display()))
    })?;

    let (command, file, query, format) = match &cli.command {
        CliCommand::Test(arg) => (Command::JumpTest, Some(&arg.file), None, ListFormat::Plain),
        CliCommand::Index(arg) => (Command::JumpIndex, Some(&arg.file), None, ListFormat::Plain),
        CliCommand::CreateTest(arg) => {
            (Command::CreateTest, Some(&arg.file), None, ListFormat::Plain)
        }
        CliCommand::Cycle(arg) => {
            (Command::CycleFilename, Some(&arg.file), None, ListFormat::Plain)
        }
        CliCommand::ListIndex {
            file, query, json, ..
        } => (
            Command::ListIndex,
            file.as_ref(),
            query.clone(),
            if *json { ListFormat::Json } else { ListFormat::Plain },
        ),
    };

    let active = file.map(|f| absolute(f, &cwd));
    let interactive = std::io::stdin().is_terminal() && std::io::stderr().is_terminal();
    tracing::debug!(?command, ?active, workspace = %workspace.display(), interactive, "starting");

    let mut host = TerminalHost::new(
        workspace,
        active,
        cli.config.clone(),
        cli.overrides(),
        interactive,
    )
    .with_query(query)
    .with_list_format(format);

    match commands::run(&mut host, command).await {
        Outcome::Opened(path) => tracing::info!(path = %path.display(), "jumped"),
        Outcome::Created(path) => tracing::info!(path = %path.display(), "created and jumped"),
        Outcome::Dismissed | Outcome::Unchanged => {}
        Outcome::Failed(err) => {
            tracing::debug!(error = ?err, "command failed");
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}
