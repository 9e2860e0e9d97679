//! The five user-facing commands.
//!
//! Each command reads the configuration and active file snapshots, runs the
//! resolver/search/ranker, and hands the result to the host. Every failure
//! ends up in a single `notify_error` call.

use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::error::{AppError, Result};
use crate::filter;
use crate::host::Host;
use crate::path::convention::{self, ResolvedPath};
use crate::path::grammar;
use crate::picker::{Picker, PickerOutcome};
use crate::search;

/// A user-facing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    JumpTest,
    JumpIndex,
    ListIndex,
    CreateTest,
    CycleFilename,
}

/// What a command ended up doing.
#[derive(Debug)]
pub enum Outcome {
    Opened(PathBuf),
    /// The file was created, then opened.
    Created(PathBuf),
    /// The picker closed without a choice.
    Dismissed,
    /// Nothing to do.
    Unchanged,
    /// The error has already been reported to the user.
    Failed(AppError),
}

/// Run `command`, reporting any failure through the host.
pub async fn run<H: Host>(host: &mut H, command: Command) -> Outcome {
    match dispatch(host, command).await {
        Ok(outcome) => {
            tracing::debug!(?command, ?outcome, "command finished");
            outcome
        }
        Err(err) => {
            host.notify_error(&err.to_string());
            Outcome::Failed(err)
        }
    }
}

async fn dispatch<H: Host>(host: &mut H, command: Command) -> Result<Outcome> {
    let config = host.configuration()?;
    let active = host.active_file();
    let require_active = || active.clone().ok_or(AppError::NoActiveFile);

    match command {
        Command::JumpTest => jump_to_test(host, &config, &require_active()?).await,
        Command::JumpIndex => jump_to_index(host, &config, &require_active()?).await,
        Command::ListIndex => list_index_files(host, &config, active.as_deref()).await,
        Command::CreateTest => create_test(host, &config, &require_active()?).await,
        Command::CycleFilename => cycle_filename(host, &config, &require_active()?).await,
    }
}

/// Open a resolved path. An ambiguous one opens the first file, by path
/// order, whose stem matches exactly.
async fn open_resolved<H: Host>(host: &mut H, resolved: &ResolvedPath) -> Result<Outcome> {
    let path = match resolved {
        ResolvedPath::Concrete(path) => path.clone(),
        ResolvedPath::Ambiguous { directory, stem } => {
            let matches = search::find_siblings_by_stem(&*host, directory, stem, false).await?;
            match matches.into_iter().next() {
                Some(candidate) => candidate.path,
                None => {
                    return Err(AppError::NotFound(format!(
                        "{}.*",
                        directory.join(stem).display()
                    )))
                }
            }
        }
    };
    host.open_file(&path).await?;
    Ok(Outcome::Opened(path))
}

/// Toggle between a source file and its test.
pub async fn jump_to_test<H: Host>(
    host: &mut H,
    config: &Configuration,
    active: &Path,
) -> Result<Outcome> {
    let (resolved, counterpart) = if convention::is_test_file(active, &config.test_file_suffix) {
        (
            convention::resolve_source_path(active, config)?,
            "source file counterpart",
        )
    } else {
        (
            convention::resolve_test_path(active, config, false)?,
            "test file counterpart",
        )
    };

    open_resolved(host, &resolved).await.map_err(|err| match err {
        AppError::NotFound(_) => AppError::NotFound(counterpart.to_string()),
        other => other,
    })
}

/// Open the single index file next to the active file (next to the source
/// folder when the active file sits in the test sub-folder).
pub async fn jump_to_index<H: Host>(
    host: &mut H,
    config: &Configuration,
    active: &Path,
) -> Result<Outcome> {
    let mut dir = grammar::parent_directory(active);
    if grammar::is_test_sub_folder(&dir, &config.test_sub_folder) {
        dir = grammar::parent_directory(&dir);
    }

    let found = search::find_index_files(&*host, &dir).await?;
    match found.as_slice() {
        [] => Err(AppError::NotFound("an index file".into())),
        [only] => {
            host.open_file(&only.path).await?;
            Ok(Outcome::Opened(only.path.clone()))
        }
        _ => Err(AppError::Ambiguous("index files".into())),
    }
}

/// Pick among every index file in the workspace.
pub async fn list_index_files<H: Host>(
    host: &mut H,
    config: &Configuration,
    active: Option<&Path>,
) -> Result<Outcome> {
    let root = host.workspace_root();
    let found = search::find_all_index_files_in_workspace(
        &*host,
        &root,
        config.exclude_pattern.as_deref(),
        config.respect_ignore,
        active,
    )
    .await?;
    if found.is_empty() {
        return Err(AppError::NotFound("an index file".into()));
    }

    let mut picker = Picker::new("Index Files", config.filter_case_sensitive);
    picker.show(found);

    match host.show_picker(picker).await? {
        PickerOutcome::Accepted(choice) => {
            host.open_file(&choice.path).await?;
            Ok(Outcome::Opened(choice.path))
        }
        PickerOutcome::Dismissed => Ok(Outcome::Dismissed),
    }
}

/// Create the active source file's test if needed, then open it.
pub async fn create_test<H: Host>(
    host: &mut H,
    config: &Configuration,
    active: &Path,
) -> Result<Outcome> {
    if convention::is_test_file(active, &config.test_file_suffix) {
        return Err(AppError::InvalidPath(format!(
            "{} is already a test file",
            active.display()
        )));
    }

    let path = match convention::resolve_test_path(active, config, true)? {
        ResolvedPath::Concrete(path) => path,
        ResolvedPath::Ambiguous { directory, stem } => {
            return Err(AppError::MalformedName(format!(
                "no concrete extension for {}",
                directory.join(stem).display()
            )))
        }
    };

    let created = host.create_file_if_absent(&path).await?;
    host.open_file(&path).await?;
    Ok(if created {
        Outcome::Created(path)
    } else {
        Outcome::Opened(path)
    })
}

/// Open the next file in the active file's folder sharing its stem.
pub async fn cycle_filename<H: Host>(
    host: &mut H,
    config: &Configuration,
    active: &Path,
) -> Result<Outcome> {
    let dir = grammar::parent_directory(active);
    let Some(stem) = grammar::filename_without_extension(active) else {
        return Ok(Outcome::Unchanged);
    };

    let siblings =
        search::find_siblings_by_stem(&*host, &dir, &stem, !config.filter_case_sensitive).await?;
    match filter::advance(&siblings, active) {
        Some(next) => {
            let path = next.path.clone();
            host.open_file(&path).await?;
            Ok(Outcome::Opened(path))
        }
        None => Ok(Outcome::Unchanged),
    }
}
