//! The capabilities commands consume: file search, opening and creating
//! files, the picker, error reporting, and the ambient snapshots.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{AppConfig, Configuration};
use crate::error::{AppError, Result};
use crate::event::{Event, EventHandler};
use crate::fs::{operations, walk};
use crate::handler;
use crate::picker::{Picker, PickerOutcome};
use crate::search::{FileSearch, SearchQuery};
use crate::tui::{install_panic_hook, Tui};
use crate::ui;

/// Everything a command needs from its environment.
#[allow(async_fn_in_trait)]
pub trait Host: FileSearch {
    /// Snapshot of the file the user is on, if any.
    fn active_file(&self) -> Option<PathBuf>;

    /// Root for workspace-wide searches.
    fn workspace_root(&self) -> PathBuf;

    /// Fresh, validated configuration for this invocation.
    fn configuration(&self) -> Result<Configuration>;

    /// Show an existing file. Fails with `NotFound` when it is absent.
    async fn open_file(&mut self, path: &Path) -> Result<()>;

    /// Create an empty file unless one exists. `Ok(true)` when created.
    async fn create_file_if_absent(&mut self, path: &Path) -> Result<bool>;

    /// Run a picker session over an already-shown picker.
    async fn show_picker(&mut self, picker: Picker) -> Result<PickerOutcome>;

    /// Tell the user something went wrong.
    fn notify_error(&mut self, message: &str);
}

/// How the picker's list is printed when no terminal is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    #[default]
    Plain,
    Json,
}

/// Host backed by the local filesystem and the controlling terminal.
pub struct TerminalHost {
    workspace: PathBuf,
    active: Option<PathBuf>,
    config_path: Option<PathBuf>,
    overrides: AppConfig,
    interactive: bool,
    preset_query: Option<String>,
    list_format: ListFormat,
}

impl TerminalHost {
    pub fn new(
        workspace: PathBuf,
        active: Option<PathBuf>,
        config_path: Option<PathBuf>,
        overrides: AppConfig,
        interactive: bool,
    ) -> Self {
        Self {
            workspace,
            active,
            config_path,
            overrides,
            interactive,
            preset_query: None,
            list_format: ListFormat::Plain,
        }
    }

    /// Query typed into the picker before it opens.
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.preset_query = query;
        self
    }

    pub fn with_list_format(mut self, format: ListFormat) -> Self {
        self.list_format = format;
        self
    }

    fn app_config(&self) -> AppConfig {
        AppConfig::load(self.config_path.as_deref(), Some(&self.overrides))
    }

    fn print_listing(&self, picker: &Picker) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.list_format {
            ListFormat::Plain => {
                for candidate in &picker.visible {
                    writeln!(out, "{}", candidate.path.display())?;
                }
            }
            ListFormat::Json => {
                let json = serde_json::to_string_pretty(&picker.visible)
                    .map_err(std::io::Error::from)?;
                writeln!(out, "{}", json)?;
            }
        }
        Ok(())
    }
}

fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError::Io(std::io::Error::other(e))
}

/// Split an editor command the way a POSIX shell would, quotes included.
fn editor_argv(command: &str) -> Result<Vec<String>> {
    let argv = shlex::split(command).ok_or_else(|| {
        AppError::InvalidConfig(format!("editor command `{}` has unbalanced quotes", command))
    })?;
    if argv.is_empty() {
        return Err(AppError::InvalidConfig("editor command is empty".into()));
    }
    Ok(argv)
}

/// Run the configured editor command with `path` appended.
async fn launch(command: &str, path: &Path) -> Result<()> {
    let argv = editor_argv(command)?;
    let status = tokio::process::Command::new(&argv[0])
        .args(&argv[1..])
        .arg(path)
        .status()
        .await?;
    if !status.success() {
        return Err(AppError::Io(std::io::Error::other(format!(
            "`{}` exited with {}",
            command, status
        ))));
    }
    Ok(())
}

/// Interactive picker loop on the alternate screen.
async fn run_picker(mut picker: Picker) -> Result<PickerOutcome> {
    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(100));

    let session = drive(&mut tui, &mut events, &mut picker).await;
    tui.restore()?;
    session?;

    Ok(picker.outcome().unwrap_or(PickerOutcome::Dismissed))
}

async fn drive(tui: &mut Tui, events: &mut EventHandler, picker: &mut Picker) -> Result<()> {
    while !picker.is_finished() {
        tui.terminal_mut().draw(|frame| ui::render(picker, frame))?;
        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(picker, key),
            Event::Tick | Event::Resize => {}
        }
    }
    Ok(())
}

impl FileSearch for TerminalHost {
    async fn search_files(&self, query: &SearchQuery) -> Result<Vec<PathBuf>> {
        let query = query.clone();
        tokio::task::spawn_blocking(move || walk::search(&query))
            .await
            .map_err(join_error)?
    }
}

impl Host for TerminalHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.active.clone()
    }

    fn workspace_root(&self) -> PathBuf {
        self.workspace.clone()
    }

    fn configuration(&self) -> Result<Configuration> {
        self.app_config().configuration()
    }

    async fn open_file(&mut self, path: &Path) -> Result<()> {
        let is_file = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(AppError::NotFound(path.display().to_string()));
        }

        match self.app_config().editor() {
            Some(command) => launch(command, path).await?,
            None => println!("{}", path.display()),
        }
        tracing::info!(path = %path.display(), "opened file");
        Ok(())
    }

    async fn create_file_if_absent(&mut self, path: &Path) -> Result<bool> {
        let target = path.to_path_buf();
        let created = tokio::task::spawn_blocking(move || {
            operations::create_file_if_absent(&target)
        })
        .await
        .map_err(join_error)??;
        if created {
            tracing::info!(path = %path.display(), "created file");
        }
        Ok(created)
    }

    async fn show_picker(&mut self, mut picker: Picker) -> Result<PickerOutcome> {
        if let Some(query) = &self.preset_query {
            picker.set_query(query.clone());
        }
        if !self.interactive {
            self.print_listing(&picker)?;
            return Ok(PickerOutcome::Dismissed);
        }
        run_picker(picker).await
    }

    fn notify_error(&mut self, message: &str) {
        tracing::debug!(%message, "reporting error");
        eprintln!("error: {}", message);
    }
}
