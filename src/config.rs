//! Configuration: TOML file loading, CLI overrides, defaults, and the
//! validated per-command snapshot.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--suffix`, `--sub-folder`, `--case-sensitive`, `--open-with`)
//! 2. `--config <path>`
//! 3. `$JSRC_CONFIG` environment variable (path to config file)
//! 4. Project-local `.jsrc.toml` in the current working directory
//! 5. Global `~/.config/jsrc/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};

// ── Section configs ──────────────────────────────────────────────────────────

/// General settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Command used to open files (path is appended). Unset prints the path.
    pub editor: Option<String>,
}

/// Test file naming conventions.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TestConfig {
    /// Token inserted before the extension of a test file.
    #[serde(alias = "testFileSuffix")]
    pub file_suffix: Option<String>,
    /// Folder, next to the source, holding its tests. Empty means same folder.
    #[serde(alias = "testSubFolder")]
    pub sub_folder: Option<String>,
    /// Whether a test keeps its source's extension.
    #[serde(alias = "matchExtension")]
    pub match_extension: Option<bool>,
    /// Extension for newly created tests: "sameAsSource" or an explicit one.
    #[serde(alias = "testFileExtension")]
    pub file_extension: Option<String>,
}

/// Picker filtering.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    #[serde(alias = "filterCaseSensitive")]
    pub case_sensitive: Option<bool>,
}

/// Workspace search.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// Glob of workspace-relative paths to leave out of recursive searches.
    #[serde(alias = "excludePattern")]
    pub exclude: Option<String>,
    /// Skip hidden entries and anything `.gitignore`/`.ignore` leaves out.
    #[serde(alias = "respectIgnore")]
    pub respect_ignore: Option<bool>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level configuration as read from files and flags.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub test: TestConfig,
    pub filter: FilterConfig,
    pub search: SearchConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

pub const DEFAULT_TEST_FILE_SUFFIX: &str = "test";
pub const DEFAULT_TEST_SUB_FOLDER: &str = "tests";
/// Sentinel for `test.file_extension` meaning "reuse the source extension".
pub const SAME_AS_SOURCE: &str = "sameAsSource";

/// Extension policy for test files created from a source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TestFileExtension {
    #[default]
    SameAsSource,
    Explicit(String),
}

impl TestFileExtension {
    /// Parse a config value. Leading dots are dropped, so `".spec.js"` is
    /// not accepted but `".js"` and `"js"` are equivalent.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim().trim_start_matches('.');
        if trimmed.is_empty() || trimmed == SAME_AS_SOURCE {
            TestFileExtension::SameAsSource
        } else {
            TestFileExtension::Explicit(trimmed.to_string())
        }
    }
}

/// Immutable, validated snapshot of the six naming options, taken once per
/// command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub test_file_suffix: String,
    pub test_sub_folder: String,
    pub match_extension: bool,
    pub filter_case_sensitive: bool,
    pub exclude_pattern: Option<String>,
    pub test_file_extension: TestFileExtension,
    pub respect_ignore: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            test_file_suffix: DEFAULT_TEST_FILE_SUFFIX.to_string(),
            test_sub_folder: DEFAULT_TEST_SUB_FOLDER.to_string(),
            match_extension: true,
            filter_case_sensitive: false,
            exclude_pattern: None,
            test_file_extension: TestFileExtension::SameAsSource,
            respect_ignore: true,
        }
    }
}

impl Configuration {
    /// Reject values that would make path patterns misbehave downstream.
    pub fn validate(self) -> Result<Self> {
        let suffix = &self.test_file_suffix;
        if suffix.is_empty() {
            return Err(AppError::MalformedName(
                "test file suffix must not be empty".into(),
            ));
        }
        if suffix.contains(['.', '/', '\\']) {
            return Err(AppError::MalformedName(format!(
                "test file suffix `{}` must not contain dots or path separators",
                suffix
            )));
        }
        if self.test_sub_folder.contains(['/', '\\']) || self.test_sub_folder == ".." {
            return Err(AppError::InvalidConfig(format!(
                "test sub-folder `{}` must be a single folder name",
                self.test_sub_folder
            )));
        }
        if let TestFileExtension::Explicit(ext) = &self.test_file_extension {
            if ext.contains(['.', '/', '\\', '*']) {
                return Err(AppError::InvalidConfig(format!(
                    "test file extension `{}` must be a single extension",
                    ext
                )));
            }
        }
        if let Some(pattern) = &self.exclude_pattern {
            globset::Glob::new(pattern)?;
        }
        Ok(self)
    }
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("JSRC_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".jsrc.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("jsrc").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                editor: other.general.editor.clone().or(self.general.editor),
            },
            test: TestConfig {
                file_suffix: other.test.file_suffix.clone().or(self.test.file_suffix),
                sub_folder: other.test.sub_folder.clone().or(self.test.sub_folder),
                match_extension: other.test.match_extension.or(self.test.match_extension),
                file_extension: other
                    .test
                    .file_extension
                    .clone()
                    .or(self.test.file_extension),
            },
            filter: FilterConfig {
                case_sensitive: other.filter.case_sensitive.or(self.filter.case_sensitive),
            },
            search: SearchConfig {
                exclude: other.search.exclude.clone().or(self.search.exclude),
                respect_ignore: other.search.respect_ignore.or(self.search.respect_ignore),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn test_file_suffix(&self) -> &str {
        self.test
            .file_suffix
            .as_deref()
            .unwrap_or(DEFAULT_TEST_FILE_SUFFIX)
    }

    pub fn test_sub_folder(&self) -> &str {
        self.test
            .sub_folder
            .as_deref()
            .unwrap_or(DEFAULT_TEST_SUB_FOLDER)
    }

    pub fn match_extension(&self) -> bool {
        self.test.match_extension.unwrap_or(true)
    }

    pub fn test_file_extension(&self) -> TestFileExtension {
        self.test
            .file_extension
            .as_deref()
            .map(TestFileExtension::parse)
            .unwrap_or_default()
    }

    pub fn filter_case_sensitive(&self) -> bool {
        self.filter.case_sensitive.unwrap_or(false)
    }

    /// Exclude glob; an empty string counts as unset.
    pub fn exclude_pattern(&self) -> Option<&str> {
        self.search
            .exclude
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    pub fn respect_ignore(&self) -> bool {
        self.search.respect_ignore.unwrap_or(true)
    }

    pub fn editor(&self) -> Option<&str> {
        self.general
            .editor
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Build and validate the snapshot used by one command.
    pub fn configuration(&self) -> Result<Configuration> {
        Configuration {
            test_file_suffix: self.test_file_suffix().trim().to_string(),
            test_sub_folder: self
                .test_sub_folder()
                .trim()
                .trim_end_matches(['/', '\\'])
                .to_string(),
            match_extension: self.match_extension(),
            filter_case_sensitive: self.filter_case_sensitive(),
            exclude_pattern: self.exclude_pattern().map(str::to_string),
            test_file_extension: self.test_file_extension(),
            respect_ignore: self.respect_ignore(),
        }
        .validate()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
