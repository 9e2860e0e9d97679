//! Candidate search: scoped file queries narrowed to the exact name shapes
//! the commands care about.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::path::grammar;

/// Where a search looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Direct children of one directory.
    Directory(PathBuf),
    /// Everything below a root, recursively.
    Recursive(PathBuf),
}

/// A glob-style file query. Patterns are case-sensitive and are matched
/// against the path relative to the scope's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub scope: SearchScope,
    pub pattern: String,
    pub exclude: Option<String>,
    /// Recursive scope only: skip hidden and ignored entries.
    pub respect_ignore: bool,
}

impl SearchQuery {
    pub fn directory(dir: impl Into<PathBuf>, pattern: &str) -> Self {
        Self {
            scope: SearchScope::Directory(dir.into()),
            pattern: pattern.to_string(),
            exclude: None,
            respect_ignore: true,
        }
    }

    pub fn recursive(root: impl Into<PathBuf>, pattern: &str, exclude: Option<String>) -> Self {
        Self {
            scope: SearchScope::Recursive(root.into()),
            pattern: pattern.to_string(),
            exclude,
            respect_ignore: true,
        }
    }

    pub fn respecting_ignore(mut self, respect: bool) -> Self {
        self.respect_ignore = respect;
        self
    }
}

/// The file-search capability.
#[allow(async_fn_in_trait)]
pub trait FileSearch {
    async fn search_files(&self, query: &SearchQuery) -> Result<Vec<PathBuf>>;
}

/// A path proposed to the user, with what they read and filter on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub label: String,
    pub detail: String,
}

impl Candidate {
    pub fn new(path: PathBuf, label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            path,
            label: label.into(),
            detail: detail.into(),
        }
    }

    /// Labelled by file name, detailed by the full path.
    pub fn from_file(path: PathBuf) -> Self {
        let label = grammar::file_name(&path).unwrap_or_default();
        let detail = path.display().to_string();
        Self::new(path, label, detail)
    }

    /// Labelled by the containing directory's name, detailed by the path
    /// relative to `root`.
    pub fn from_workspace_file(path: PathBuf, root: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let dir = relative.parent().filter(|p| !p.as_os_str().is_empty());
        let label = match dir {
            Some(dir) => grammar::file_name(dir),
            None => grammar::file_name(root),
        }
        .unwrap_or_else(|| ".".to_string());
        let detail = relative.display().to_string();
        Self::new(path, label, detail)
    }

    /// Ranking key: label, then detail, both lowercased.
    pub fn sort_key(&self) -> (String, String) {
        (self.label.to_lowercase(), self.detail.to_lowercase())
    }
}

/// `index.<ext>` with exactly one dot; `index.test.ts` does not qualify.
pub fn is_index_file_name(name: &str) -> bool {
    name.strip_prefix("index.")
        .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'))
}

fn is_index_file(path: &Path) -> bool {
    grammar::file_name(path).is_some_and(|name| is_index_file_name(&name))
}

/// Files in `directory` whose name minus its final extension is `stem`,
/// sorted by path.
pub async fn find_siblings_by_stem<S: FileSearch>(
    search: &S,
    directory: &Path,
    stem: &str,
    case_insensitive: bool,
) -> Result<Vec<Candidate>> {
    let wanted = if case_insensitive {
        stem.to_lowercase()
    } else {
        stem.to_string()
    };
    let same_stem = |path: &PathBuf| {
        grammar::filename_without_extension(path).is_some_and(|s| {
            if case_insensitive {
                s.to_lowercase() == wanted
            } else {
                s == wanted
            }
        })
    };

    let mut paths: Vec<PathBuf> = search
        .search_files(&SearchQuery::directory(directory, "*.*"))
        .await?
        .into_iter()
        .filter(same_stem)
        .collect();
    paths.sort();

    Ok(paths.into_iter().map(Candidate::from_file).collect())
}

/// Index files directly inside `directory`, sorted by path.
pub async fn find_index_files<S: FileSearch>(
    search: &S,
    directory: &Path,
) -> Result<Vec<Candidate>> {
    let mut paths: Vec<PathBuf> = search
        .search_files(&SearchQuery::directory(directory, "index.*"))
        .await?
        .into_iter()
        .filter(|p| is_index_file(p))
        .collect();
    paths.sort();

    Ok(paths.into_iter().map(Candidate::from_file).collect())
}

/// Every index file under `root` except `current`, sorted by path.
/// With `respect_ignore`, hidden and gitignored paths are left out.
pub async fn find_all_index_files_in_workspace<S: FileSearch>(
    search: &S,
    root: &Path,
    exclude: Option<&str>,
    respect_ignore: bool,
    current: Option<&Path>,
) -> Result<Vec<Candidate>> {
    let query = SearchQuery::recursive(root, "**/index.*", exclude.map(str::to_string))
        .respecting_ignore(respect_ignore);
    let mut paths: Vec<PathBuf> = search
        .search_files(&query)
        .await?
        .into_iter()
        .filter(|p| is_index_file(p))
        .filter(|p| current != Some(p.as_path()))
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|p| Candidate::from_workspace_file(p, root))
        .collect())
}
