use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;

use crate::error::Result;
use crate::search::{SearchQuery, SearchScope};

/// Run a file search against the real filesystem.
///
/// Patterns match the path relative to the scope root, with `*` never
/// crossing a separator. Results come back sorted by path.
pub fn search(query: &SearchQuery) -> Result<Vec<PathBuf>> {
    let pattern = compile(&query.pattern)?;
    let exclude = query.exclude.as_deref().map(compile).transpose()?;

    let mut found = match &query.scope {
        SearchScope::Directory(dir) => list_directory(dir, &pattern, exclude.as_ref())?,
        SearchScope::Recursive(root) => {
            walk_recursive(root, &pattern, exclude.as_ref(), query.respect_ignore)
        }
    };
    found.sort();

    tracing::debug!(
        scope = ?query.scope,
        pattern = %query.pattern,
        matches = found.len(),
        "file search finished"
    );
    Ok(found)
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

fn accepts(relative: &Path, pattern: &GlobMatcher, exclude: Option<&GlobMatcher>) -> bool {
    pattern.is_match(relative) && !exclude.is_some_and(|e| e.is_match(relative))
}

/// Non-recursive listing. A missing directory yields no results.
fn list_directory(
    dir: &Path,
    pattern: &GlobMatcher,
    exclude: Option<&GlobMatcher>,
) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if accepts(Path::new(&entry.file_name()), pattern, exclude) {
            found.push(path);
        }
    }
    Ok(found)
}

/// Recursive walk. With `respect_ignore`, hidden entries and whatever
/// `.gitignore`/`.ignore` files exclude are skipped. Unreadable entries are
/// always skipped.
fn walk_recursive(
    root: &Path,
    pattern: &GlobMatcher,
    exclude: Option<&GlobMatcher>,
    respect_ignore: bool,
) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(respect_ignore)
        .build();

    walker
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let path = entry.into_path();
            let keep = path
                .strip_prefix(root)
                .is_ok_and(|relative| accepts(relative, pattern, exclude));
            keep.then_some(path)
        })
        .collect()
}
