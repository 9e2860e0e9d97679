//! Source <-> test path mapping under the configured naming convention.

use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::error::{AppError, Result};
use crate::path::grammar::{self, FileName};

/// Outcome of a counterpart resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    /// A single concrete path, which may or may not exist yet.
    Concrete(PathBuf),
    /// Any file in `directory` whose name minus extension is `stem`.
    Ambiguous { directory: PathBuf, stem: String },
}

impl ResolvedPath {
    fn new(directory: PathBuf, name: FileName) -> Self {
        match name {
            FileName::Exact(name) => ResolvedPath::Concrete(directory.join(name)),
            FileName::AnyExtension(stem) => ResolvedPath::Ambiguous { directory, stem },
        }
    }

    /// The path, when it is concrete.
    #[cfg(test)]
    pub fn concrete(&self) -> Option<&Path> {
        match self {
            ResolvedPath::Concrete(path) => Some(path),
            ResolvedPath::Ambiguous { .. } => None,
        }
    }
}

/// Whether the file name of `path` contains `.{suffix}.` followed by an
/// extension (one or more word characters) or the wildcard marker.
pub fn is_test_file(path: &Path, suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    let Some(name) = grammar::file_name(path) else {
        return false;
    };
    let marker = format!(".{}.", suffix);
    name.match_indices(&marker).any(|(at, _)| {
        name[at + marker.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '*')
    })
}

fn split_path(path: &Path) -> Result<(PathBuf, String)> {
    let name = grammar::file_name(path)
        .ok_or_else(|| AppError::InvalidPath(format!("{} has no file name", path.display())))?;
    Ok((grammar::parent_directory(path), name))
}

/// Map a test file to the source file it covers.
///
/// Leaves the test sub-folder when the test sits directly inside one.
/// The result may name a file that does not exist.
pub fn resolve_source_path(test_path: &Path, config: &Configuration) -> Result<ResolvedPath> {
    let (dir, name) = split_path(test_path)?;
    let source_dir = if grammar::is_test_sub_folder(&dir, &config.test_sub_folder) {
        grammar::parent_directory(&dir)
    } else {
        dir
    };
    let source_name =
        grammar::remove_test_suffix(&name, &config.test_file_suffix, config.match_extension)?;

    let resolved = ResolvedPath::new(source_dir, source_name);
    tracing::debug!(test = %test_path.display(), ?resolved, "resolved source path");
    Ok(resolved)
}

/// Map a source file to its test file.
///
/// `exact` requests a path that can be created, so the extension is never
/// left open.
pub fn resolve_test_path(
    source_path: &Path,
    config: &Configuration,
    exact: bool,
) -> Result<ResolvedPath> {
    let (dir, name) = split_path(source_path)?;
    let test_dir = if config.test_sub_folder.is_empty() {
        dir
    } else {
        dir.join(&config.test_sub_folder)
    };
    let test_name = grammar::add_test_suffix(
        &name,
        &config.test_file_suffix,
        config.match_extension,
        exact,
        &config.test_file_extension,
    )?;

    let resolved = ResolvedPath::new(test_dir, test_name);
    tracing::debug!(source = %source_path.display(), exact, ?resolved, "resolved test path");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestFileExtension;

    fn config(sub_folder: &str, match_extension: bool) -> Configuration {
        Configuration {
            test_sub_folder: sub_folder.to_string(),
            match_extension,
            ..Default::default()
        }
    }

    #[test]
    fn detects_test_files() {
        assert!(is_test_file(Path::new("/w/tests/hasTest.test.ts"), "test"));
        assert!(is_test_file(Path::new("/w/a.test.*"), "test"));
        assert!(is_test_file(Path::new("/w/a.spec.js"), "spec"));
        assert!(!is_test_file(Path::new("/w/hasTest.ts"), "test"));
        assert!(!is_test_file(Path::new("/w/latest.ts"), "test"));
        assert!(!is_test_file(Path::new("/w/a.test."), "test"));
        assert!(!is_test_file(Path::new("/w/a.test.-x"), "test"));
    }

    #[test]
    fn test_directory_names_do_not_count() {
        assert!(!is_test_file(Path::new("/w/fixtures.test.d/a.ts"), "test"));
    }

    #[test]
    fn source_to_test_in_sub_folder() {
        let resolved =
            resolve_test_path(Path::new("/w/hasTest.ts"), &config("tests", true), false).unwrap();
        assert_eq!(
            resolved,
            ResolvedPath::Concrete(PathBuf::from("/w/tests/hasTest.test.ts"))
        );
    }

    #[test]
    fn source_to_test_same_folder() {
        let resolved =
            resolve_test_path(Path::new("/w/src/a.rs"), &config("", true), false).unwrap();
        assert_eq!(resolved.concrete(), Some(Path::new("/w/src/a.test.rs")));
    }

    #[test]
    fn source_to_test_lookup_without_matching_extension_is_ambiguous() {
        let resolved =
            resolve_test_path(Path::new("/w/view.tsx"), &config("tests", false), false).unwrap();
        assert_eq!(
            resolved,
            ResolvedPath::Ambiguous {
                directory: PathBuf::from("/w/tests"),
                stem: "view.test".into(),
            }
        );
    }

    #[test]
    fn source_to_test_exact_honors_extension_override() {
        let cfg = Configuration {
            match_extension: false,
            test_file_extension: TestFileExtension::Explicit("ts".into()),
            ..Default::default()
        };
        let resolved = resolve_test_path(Path::new("/w/view.tsx"), &cfg, true).unwrap();
        assert_eq!(resolved.concrete(), Some(Path::new("/w/tests/view.test.ts")));
    }

    #[test]
    fn test_to_source_leaves_sub_folder() {
        let resolved = resolve_source_path(
            Path::new("/w/tests/hasTest.test.ts"),
            &config("tests", true),
        )
        .unwrap();
        assert_eq!(resolved.concrete(), Some(Path::new("/w/hasTest.ts")));
    }

    #[test]
    fn test_to_source_outside_sub_folder_stays() {
        let resolved =
            resolve_source_path(Path::new("/w/src/a.test.ts"), &config("tests", true)).unwrap();
        assert_eq!(resolved.concrete(), Some(Path::new("/w/src/a.ts")));
    }

    #[test]
    fn test_to_source_without_matching_extension() {
        let resolved = resolve_source_path(
            Path::new("/w/tests/hasTest.test.ts"),
            &config("tests", false),
        )
        .unwrap();
        assert_eq!(
            resolved,
            ResolvedPath::Ambiguous {
                directory: PathBuf::from("/w"),
                stem: "hasTest".into(),
            }
        );
    }

    #[test]
    fn every_test_file_maps_to_a_source_path() {
        let cfg = config("tests", true);
        for (test, source) in [
            ("/w/tests/foo.test.ts.snap", "/w/foo.ts.snap"),
            ("/w/jest.test.config.js", "/w/jest.config.js"),
        ] {
            assert!(is_test_file(Path::new(test), "test"));
            let resolved = resolve_source_path(Path::new(test), &cfg).unwrap();
            assert_eq!(resolved.concrete(), Some(Path::new(source)));
        }
    }

    #[test]
    fn round_trip_restores_file_name() {
        let cfg = config("tests", true);
        for source in ["/w/a.ts", "/w/src/app.module.ts", "/w/x_y.rs", "/w/Page.tsx"] {
            let test = resolve_test_path(Path::new(source), &cfg, true).unwrap();
            let test = test.concrete().unwrap().to_path_buf();
            assert!(is_test_file(&test, &cfg.test_file_suffix));
            let back = resolve_source_path(&test, &cfg).unwrap();
            assert_eq!(back.concrete(), Some(Path::new(source)));
        }
    }

    #[test]
    fn exact_test_path_is_always_a_test_file() {
        let cfg = Configuration {
            test_file_suffix: "spec".into(),
            match_extension: false,
            ..Default::default()
        };
        let test = resolve_test_path(Path::new("/w/a.js"), &cfg, true).unwrap();
        assert!(is_test_file(test.concrete().unwrap(), "spec"));
    }

    #[test]
    fn source_without_extension_is_malformed() {
        let err = resolve_test_path(Path::new("/w/Makefile"), &config("", true), true);
        assert!(matches!(err, Err(AppError::MalformedName(_))));
    }
}
