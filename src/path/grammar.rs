//! Filename grammar: `{stem}.{suffix}.{extension}` splitting and joining.
//!
//! Everything here is pure string work on a single path component; nothing
//! touches the filesystem.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::TestFileExtension;
use crate::error::{AppError, Result};

/// Extension marker meaning "any extension, resolve by searching".
pub const WILDCARD_EXTENSION: &str = "*";

/// A file name produced by a suffix transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileName {
    /// A concrete `stem.ext` name.
    Exact(String),
    /// Only the stem is known; the extension must be found on disk.
    AnyExtension(String),
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileName::Exact(name) => f.write_str(name),
            FileName::AnyExtension(stem) => write!(f, "{}.{}", stem, WILDCARD_EXTENSION),
        }
    }
}

/// Split a file name on its last dot.
pub fn stem_and_extension(filename: &str) -> Result<(&str, &str)> {
    match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
            Ok((stem, extension))
        }
        _ => Err(AppError::MalformedName(format!(
            "`{}` has no extension",
            filename
        ))),
    }
}

/// `name.test.ts` -> `name.ts` (or `name.*` when extensions need not match).
///
/// The last `.{suffix}.` token is dropped wherever it sits, so
/// `foo.test.ts.snap` gives `foo.ts.snap`. A name without that token loses
/// the component just before its extension instead.
pub fn remove_test_suffix(
    test_filename: &str,
    suffix: &str,
    match_extension: bool,
) -> Result<FileName> {
    let marker = format!(".{}.", suffix);
    let source_filename = match test_filename.rmatch_indices(&marker).find(|(at, _)| *at > 0) {
        Some((at, _)) => format!(
            "{}.{}",
            &test_filename[..at],
            &test_filename[at + marker.len()..]
        ),
        None => {
            let (rest, extension) = stem_and_extension(test_filename)?;
            let stem = match rest.rsplit_once('.') {
                Some((front, _)) if !front.is_empty() => front,
                _ => rest,
            };
            format!("{}.{}", stem, extension)
        }
    };

    let (stem, extension) = stem_and_extension(&source_filename)?;
    if match_extension {
        Ok(FileName::Exact(format!("{}.{}", stem, extension)))
    } else {
        Ok(FileName::AnyExtension(stem.to_string()))
    }
}

/// `name.ts` -> `name.test.ts`.
///
/// Without `match_extension`, a lookup (`exact == false`) leaves the
/// extension open, while a creation (`exact == true`) needs a concrete one:
/// the configured override, or the source's own.
pub fn add_test_suffix(
    source_filename: &str,
    suffix: &str,
    match_extension: bool,
    exact: bool,
    extension_policy: &TestFileExtension,
) -> Result<FileName> {
    let (stem, extension) = stem_and_extension(source_filename)?;
    let test_stem = format!("{}.{}", stem, suffix);

    if match_extension {
        return Ok(FileName::Exact(format!("{}.{}", test_stem, extension)));
    }
    if !exact {
        return Ok(FileName::AnyExtension(test_stem));
    }
    let extension = match extension_policy {
        TestFileExtension::SameAsSource => extension,
        TestFileExtension::Explicit(ext) => ext.as_str(),
    };
    Ok(FileName::Exact(format!("{}.{}", test_stem, extension)))
}

/// The directory one level above `path`. The root is its own parent.
pub fn parent_directory(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// File name with its final extension removed (`a.test.ts` -> `a.test`).
pub fn filename_without_extension(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

/// Whether `dir` is itself a test sub-folder named `sub_folder`.
/// An empty `sub_folder` never matches.
pub fn is_test_sub_folder(dir: &Path, sub_folder: &str) -> bool {
    !sub_folder.is_empty() && dir.file_name().is_some_and(|name| name == sub_folder)
}

/// The last component of `path` as a string, if any.
pub fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}
