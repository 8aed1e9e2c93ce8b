//! File discovery and merge ordering.
//!
//! Scans the top level of the input directory for files with the target
//! container extension (case-insensitive) and fixes the order the files
//! are merged in. The order is computed once here and never re-derived
//! by later stages.

use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// How the discovered files were ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOrder {
    /// Every file stem parsed as an unsigned integer; sorted by value.
    Numeric,
    /// At least one stem was non-numeric; sorted lexically by filename.
    Lexical,
}

/// Finds input files in `input_dir` and returns them in merge order.
///
/// The ordering policy is all-or-nothing: files are sorted by the integer
/// value of their stem only when *every* stem parses as an unsigned
/// integer. A single non-numeric name (e.g. `10x.mp4` next to `1.mp4`)
/// forces lexical ordering for the whole set.
///
/// Subdirectories are not searched. Returns `CoreError::NoFilesFound`
/// when nothing matches.
pub fn find_video_files(
    input_dir: &Path,
    extension: &str,
) -> CoreResult<(Vec<PathBuf>, MergeOrder)> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() {
                return None;
            }

            path.extension()
                .and_then(|ext| ext.to_str())
                .filter(|ext_str| ext_str.eq_ignore_ascii_case(extension))
                .map(|_| path.clone())
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound {
            extension: extension.to_string(),
            dir: input_dir.to_path_buf(),
        });
    }

    let order = if files.iter().all(|p| numeric_stem(p).is_some()) {
        files.sort_by_key(|p| numeric_stem(p).unwrap_or(u64::MAX));
        MergeOrder::Numeric
    } else {
        files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
        MergeOrder::Lexical
    };

    log::info!(
        "Found {} .{} file(s) in {} ({:?} order)",
        files.len(),
        extension,
        input_dir.display(),
        order
    );

    Ok((files, order))
}

/// Parses the file stem as an unsigned integer, if it is one.
fn numeric_stem(path: &Path) -> Option<u64> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_stem() {
        assert_eq!(numeric_stem(Path::new("video/10.mp4")), Some(10));
        assert_eq!(numeric_stem(Path::new("0.mp4")), Some(0));
        assert_eq!(numeric_stem(Path::new("10x.mp4")), None);
        assert_eq!(numeric_stem(Path::new("clip.mp4")), None);
        assert_eq!(numeric_stem(Path::new("-1.mp4")), None);
    }
}
