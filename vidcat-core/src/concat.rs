//! Concat list construction.
//!
//! The ffmpeg concat demuxer consumes a text manifest with one
//! `file '<path>'` line per input. The list is scoped to exactly one merge
//! invocation: it is backed by a `NamedTempFile`, so dropping the
//! `ConcatList` removes it on every exit path, including panics.

use crate::error::{CoreError, CoreResult};
use crate::media::VideoInfo;

use std::io::Write;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, NamedTempFile};

/// The on-disk manifest handed to `ffmpeg -f concat`.
pub struct ConcatList {
    file: NamedTempFile,
}

impl ConcatList {
    /// Writes the manifest for `videos`, in order, into a temp file under
    /// `dir`. The directory is created if absent.
    ///
    /// Entries are absolutized first: the concat demuxer resolves relative
    /// entries against the directory containing the list file, not the
    /// caller's working directory, and the list does not live next to the
    /// inputs.
    pub fn create(dir: &Path, videos: &[VideoInfo]) -> CoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        let mut file = TempFileBuilder::new()
            .prefix("concat_")
            .suffix(".txt")
            .tempfile_in(dir)
            .map_err(CoreError::ListWrite)?;

        let entries: Vec<_> = videos
            .iter()
            .map(|v| std::path::absolute(&v.path))
            .collect::<std::io::Result<_>>()
            .map_err(CoreError::ListWrite)?;

        write_entries(file.as_file_mut(), entries.iter().map(|p| p.as_path()))
            .map_err(CoreError::ListWrite)?;
        file.as_file_mut().flush().map_err(CoreError::ListWrite)?;

        log::debug!("Wrote concat list: {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Writes `file '<path>'` lines for each path, in iteration order.
pub fn write_entries<'a, W, I>(writer: &mut W, paths: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Path>,
{
    for path in paths {
        writeln!(writer, "file '{}'", escape_path(path))?;
    }
    Ok(())
}

/// Quotes embedded single quotes for the concat demuxer.
///
/// Inside a single-quoted string the demuxer has no escape character, so a
/// literal quote is written by closing the string, emitting an escaped
/// quote, and reopening: `'` becomes `'\''`.
fn escape_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn video(path: &str) -> VideoInfo {
        VideoInfo {
            filename: Path::new(path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned(),
            path: PathBuf::from(path),
            duration_secs: 10.0,
            codec: "h264".to_string(),
            width: 1280,
            height: 720,
            bitrate_kbps: 2000,
            fps: 30.0,
        }
    }

    #[test]
    fn test_write_entries_format_and_order() {
        let paths = [
            PathBuf::from("video/1.mp4"),
            PathBuf::from("video/2.mp4"),
            PathBuf::from("video/10.mp4"),
        ];
        let mut buf = Vec::new();
        write_entries(&mut buf, paths.iter().map(|p| p.as_path())).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file 'video/1.mp4'",
                "file 'video/2.mp4'",
                "file 'video/10.mp4'",
            ]
        );
    }

    #[test]
    fn test_escapes_embedded_single_quotes() {
        let mut buf = Vec::new();
        write_entries(&mut buf, [Path::new("video/it's here.mp4")]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "file 'video/it'\\''s here.mp4'\n"
        );
    }

    #[test]
    fn test_entries_resolve_independently_of_list_location() {
        // Inputs are discovered as paths relative to the caller's working
        // directory, but the list lives in the output directory. The
        // demuxer joins relative entries onto the list's own directory,
        // so every written entry must come out absolute.
        let dir = tempfile::tempdir().unwrap();
        let videos = vec![video("video/1.mp4"), video("video/2.mp4")];

        let list = ConcatList::create(dir.path(), &videos).unwrap();
        let contents = std::fs::read_to_string(list.path()).unwrap();

        for line in contents.lines() {
            let entry = line
                .strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .unwrap();
            let entry = Path::new(entry);
            assert!(entry.is_absolute(), "entry {entry:?} is not absolute");
            // joining onto the list's directory must not relocate it
            assert_eq!(list.path().parent().unwrap().join(entry), entry);
        }
    }

    #[test]
    fn test_list_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let videos = vec![video("video/1.mp4"), video("video/2.mp4")];

        let list_path = {
            let list = ConcatList::create(dir.path(), &videos).unwrap();
            let path = list.path().to_path_buf();
            assert!(path.exists());

            let contents = std::fs::read_to_string(&path).unwrap();
            assert_eq!(contents.lines().count(), 2);
            path
        };

        assert!(!list_path.exists());
    }
}
