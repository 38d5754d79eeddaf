//! M3U8 playlist reading.
//!
//! A [`Playlist`] is validated once on open and can then be iterated any
//! number of times; every call to [`Playlist::entries`] re-reads the file
//! from the start. Entries are resolved against a base directory and
//! normalized lexically, the way a shell would print them, without touching
//! symlinks.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub const PLAYLIST_EXTENSION: &str = "m3u8";

const BOM: char = '\u{feff}';

/// A validated playlist file
#[derive(Debug, Clone)]
pub struct Playlist {
    path: PathBuf,
    base_dir: PathBuf,
}

/// One candidate line of a playlist, resolved to a filesystem path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// 1-based line number in the playlist file
    pub line: usize,
    pub path: PathBuf,
    pub exists: bool,
}

impl Playlist {
    /// Open a playlist, rejecting anything that is not an existing `.m3u8` file.
    pub fn open(path: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !has_playlist_extension(&path) {
            return Err(Error::Playlist(format!(
                "Input file must be an .{} playlist: {}",
                PLAYLIST_EXTENSION,
                path.display()
            )));
        }

        if !path.exists() {
            return Err(Error::Playlist(format!(
                "Input playlist {} does not exist",
                path.display()
            )));
        }

        Ok(Self {
            path,
            base_dir: base_dir.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Lazily iterate candidate entries from the start of the file.
    pub fn entries(&self) -> Result<Entries<'_>> {
        let file = File::open(&self.path)?;
        Ok(Entries {
            lines: BufReader::new(file).lines(),
            base_dir: &self.base_dir,
            line: 0,
        })
    }

    /// Number of candidate (non-empty, non-comment) lines.
    pub fn candidate_count(&self) -> Result<usize> {
        let file = File::open(&self.path)?;
        let mut count = 0;
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if candidate_line(&line, index == 0).is_some() {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Iterator over the entries of a [`Playlist`]
pub struct Entries<'a> {
    lines: Lines<BufReader<File>>,
    base_dir: &'a Path,
    line: usize,
}

impl Iterator for Entries<'_> {
    type Item = Result<PlaylistEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.lines.next()? {
                Ok(raw) => raw,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;

            let Some(candidate) = candidate_line(&raw, self.line == 1) else {
                continue;
            };

            let path = resolve_entry(candidate, self.base_dir);
            let exists = path.exists();
            debug!(line = self.line, path = %path.display(), exists, "playlist entry");

            return Some(Ok(PlaylistEntry {
                line: self.line,
                path,
                exists,
            }));
        }
    }
}

/// Case-insensitive check for the `.m3u8` extension
pub fn has_playlist_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PLAYLIST_EXTENSION))
}

/// Trimmed entry text, or `None` for blank and `#` comment lines
fn candidate_line(raw: &str, first: bool) -> Option<&str> {
    let raw = if first {
        raw.strip_prefix(BOM).unwrap_or(raw)
    } else {
        raw
    };
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}

/// Join relative entries onto `base_dir`, then normalize.
pub fn resolve_entry(entry: &str, base_dir: &Path) -> PathBuf {
    let entry = Path::new(entry);
    if entry.is_absolute() {
        normalize_path(entry)
    } else {
        normalize_path(&base_dir.join(entry))
    }
}

/// Lexically collapse `.` and `..` components.
///
/// `..` directly under a root is dropped; leading `..` in a relative path is
/// kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                Some(Component::ParentDir) | Some(Component::CurDir) | None => {
                    out.push("..");
                }
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_playlist(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_open_rejects_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_playlist(&dir, "list.m3u", "a.mp3\n");
        let err = Playlist::open(&path, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Playlist(_)));
        assert!(err.to_string().contains(".m3u8"));
    }

    #[test]
    fn test_open_accepts_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_playlist(&dir, "LIST.M3U8", "a.mp3\n");
        assert!(Playlist::open(&path, dir.path()).is_ok());
    }

    #[test]
    fn test_open_rejects_missing_playlist() {
        let dir = TempDir::new().unwrap();
        let err = Playlist::open(dir.path().join("gone.m3u8"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_entries_skip_comments_and_blanks() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        let path = write_playlist(
            &dir,
            "list.m3u8",
            "#EXTM3U\n\n#EXTINF:123,Band - Song\na.mp3\n   \nmissing.flac\n",
        );
        let playlist = Playlist::open(&path, dir.path()).unwrap();

        let entries: Vec<_> = playlist.entries().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].line, 4);
        assert_eq!(entries[0].path, dir.path().join("a.mp3"));
        assert!(entries[0].exists);

        assert_eq!(entries[1].line, 6);
        assert_eq!(entries[1].path, dir.path().join("missing.flac"));
        assert!(!entries[1].exists);

        assert_eq!(playlist.candidate_count().unwrap(), 2);
    }

    #[test]
    fn test_entries_are_restartable() {
        let dir = TempDir::new().unwrap();
        let path = write_playlist(&dir, "list.m3u8", "a.mp3\nb.mp3\n");
        let playlist = Playlist::open(&path, dir.path()).unwrap();

        let first: Vec<_> = playlist.entries().unwrap().map(|e| e.unwrap()).collect();
        let second: Vec<_> = playlist.entries().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_entries_trim_whitespace_and_bom() {
        let dir = TempDir::new().unwrap();
        let path = write_playlist(&dir, "list.m3u8", "\u{feff}#EXTM3U\r\n  a.mp3  \r\n");
        let playlist = Playlist::open(&path, dir.path()).unwrap();

        let entries: Vec<_> = playlist.entries().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, dir.path().join("a.mp3"));
    }

    #[test]
    fn test_absolute_entries_ignore_base_dir() {
        let dir = TempDir::new().unwrap();
        let track = dir.path().join("abs.mp3");
        fs::write(&track, b"x").unwrap();
        let path = write_playlist(&dir, "list.m3u8", &format!("{}\n", track.display()));
        let playlist = Playlist::open(&path, "/somewhere/else").unwrap();

        let entries: Vec<_> = playlist.entries().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(entries[0].path, track);
        assert!(entries[0].exists);
    }

    #[test]
    fn test_resolve_entry_relative() {
        assert_eq!(
            resolve_entry("Artist/../Other/./song.mp3", Path::new("/music")),
            PathBuf::from("/music/Other/song.mp3")
        );
        assert_eq!(
            resolve_entry("/a/b/../c.mp3", Path::new("/music")),
            PathBuf::from("/a/c.mp3")
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b//c")), PathBuf::from("/a/b/c"));
        assert_eq!(normalize_path(Path::new("/a/b/../../..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("a/../..")), PathBuf::from(".."));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("./a")), PathBuf::from("a"));
    }
}
