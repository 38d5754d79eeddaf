//! End-to-end dedupe run: playlist -> metadata -> groups -> report.
//!
//! Everything runs on the calling thread, strictly in playlist order. Callers
//! follow progress through a [`ScanObserver`]; the `Display` text of each
//! [`ScanEvent`] is the stable log line for that event.

use crate::config::{RenderMode, RunConfig};
use crate::error::Result;
use crate::group::GroupTable;
use crate::metadata::{ExtractError, MetadataSource};
use crate::playlist::Playlist;
use crate::render::render;
use crate::types::TrackRecord;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A progress event is emitted after every this many playlist entries.
pub const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Progress { processed: usize, total: usize },
    FileNotFound { path: PathBuf },
    Unsupported { path: PathBuf },
    ExtractionFailed { path: PathBuf, detail: String },
    ReportWritten { path: PathBuf },
    NoDuplicates,
    /// Detailed output was written, so single-line and grouping options were ignored
    GroupingDisabled,
}

impl ScanEvent {
    /// Per-entry problems that were skipped
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ScanEvent::FileNotFound { .. }
                | ScanEvent::Unsupported { .. }
                | ScanEvent::ExtractionFailed { .. }
        )
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanEvent::Progress { processed, total } => {
                write!(f, "Processed {}/{} files...", processed, total)
            }
            ScanEvent::FileNotFound { path } => write!(f, "File not found: {}", path.display()),
            ScanEvent::Unsupported { path } => {
                write!(f, "Unsupported file format: {}", path.display())
            }
            ScanEvent::ExtractionFailed { path, detail } => write!(
                f,
                "Error reading metadata for {}: {}",
                path.display(),
                detail
            ),
            ScanEvent::ReportWritten { path } => {
                write!(f, "Duplicate tracks written to {}", path.display())
            }
            ScanEvent::NoDuplicates => write!(f, "No duplicate tracks found"),
            ScanEvent::GroupingDisabled => write!(f, "Grouping flags disabled for Info output"),
        }
    }
}

/// Receives [`ScanEvent`]s as a run progresses
pub trait ScanObserver {
    fn on_event(&mut self, event: &ScanEvent);
}

impl<F: FnMut(&ScanEvent)> ScanObserver for F {
    fn on_event(&mut self, event: &ScanEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`: warnings at WARN, everything else at INFO
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ScanObserver for LogObserver {
    fn on_event(&mut self, event: &ScanEvent) {
        if event.is_warning() {
            warn!("{}", event);
        } else {
            info!("{}", event);
        }
    }
}

/// Counters collected while scanning a playlist
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Candidate lines in the playlist
    pub candidates: usize,
    pub processed: usize,
    pub missing: usize,
    pub unsupported: usize,
    pub failed: usize,
    /// Tracks that made it into the group table
    pub tracks: usize,
}

/// Result of [`scan`]
#[derive(Debug)]
pub struct Scan {
    pub table: GroupTable,
    pub stats: ScanStats,
}

/// Read every playlist entry, extract its metadata and group the results.
///
/// Missing files, unsupported formats and extraction failures are reported
/// to `observer` and skipped. Only I/O errors on the playlist itself fail.
pub fn scan<S, O>(playlist: &Playlist, source: &S, observer: &mut O) -> Result<Scan>
where
    S: MetadataSource + ?Sized,
    O: ScanObserver + ?Sized,
{
    let mut stats = ScanStats {
        candidates: playlist.candidate_count()?,
        ..ScanStats::default()
    };
    let mut table = GroupTable::new();

    for entry in playlist.entries()? {
        let entry = entry?;

        if !entry.exists {
            stats.missing += 1;
            observer.on_event(&ScanEvent::FileNotFound { path: entry.path });
        } else {
            match source.extract(&entry.path) {
                Ok(metadata) => {
                    debug!(
                        title = %metadata.title,
                        artist = %metadata.artist,
                        path = %entry.path.display(),
                        "extracted"
                    );
                    table.insert(TrackRecord::new(metadata, entry.path));
                    stats.tracks += 1;
                }
                Err(ExtractError::Unsupported) => {
                    stats.unsupported += 1;
                    observer.on_event(&ScanEvent::Unsupported { path: entry.path });
                }
                Err(ExtractError::Failed(detail)) => {
                    stats.failed += 1;
                    observer.on_event(&ScanEvent::ExtractionFailed {
                        path: entry.path,
                        detail,
                    });
                }
            }
        }

        stats.processed += 1;
        if stats.processed % PROGRESS_INTERVAL == 0 {
            observer.on_event(&ScanEvent::Progress {
                processed: stats.processed,
                total: stats.candidates,
            });
        }
    }

    Ok(Scan { table, stats })
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A report with `groups` duplicate keys was written to `path`
    Written { path: PathBuf, groups: usize },
    /// Nothing to report; no file was created or overwritten
    NoDuplicates,
}

/// Everything needed for one dedupe run
#[derive(Debug, Clone)]
pub struct Job {
    pub playlist: PathBuf,
    /// Directory that relative playlist entries are resolved against
    pub base_dir: PathBuf,
    pub output: PathBuf,
    pub config: RunConfig,
}

impl Job {
    /// Run the whole pipeline.
    ///
    /// Fails before reading any track if the playlist is missing or is not an
    /// `.m3u8` file. The report is only written when duplicates exist.
    pub fn run<S, O>(&self, source: &S, observer: &mut O) -> Result<Outcome>
    where
        S: MetadataSource + ?Sized,
        O: ScanObserver + ?Sized,
    {
        let playlist = Playlist::open(&self.playlist, &self.base_dir)?;
        let Scan { table, stats } = scan(&playlist, source, &mut *observer)?;
        debug!(?stats, keys = table.len(), "scan complete");

        let duplicates = table.duplicates();
        if duplicates.is_empty() {
            observer.on_event(&ScanEvent::NoDuplicates);
            return Ok(Outcome::NoDuplicates);
        }

        let mode = self.config.mode();
        let text = render(&duplicates, mode);
        write_report(&self.output, &text)?;

        if mode == RenderMode::Detailed {
            observer.on_event(&ScanEvent::GroupingDisabled);
        }
        observer.on_event(&ScanEvent::ReportWritten {
            path: self.output.clone(),
        });

        Ok(Outcome::Written {
            path: self.output.clone(),
            groups: duplicates.len(),
        })
    }
}

/// Write `text` to `path` through a temporary file beside the destination,
/// so a failed write never leaves a truncated report behind.
///
/// A symlinked `path` updates the file it points to. An existing report keeps
/// its permissions; a new one gets the usual umask-filtered default.
pub fn write_report(path: &Path, text: &str) -> Result<()> {
    let target = resolve_report_target(path)?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".report").suffix(".tmp");
    if existing.is_none() {
        if let Some(permissions) = new_file_permissions() {
            builder.permissions(permissions);
        }
    }

    let mut file = builder.tempfile_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    if let Some(permissions) = existing {
        file.as_file().set_permissions(permissions)?;
    }
    file.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Follow symlinks so the link itself is never replaced. Dangling links
/// resolve to the path they name.
fn resolve_report_target(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }

    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let link = fs::read_link(path)?;
            Ok(match path.parent() {
                Some(parent) => parent.join(link),
                None => link,
            })
        }
        _ => Ok(path.to_path_buf()),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}
