//! Tag reading for the dedupe pipeline.
//!
//! [`LoftySource`] picks an [`AudioFormat`] from the file extension, forces
//! the matching lofty reader and pulls title, artist and album from the
//! container's native tag, falling back to whatever other tag the file
//! carries.

mod format;

pub use format::AudioFormat;

use dedupe_core::{ExtractError, MetadataSource, TrackMetadata};
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag};
use std::path::Path;
use tracing::debug;

/// [`MetadataSource`] backed by lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftySource;

impl MetadataSource for LoftySource {
    fn extract(&self, path: &Path) -> Result<TrackMetadata, ExtractError> {
        let format = AudioFormat::from_path(path).ok_or(ExtractError::Unsupported)?;
        read_metadata(path, format)
    }
}

/// Read tags from `path` as the given container format.
pub fn read_metadata(path: &Path, format: AudioFormat) -> Result<TrackMetadata, ExtractError> {
    let file_type = format.file_type().ok_or(ExtractError::Unsupported)?;

    let tagged_file = Probe::open(path)
        .and_then(|probe| probe.set_file_type(file_type).read())
        .map_err(|e| ExtractError::Failed(e.to_string()))?;

    let Some(tag) = select_tag(&tagged_file, format) else {
        debug!(path = %path.display(), "no tags, using defaults");
        return Ok(TrackMetadata::default());
    };
    debug!(path = %path.display(), tag_type = ?tag.tag_type(), "reading tag");

    Ok(TrackMetadata::from_tags(
        tag.title().map(|v| v.into_owned()),
        tag.artist().map(|v| v.into_owned()),
        tag.album().map(|v| v.into_owned()),
    ))
}

fn select_tag(tagged_file: &TaggedFile, format: AudioFormat) -> Option<&Tag> {
    format
        .preferred_tag()
        .and_then(|tag_type| tagged_file.tag(tag_type))
        .or_else(|| tagged_file.primary_tag())
        .or_else(|| tagged_file.first_tag())
}
