use std::path::{Path, PathBuf};

/// Placeholder used for any tag field the file does not carry.
pub const UNKNOWN: &str = "Unknown";

/// Tag fields returned by a metadata source for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl TrackMetadata {
    /// Build from optional tag values, substituting [`UNKNOWN`] for missing ones.
    pub fn from_tags(title: Option<String>, artist: Option<String>, album: Option<String>) -> Self {
        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN.to_string());
        Self {
            title: or_unknown(title),
            artist: or_unknown(artist),
            album: or_unknown(album),
        }
    }
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self::from_tags(None, None, None)
    }
}

/// One playlist entry with its extracted metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub path: PathBuf,
}

impl TrackRecord {
    pub fn new(metadata: TrackMetadata, path: impl Into<PathBuf>) -> Self {
        Self {
            title: metadata.title,
            artist: metadata.artist,
            album: metadata.album,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> DedupeKey {
        DedupeKey::new(&self.title, &self.artist)
    }
}

/// Grouping identity of a track: lower-cased title and artist.
///
/// Folding is plain Unicode lower-casing with no trimming, so "Song " and
/// "song" remain different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey {
    title: String,
    artist: String,
}

impl DedupeKey {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: title.to_lowercase(),
            artist: artist.to_lowercase(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tags_default_to_unknown() {
        let meta = TrackMetadata::from_tags(Some("Song".into()), None, None);
        assert_eq!(meta.title, "Song");
        assert_eq!(meta.artist, "Unknown");
        assert_eq!(meta.album, "Unknown");
        assert_eq!(TrackMetadata::default().title, UNKNOWN);
    }

    #[test]
    fn test_key_folds_case() {
        assert_eq!(DedupeKey::new("Song", "Band"), DedupeKey::new("SONG", "band"));
        assert_eq!(DedupeKey::new("ÉTÉ", "Öl"), DedupeKey::new("été", "öl"));
    }

    #[test]
    fn test_key_keeps_whitespace_and_punctuation() {
        assert_ne!(DedupeKey::new("Song ", "Band"), DedupeKey::new("Song", "Band"));
        assert_ne!(DedupeKey::new("Song!", "Band"), DedupeKey::new("Song", "Band"));
    }

    #[test]
    fn test_record_key_uses_title_and_artist_only() {
        let a = TrackRecord::new(
            TrackMetadata::from_tags(Some("Song".into()), Some("Band".into()), Some("A".into())),
            "/music/a.mp3",
        );
        let b = TrackRecord::new(
            TrackMetadata::from_tags(Some("song".into()), Some("BAND".into()), Some("B".into())),
            "/music/b.flac",
        );
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().title(), "song");
        assert_eq!(a.key().artist(), "band");
    }
}
