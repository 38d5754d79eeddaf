use lofty::file::FileType;
use lofty::tag::TagType;
use std::path::Path;

/// Audio containers recognised by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Mp4,
    Wma,
    Aac,
    Wav,
    Aiff,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 8] = [
        AudioFormat::Mp3,
        AudioFormat::Flac,
        AudioFormat::Ogg,
        AudioFormat::Mp4,
        AudioFormat::Wma,
        AudioFormat::Aac,
        AudioFormat::Wav,
        AudioFormat::Aiff,
    ];

    /// Extensions (lower case, without the dot) mapped to this format
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AudioFormat::Mp3 => &["mp3"],
            AudioFormat::Flac => &["flac"],
            AudioFormat::Ogg => &["ogg"],
            AudioFormat::Mp4 => &["m4a", "mp4"],
            AudioFormat::Wma => &["wma"],
            AudioFormat::Aac => &["aac"],
            AudioFormat::Wav => &["wav"],
            AudioFormat::Aiff => &["aiff", "aif"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// lofty reader for this container. `None` when lofty cannot parse it
    /// (ASF/WMA).
    pub(crate) fn file_type(self) -> Option<FileType> {
        match self {
            AudioFormat::Mp3 => Some(FileType::Mpeg),
            AudioFormat::Flac => Some(FileType::Flac),
            AudioFormat::Ogg => Some(FileType::Vorbis),
            AudioFormat::Mp4 => Some(FileType::Mp4),
            AudioFormat::Wma => None,
            AudioFormat::Aac => Some(FileType::Aac),
            AudioFormat::Wav => Some(FileType::Wav),
            AudioFormat::Aiff => Some(FileType::Aiff),
        }
    }

    /// Tag format conventionally written into this container. `None` for
    /// WMA, whose ASF attributes lofty has no tag type for.
    pub(crate) fn preferred_tag(self) -> Option<TagType> {
        match self {
            AudioFormat::Mp3 | AudioFormat::Aac | AudioFormat::Wav | AudioFormat::Aiff => {
                Some(TagType::Id3v2)
            }
            AudioFormat::Flac | AudioFormat::Ogg => Some(TagType::VorbisComments),
            AudioFormat::Mp4 => Some(TagType::Mp4Ilst),
            AudioFormat::Wma => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(AudioFormat::from_extension("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("FLAC"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_extension("M4a"), Some(AudioFormat::Mp4));
        assert_eq!(AudioFormat::from_extension("mp4"), Some(AudioFormat::Mp4));
        assert_eq!(AudioFormat::from_extension("AIF"), Some(AudioFormat::Aiff));
        assert_eq!(AudioFormat::from_extension("opus"), None);
        assert_eq!(AudioFormat::from_extension(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            AudioFormat::from_path(Path::new("/music/Band - Song.ogg")),
            Some(AudioFormat::Ogg)
        );
        assert_eq!(AudioFormat::from_path(Path::new("/music/noext")), None);
        assert_eq!(AudioFormat::from_path(Path::new("/music/cover.jpg")), None);
    }

    #[test]
    fn test_extensions_are_unique() {
        let mut seen = Vec::new();
        for format in AudioFormat::ALL {
            for ext in format.extensions() {
                assert!(!seen.contains(ext), "duplicate extension {ext}");
                seen.push(*ext);
            }
        }
        assert_eq!(seen.len(), 11);
    }

    #[test]
    fn test_only_wma_lacks_a_reader() {
        for format in AudioFormat::ALL {
            assert_eq!(format.file_type().is_none(), format == AudioFormat::Wma);
            assert_eq!(format.preferred_tag().is_none(), format == AudioFormat::Wma);
        }
    }
}
