use crate::types::TrackMetadata;
use std::path::Path;
use thiserror::Error;

/// Why a file produced no metadata. Both variants are per-file and never
/// abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("unsupported file format")]
    Unsupported,

    #[error("{0}")]
    Failed(String),
}

/// Reads title, artist and album from an audio file
pub trait MetadataSource {
    fn extract(&self, path: &Path) -> Result<TrackMetadata, ExtractError>;
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn extract(&self, path: &Path) -> Result<TrackMetadata, ExtractError> {
        (**self).extract(path)
    }
}
