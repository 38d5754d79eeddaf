pub mod config;
pub mod error;
pub mod group;
pub mod metadata;
pub mod pipeline;
pub mod playlist;
pub mod render;
pub mod types;

pub use config::{RenderMode, RunConfig, Settings, load_settings};
pub use error::{Error, Result};
pub use group::{GroupTable, TrackGroup};
pub use metadata::{ExtractError, MetadataSource};
pub use pipeline::{Job, LogObserver, Outcome, ScanEvent, ScanObserver};
pub use playlist::{Playlist, PlaylistEntry};
pub use types::*;
