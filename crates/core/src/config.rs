use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_GROUP_SIZE: usize = 1;
pub const MAX_GROUP_SIZE: usize = 50;
pub const DEFAULT_GROUP_SIZE: usize = 10;
pub const DEFAULT_OUTPUT: &str = "deduped_tracks.txt";
pub const DEFAULT_BASE_DIR: &str = "~/Media Drive/Music";

const SETTINGS_DIR: &str = ".playlist-dedupe";
const SETTINGS_FILE: &str = "config.toml";

/// How the duplicate report is laid out, resolved from a [`RunConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Album and path of every duplicate track
    Detailed,
    /// All duplicate titles on one `tracks:` line
    SingleLine,
    /// Duplicate titles in `tracks:` lines of at most this many titles
    Grouped(usize),
}

/// Options for a single dedupe run.
///
/// Construct with [`RunConfig::new`], which rejects group sizes outside
/// `MIN_GROUP_SIZE..=MAX_GROUP_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    include_info: bool,
    search_format: bool,
    group_size: usize,
}

impl RunConfig {
    pub fn new(include_info: bool, search_format: bool, group_size: usize) -> Result<Self> {
        validate_group_size(group_size)?;
        Ok(Self {
            include_info,
            search_format,
            group_size,
        })
    }

    pub fn include_info(&self) -> bool {
        self.include_info
    }

    pub fn search_format(&self) -> bool {
        self.search_format
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Detailed output wins over single-line, which wins over grouping.
    pub fn mode(&self) -> RenderMode {
        if self.include_info {
            RenderMode::Detailed
        } else if self.search_format {
            RenderMode::SingleLine
        } else {
            RenderMode::Grouped(self.group_size)
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            include_info: false,
            search_format: false,
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

fn validate_group_size(group_size: usize) -> Result<()> {
    if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&group_size) {
        return Err(Error::Config(format!(
            "Group size must be between {} and {}, got {}",
            MIN_GROUP_SIZE, MAX_GROUP_SIZE, group_size
        )));
    }
    Ok(())
}

/// Raw TOML structure of the settings file; every key is optional
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    base_dir: Option<String>,
    output: Option<String>,
    group_size: Option<usize>,
}

/// User defaults loaded from `~/.playlist-dedupe/config.toml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory that relative playlist entries are resolved against
    pub base_dir: PathBuf,
    /// Report path used when none is given on the command line
    pub output: PathBuf,
    pub group_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: expand_tilde(DEFAULT_BASE_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

impl Settings {
    /// Render as TOML, e.g. for `config show`
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        let raw = RawSettings {
            base_dir: Some(self.base_dir.display().to_string()),
            output: Some(self.output.display().to_string()),
            group_size: Some(self.group_size),
        };
        toml::to_string_pretty(&raw)
    }
}

/// Location of the settings file, or `None` when no home directory is known
pub fn settings_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Load settings from the default location, falling back to defaults when
/// the file does not exist
pub fn load_settings() -> Result<Settings> {
    match settings_path() {
        Some(path) if path.exists() => parse_settings(&path),
        _ => Ok(Settings::default()),
    }
}

/// Parse a settings file from a path
pub fn parse_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let content = fs::read_to_string(path)?;
    parse_settings_str(&content)
}

/// Parse settings from a string (useful for testing)
pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(content)?;
    let defaults = Settings::default();

    let group_size = raw.group_size.unwrap_or(defaults.group_size);
    validate_group_size(group_size)?;

    Ok(Settings {
        base_dir: raw
            .base_dir
            .map(|dir| expand_tilde(&dir))
            .unwrap_or(defaults.base_dir),
        output: raw
            .output
            .map(|out| expand_tilde(&out))
            .unwrap_or(defaults.output),
        group_size,
    })
}

/// Commented settings template written by `config init`
pub fn settings_template() -> String {
    format!(
        r#"# playlist-dedupe settings
# Command-line flags take precedence over anything set here.

# Directory that relative playlist entries are resolved against
base_dir = "{DEFAULT_BASE_DIR}"

# Report file written when duplicates are found
output = "{DEFAULT_OUTPUT}"

# Titles per "tracks:" line in the default output ({MIN_GROUP_SIZE}-{MAX_GROUP_SIZE})
group_size = {DEFAULT_GROUP_SIZE}
"#
    )
}

/// Home directory from `HOME`, or `USERPROFILE` on Windows
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home.to_path_buf();
    }
    match path
        .strip_prefix("~/")
        .or_else(|| path.strip_prefix("~\\"))
    {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}
