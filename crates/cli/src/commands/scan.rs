use anyhow::{Context, Result};
use dedupe_core::config::expand_tilde;
use dedupe_core::{Job, LogObserver, Outcome, RunConfig, ScanEvent, ScanObserver, Settings};
use dedupe_tags::LoftySource;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options of the `scan` command as given on the command line
#[derive(Debug, Clone, Default)]
pub struct ScanArgs {
    pub playlist: PathBuf,
    pub output: Option<PathBuf>,
    pub include_info: bool,
    pub search_format: bool,
    pub group_size: Option<usize>,
    pub base_dir: Option<PathBuf>,
}

/// Find duplicate tracks in a playlist and write the report.
///
/// Per-file problems are logged to stderr; the final status line
/// ("Duplicate tracks written to ..." or "No duplicate tracks found") goes to
/// stdout.
pub fn run(args: ScanArgs) -> Result<()> {
    let settings = dedupe_core::load_settings().context("Failed to load settings")?;
    let job = build_job(args, &settings)?;
    debug!(?job, "starting scan");

    let mut log = LogObserver;
    let outcome = job
        .run(&LoftySource, &mut |event: &ScanEvent| match event {
            ScanEvent::ReportWritten { .. }
            | ScanEvent::NoDuplicates
            | ScanEvent::GroupingDisabled => println!("{}", event),
            _ => log.on_event(event),
        })
        .with_context(|| format!("Failed to scan {}", job.playlist.display()))?;

    if let Outcome::Written { groups, .. } = outcome {
        debug!(groups, "report written");
    }

    Ok(())
}

/// Merge command-line options over settings. Flags win.
pub fn build_job(args: ScanArgs, settings: &Settings) -> Result<Job> {
    let group_size = args.group_size.unwrap_or(settings.group_size);
    let config = RunConfig::new(args.include_info, args.search_format, group_size)
        .context("Invalid options")?;

    Ok(Job {
        playlist: expand(&args.playlist),
        base_dir: args
            .base_dir
            .as_deref()
            .map(expand)
            .unwrap_or_else(|| settings.base_dir.clone()),
        output: args
            .output
            .as_deref()
            .map(expand)
            .unwrap_or_else(|| settings.output.clone()),
        config,
    })
}

/// Expand `~` in paths that arrive quoted and so bypass the shell
fn expand(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => expand_tilde(s),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dedupe_core::RenderMode;

    fn settings() -> Settings {
        Settings {
            base_dir: PathBuf::from("/srv/music"),
            output: PathBuf::from("/tmp/dupes.txt"),
            group_size: 7,
        }
    }

    #[test]
    fn test_build_job_uses_settings_defaults() {
        let args = ScanArgs {
            playlist: PathBuf::from("/lists/party.m3u8"),
            ..ScanArgs::default()
        };
        let job = build_job(args, &settings()).unwrap();
        assert_eq!(job.playlist, PathBuf::from("/lists/party.m3u8"));
        assert_eq!(job.base_dir, PathBuf::from("/srv/music"));
        assert_eq!(job.output, PathBuf::from("/tmp/dupes.txt"));
        assert_eq!(job.config.mode(), RenderMode::Grouped(7));
    }

    #[test]
    fn test_build_job_flags_override_settings() {
        let args = ScanArgs {
            playlist: PathBuf::from("/lists/party.m3u8"),
            output: Some(PathBuf::from("/out/report.txt")),
            include_info: false,
            search_format: false,
            group_size: Some(3),
            base_dir: Some(PathBuf::from("/mnt/library")),
        };
        let job = build_job(args, &settings()).unwrap();
        assert_eq!(job.base_dir, PathBuf::from("/mnt/library"));
        assert_eq!(job.output, PathBuf::from("/out/report.txt"));
        assert_eq!(job.config.mode(), RenderMode::Grouped(3));
    }

    #[test]
    fn test_build_job_rejects_group_size() {
        for group_size in [0, 51] {
            let args = ScanArgs {
                playlist: PathBuf::from("/lists/party.m3u8"),
                group_size: Some(group_size),
                ..ScanArgs::default()
            };
            let err = build_job(args, &settings()).unwrap_err();
            assert!(format!("{:#}", err).contains("Group size must be between 1 and 50"));
        }
    }

    #[test]
    fn test_build_job_include_info_wins() {
        let args = ScanArgs {
            playlist: PathBuf::from("/lists/party.m3u8"),
            include_info: true,
            search_format: true,
            group_size: Some(2),
            ..ScanArgs::default()
        };
        let job = build_job(args, &settings()).unwrap();
        assert_eq!(job.config.mode(), RenderMode::Detailed);
    }
}
