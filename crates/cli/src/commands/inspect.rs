use anyhow::Result;
use dedupe_core::{MetadataSource, TrackRecord};
use dedupe_tags::{AudioFormat, LoftySource};
use std::path::PathBuf;

/// Print the tags read from each file and the key it would be grouped under.
///
/// Fails after printing everything if any file could not be read.
pub fn run(files: Vec<PathBuf>) -> Result<()> {
    let mut failed = 0;

    for path in &files {
        println!("{}", path.display());

        if let Some(format) = AudioFormat::from_path(path) {
            println!("  Format: {:?}", format);
        }

        match LoftySource.extract(path) {
            Ok(metadata) => {
                let record = TrackRecord::new(metadata, path);
                let key = record.key();
                println!("  Title:  {}", record.title);
                println!("  Artist: {}", record.artist);
                println!("  Album:  {}", record.album);
                println!("  Key:    ({}, {})", key.title(), key.artist());
            }
            Err(e) => {
                println!("  ⚠ {}", e);
                failed += 1;
            }
        }
        println!();
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files could not be read", failed, files.len());
    }

    Ok(())
}
