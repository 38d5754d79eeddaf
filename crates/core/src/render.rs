//! Text layouts for the duplicate report.
//!
//! Title tokens are taken from the lower-cased [`DedupeKey`](crate::DedupeKey),
//! not from the original tag text, so `tracks:` lines always show folded
//! titles.

use crate::config::RenderMode;
use crate::group::TrackGroup;
use std::fmt::Write;

const TOKEN_SEPARATOR: &str = " | ";

/// Render duplicate groups in the given mode.
pub fn render(duplicates: &[&TrackGroup], mode: RenderMode) -> String {
    match mode {
        RenderMode::Detailed => render_detailed(duplicates),
        RenderMode::SingleLine => render_single_line(&title_tokens(duplicates)),
        RenderMode::Grouped(size) => render_grouped(&title_tokens(duplicates), size),
    }
}

/// One block per key listing album and path of every copy
pub fn render_detailed(duplicates: &[&TrackGroup]) -> String {
    let mut out = String::new();
    for group in duplicates {
        let key = group.key();
        let _ = writeln!(out, "Duplicate: {} - {}", key.artist(), key.title());
        for track in group.tracks() {
            let _ = writeln!(
                out,
                "  - Album: {}, Path: {}",
                track.album,
                track.path.display()
            );
        }
        out.push('\n');
    }
    out
}

/// Every token on a single `tracks:` line
pub fn render_single_line(tokens: &[String]) -> String {
    let mut out = tracks_line(tokens);
    out.push('\n');
    out
}

/// `tracks:` lines of at most `size` tokens, each followed by a blank line.
///
/// A `size` of zero is treated as one.
pub fn render_grouped(tokens: &[String], size: usize) -> String {
    let mut out = String::new();
    for chunk in tokens.chunks(size.max(1)) {
        out.push_str(&tracks_line(chunk));
        out.push_str("\n\n");
    }
    out
}

/// Display token for each duplicate group, in group order
pub fn title_tokens(duplicates: &[&TrackGroup]) -> Vec<String> {
    duplicates
        .iter()
        .map(|group| quote_token(group.key().title()))
        .collect()
}

/// Wrap a title in double quotes when it contains a space.
pub fn quote_token(title: &str) -> String {
    if title.contains(' ') {
        format!("\"{}\"", title)
    } else {
        title.to_string()
    }
}

fn tracks_line(tokens: &[String]) -> String {
    let mut line = String::from("tracks:");
    for token in tokens {
        line.push_str(TOKEN_SEPARATOR);
        line.push_str(token);
    }
    line
}
