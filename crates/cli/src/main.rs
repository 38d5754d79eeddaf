mod commands;
mod logging;

use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{Shell, generate};
use commands::scan::ScanArgs;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playlist-dedupe")]
#[command(
    version,
    about = "Find duplicate songs in an M3U8 playlist across all tagged audio formats",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Find duplicate tracks in a playlist
    ///
    /// Reads MP3, FLAC, Ogg Vorbis, M4A/MP4, AAC, WAV and AIFF tags. WMA files
    /// are recognised but cannot be read and are skipped as unsupported.
    Scan {
        /// Input M3U8 playlist file (must have .m3u8 extension)
        playlist: PathBuf,

        /// Output text file for duplicates [default: deduped_tracks.txt]
        output: Option<PathBuf>,

        /// Include album and path info (disables grouping, -s and -n)
        #[arg(short, long)]
        include_info: bool,

        /// Output duplicate titles on a single `tracks:` line
        #[arg(short, long)]
        search_format: bool,

        /// Number of titles per group in default output (1-50) [default: 10]
        #[arg(short = 'n', long)]
        group_size: Option<usize>,

        /// Directory that relative playlist entries are resolved against
        #[arg(short, long)]
        base_dir: Option<PathBuf>,
    },

    /// Show the tags read from audio files
    ///
    /// WMA files are reported as unsupported; their tags cannot be read.
    Inspect {
        /// Audio files to read
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Manage the settings file (~/.playlist-dedupe/config.toml)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
enum ConfigCommand {
    /// Print the effective settings
    Show,

    /// Write a default settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Command::Scan {
            playlist,
            output,
            include_info,
            search_format,
            group_size,
            base_dir,
        } => commands::scan::run(ScanArgs {
            playlist,
            output,
            include_info,
            search_format,
            group_size,
            base_dir,
        }),
        Command::Inspect { files } => commands::inspect::run(files),
        Command::Config { command } => match command {
            ConfigCommand::Show => commands::config::show(),
            ConfigCommand::Init { force } => commands::config::init(force),
        },
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "playlist-dedupe", &mut io::stdout());
            Ok(())
        }
    }
}
