use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Upload a video or audio file and generate English subtitles (SRT).
#[derive(Debug, Clone, Parser)]
#[command(name = "srtify", version)]
pub struct Cli {
    /// Media file to transcribe. Supported: MP4, MKV, MOV, MP3, WAV, M4A.
    pub file: PathBuf,

    /// Base URL of the transcription service.
    #[arg(long, env = "SRTIFY_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Delay between progress polls, in milliseconds.
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Number of polls before giving up.
    #[arg(long)]
    pub max_poll_attempts: Option<u32>,

    /// Directory the finished subtitle file is saved to.
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Print the download link instead of saving the subtitle file.
    #[arg(long)]
    pub no_download: bool,

    /// Settings file (RON). Defaults to ./srtify.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log debug output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
