use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{LevelFilter, info};
use std::path::PathBuf;
use tubetag::config::Config;
use tubetag::deps::Libraries;
use tubetag::model::AudioFormat;
use tubetag::{DownloadOptions, download_audio};

#[derive(Parser, Clone)]
#[command(version, about = "Download audio from YouTube and YouTube Music, tagged with cover art and lyrics")]
pub struct Cli {
    /// The video or YouTube Music URL.
    pub url: String,

    /// Output format [default: flac]
    #[arg(long = "format", short = 'f', value_enum)]
    pub format: Option<AudioFormat>,

    /// Destination directory [default: ./downloads]
    #[arg(long = "output", short = 'o')]
    pub output: Option<PathBuf>,

    /// Also write the lyrics to a .lrc file next to the audio.
    #[arg(long = "create-lrc", action = clap::ArgAction::SetTrue)]
    pub create_lrc: bool,

    /// Path to the ffmpeg binary, or the directory holding it.
    #[arg(long = "ffmpeg-location")]
    pub ffmpeg_location: Option<PathBuf>,

    /// Path to the yt-dlp binary, or the directory holding it.
    #[arg(long = "yt-dlp-location")]
    pub yt_dlp_location: Option<PathBuf>,

    #[arg(
        long = "verbosity",
        short,
        default_value = "info",
        value_parser = clap::builder::PossibleValuesParser::new([
            "info", "debug", "error", "none", "full"
        ])
    )]
    pub verbosity: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();
    let progress = init_logger(&args.verbosity)?;

    let config = Config::load();
    let format = match args.format {
        Some(format) => format,
        None => config.format()?,
    };

    let libraries = Libraries::locate(
        args.yt_dlp_location
            .as_deref()
            .or(config.yt_dlp_location.as_deref()),
        args.ffmpeg_location
            .as_deref()
            .or(config.ffmpeg_location.as_deref()),
    )?;

    let output_dir = std::env::current_dir()?.join(args.output.unwrap_or_else(|| config.output_dir()));
    info!("Saving {} files to {}", format, output_dir.display());

    let options = DownloadOptions {
        url: args.url,
        output_dir,
        format,
        create_lrc: args.create_lrc || config.create_lrc(),
        libraries,
        subtitle_languages: config.subtitle_languages(),
    };
    download_audio(&options, &progress).await?;
    Ok(())
}

fn init_logger(verbosity: &str) -> Result<MultiProgress, Box<dyn std::error::Error + Send + Sync>> {
    let level = match verbosity {
        "debug" => LevelFilter::Debug,
        "error" => LevelFilter::Error,
        "none" => LevelFilter::Off,
        "full" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    let logger = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .build();
    let max_level = logger.filter();

    let progress = MultiProgress::new();
    LogWrapper::new(progress.clone(), logger).try_init()?;
    log::set_max_level(max_level);

    Ok(progress)
}
