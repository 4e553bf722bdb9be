use {
    crate::deps::Libraries,
    crate::error::Result,
    crate::lyrics::LyricsResolver,
    crate::metadata::{TagRecord, write_tags},
    crate::model::AudioFormat,
    crate::youtube::{Youtube, is_youtube_music},
    indicatif::{MultiProgress, ProgressBar, ProgressStyle},
    log::{error, info},
    std::path::PathBuf,
    std::time::Duration,
};

pub mod config;
pub mod deps;
pub mod error;
pub mod executor;
pub mod lyrics;
pub mod metadata;
pub mod model;
pub mod thumbnail;
pub mod youtube;

/// Everything one download needs, already resolved from flags and config.
#[derive(Clone, Debug)]
pub struct DownloadOptions {
    pub url: String,
    pub output_dir: PathBuf,
    pub format: AudioFormat,
    pub create_lrc: bool,
    pub libraries: Libraries,
    pub subtitle_languages: Vec<String>,
}

/// Downloads the audio of `options.url`, tags it and optionally writes the `.lrc` sidecar.
///
/// Returns the path of the tagged audio file. Only the download itself can fail: lyrics,
/// cover and tag problems are logged and the file is kept as it is.
pub async fn download_audio(options: &DownloadOptions, progress: &MultiProgress) -> Result<PathBuf> {
    let youtube = Youtube::new(options.libraries.clone(), &options.output_dir)?;
    let is_music = is_youtube_music(&options.url);

    let spinner = progress.add(ProgressBar::new_spinner());
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Downloading {}", options.url));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let download = youtube.download_audio(&options.url, options.format).await;
    spinner.finish_and_clear();
    progress.remove(&spinner);
    let download = download?;

    let resolver = LyricsResolver::new(options.subtitle_languages.clone());
    let lyrics = resolver
        .resolve(&youtube, &download, &options.url, is_music)
        .await;

    let record = TagRecord::from_info(&download.info, lyrics.as_deref());

    let cover = match &record.thumbnail {
        Some(url) if options.format.embeds_cover() => {
            info!("Fetching thumbnail");
            thumbnail::fetch_cover(url).await
        }
        _ => None,
    };

    write_tags(&download.path, options.format, &record, cover.as_ref());

    if options.create_lrc {
        match lyrics.as_deref() {
            Some(lyrics) => {
                if let Err(e) = lyrics::save_lrc(&download.path, lyrics) {
                    error!("Failed to write lyrics file: {}", e);
                }
            }
            None => info!("No lyrics to write to a lyrics file"),
        }
    }

    info!("Done: {}", download.path.display());
    Ok(download.path)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use lofty::file::TaggedFileExt;
    use lofty::tag::{Accessor, TagType};

    #[tokio::test]
    async fn music_track_is_tagged_with_lrc_sidecar() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let staged = bin.path().join("staged.flac");
        std::fs::write(&staged, metadata::fixtures::flac()).unwrap();
        let audio = out.path().join("T.flac");
        let script = youtube::fake::extractor(
            bin.path(),
            &format!(
                r#"cp '{}' '{}'
printf '%s' '{{"title": "T", "artist": "A", "lyrics": "Hello", "requested_downloads": [{{"ext": "flac", "filepath": "{}"}}]}}'"#,
                staged.display(),
                audio.display(),
                audio.display()
            ),
        );

        let options = DownloadOptions {
            url: "https://music.youtube.com/watch?v=x".to_string(),
            output_dir: out.path().to_path_buf(),
            format: AudioFormat::Flac,
            create_lrc: true,
            libraries: Libraries::new(script, PathBuf::from("ffmpeg")),
            subtitle_languages: vec!["en".to_string()],
        };
        let progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());

        let path = download_audio(&options, &progress).await.unwrap();

        assert_eq!(path, audio);
        assert_eq!(std::fs::read_to_string(out.path().join("T.lrc")).unwrap(), "Hello");

        let tagged_file = lofty::read_from_path(&path).unwrap();
        let tag = tagged_file.tag(TagType::VorbisComments).unwrap();
        assert_eq!(tag.artist().as_deref(), Some("A"));
        assert_eq!(tag.title().as_deref(), Some("T"));
        assert_eq!(tag.picture_count(), 0);
    }
}
