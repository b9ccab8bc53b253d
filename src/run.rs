use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::command::ToolCommand;
use crate::config::{CaptionTiming, ToolSettings};
use crate::error::MixError;
use crate::mix::build_mix_command;
use crate::params::VisualParams;
use crate::playlist::{find_playlist, read_playlist, require_mixable, Track};
use crate::probe::Ffprobe;
use crate::video::{build_video_command, Timeline};

/// Stand-in for the intermediate file when nothing is executed.
const DRY_RUN_AUDIO: &str = "mixvid-audio.mp3";

/// Everything one run needs, resolved from flags and settings.
#[derive(Debug, Clone)]
pub struct Job {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub background: PathBuf,
    pub params: VisualParams,
    pub timing: CaptionTiming,
    pub window_secs: u32,
    pub tools: ToolSettings,
    /// Where the intermediate mix is written, normally the working directory.
    pub work_dir: PathBuf,
    pub dry_run: bool,
}

/// Appends `.mp4` unless the name already ends with it (any case).
pub fn with_mp4_extension(path: PathBuf) -> PathBuf {
    let is_mp4 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
    if is_mp4 {
        return path;
    }
    let mut name = OsString::from(path);
    name.push(".mp4");
    PathBuf::from(name)
}

/// Playlist, probes, audio mix, video render. The intermediate mix is
/// removed whichever way the render ends.
pub fn run(job: &Job) -> Result<PathBuf> {
    let playlist = find_playlist(&job.input_dir)?;
    info!("Using playlist {}", playlist.display());

    let tracks = read_playlist(&playlist)?;
    require_mixable(&tracks)?;
    info!("Found {} tracks", tracks.len());

    ensure_tools(job)?;

    let timeline = match job.timing {
        CaptionTiming::Fixed => Timeline::fixed(&tracks, job.window_secs),
        CaptionTiming::Probed => {
            info!("Probing track durations...");
            Timeline::probed(&tracks, &Ffprobe::new(&job.tools.ffprobe))
                .context("failed to probe track durations")?
        }
    };

    if job.dry_run {
        let audio = Path::new(DRY_RUN_AUDIO);
        let mix = build_mix_command(&job.tools.ffmpeg, &tracks, job.params.crossfade, audio)?;
        let video = video_command(job, audio, &timeline);
        info!("{mix}");
        info!("{video}");
        return Ok(job.output.clone());
    }

    let intermediate = tempfile::Builder::new()
        .prefix(".mixvid-")
        .suffix(".mp3")
        .tempfile_in(&job.work_dir)
        .context("failed to create intermediate audio file")?
        .into_temp_path();

    let rendered = render(job, &tracks, &timeline, &intermediate);

    let shown = intermediate.display().to_string();
    match intermediate.close() {
        Ok(()) => info!("Removed intermediate audio {shown}"),
        Err(e) => warn!("Could not remove intermediate audio {shown}: {e}"),
    }

    rendered
}

fn render(job: &Job, tracks: &[Track], timeline: &Timeline, audio: &Path) -> Result<PathBuf> {
    let mix = build_mix_command(&job.tools.ffmpeg, tracks, job.params.crossfade, audio)?;
    info!(
        "Mixing {} tracks with a {}s crossfade:",
        tracks.len(),
        job.params.crossfade
    );
    info!("{mix}");
    mix.run().context("audio mix failed")?;
    info!("Audio mix ready");

    let video = video_command(job, audio, timeline);
    info!("Rendering waveform video with captions...");
    debug!("{video}");
    video.run().context("video render failed")?;
    info!("Video written to {}", job.output.display());

    Ok(job.output.clone())
}

fn video_command(job: &Job, audio: &Path, timeline: &Timeline) -> ToolCommand {
    build_video_command(
        &job.tools.ffmpeg,
        audio,
        &job.background,
        &job.output,
        timeline,
        &job.params,
    )
}

/// Tools this job will actually execute must be on `PATH`.
fn ensure_tools(job: &Job) -> Result<(), MixError> {
    let mut needed = Vec::new();
    if !job.dry_run {
        needed.push(&job.tools.ffmpeg);
    }
    if job.timing == CaptionTiming::Probed {
        needed.push(&job.tools.ffprobe);
    }

    for program in needed {
        let found = which::which(program).map_err(|_| MixError::ToolMissing {
            program: program.clone(),
        })?;
        debug!("{program} found at {}", found.display());
    }
    Ok(())
}
