use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{debug, error};
use std::path::PathBuf;
use std::process::ExitCode;

mod command;
mod config;
mod error;
mod logging;
mod mix;
mod params;
mod playlist;
mod probe;
mod run;
mod video;

use config::{CaptionTiming, Settings, WaveMode};
use error::MixError;
use params::VisualParams;
use run::{with_mp4_extension, Job};

#[derive(Parser)]
#[command(
    version,
    about = "Crossfade the MP3s of an M3U playlist into one mix and render it as a captioned waveform video"
)]
struct Args {
    /// Directory containing the .m3u playlist and its MP3 files
    input_dir: PathBuf,
    /// Output video (".mp4" is appended when missing)
    output_file: PathBuf,
    /// Background image looped under the waveform
    #[arg(short, long)]
    background: PathBuf,
    /// Crossfade duration in seconds [default: 5]
    #[arg(short, long)]
    crossfade: Option<u32>,
    /// Waveform render mode [default: line]
    #[arg(short, long, value_enum)]
    mode: Option<WaveMode>,
    /// Waveform colour, a name ("red") or hex code ("0xFFFFFF") [default: white]
    #[arg(long)]
    wave_color: Option<String>,
    /// Waveform opacity from 0.0 to 1.0 [default: 1.0]
    #[arg(long)]
    wave_opacity: Option<f32>,
    /// Caption text colour [default: orange]
    #[arg(long)]
    text_color: Option<String>,
    /// Caption font size [default: 24]
    #[arg(long)]
    text_size: Option<u32>,
    /// How track titles are placed on the timeline [default: probed]
    #[arg(short, long, value_enum)]
    timing: Option<CaptionTiming>,
    /// Seconds per title with fixed timing [default: 60]
    #[arg(long)]
    caption_window: Option<u32>,
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the ffmpeg commands without running them
    #[arg(long)]
    dry_run: bool,
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(secs) = self.crossfade {
            settings.mix.crossfade_secs = secs;
        }
        if let Some(mode) = self.mode {
            settings.waves.mode = mode;
        }
        if let Some(color) = &self.wave_color {
            settings.waves.color = color.clone();
        }
        if let Some(opacity) = self.wave_opacity {
            settings.waves.opacity = opacity;
        }
        if let Some(color) = &self.text_color {
            settings.captions.color = color.clone();
        }
        if let Some(size) = self.text_size {
            settings.captions.size = size;
        }
        if let Some(timing) = self.timing {
            settings.captions.timing = timing;
        }
        if let Some(secs) = self.caption_window {
            settings.captions.window_secs = secs;
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(logging::level_for(args.verbose, args.quiet));

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => debug!("config file: {}", path.display()),
        None => {
            if let Some(path) = config::resolve_config_path() {
                debug!("config file (optional): {}", path.display());
            }
        }
    }

    let mut settings =
        Settings::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut settings);
    settings.validate()?;

    let job = Job {
        output: with_mp4_extension(args.output_file),
        input_dir: args.input_dir,
        background: args.background,
        params: VisualParams::from(&settings),
        timing: settings.captions.timing,
        window_secs: settings.captions.window_secs,
        tools: settings.tools,
        work_dir: PathBuf::from("."),
        dry_run: args.dry_run,
    };

    run::run(&job)
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<MixError>() {
        Some(MixError::ToolFailed {
            command,
            code,
            output,
        }) => {
            error!("Processing failed: {err}");
            error!("Failing command: {command}");
            match code {
                Some(code) => error!("Exit code: {code}"),
                None => error!("Exit code: none, terminated by a signal"),
            }
            error!("Output:\n{}", output.trim_end());
        }
        _ => error!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let args = Args::parse_from([
            "mixvid",
            "music",
            "out",
            "--background",
            "bg.png",
            "-c",
            "8",
            "-m",
            "p2p",
            "--wave-opacity",
            "0.25",
            "--text-size",
            "40",
            "-t",
            "fixed",
        ]);
        let mut settings = Settings::default();
        args.apply(&mut settings);

        assert_eq!(settings.mix.crossfade_secs, 8);
        assert_eq!(settings.waves.mode, WaveMode::P2p);
        assert_eq!(settings.waves.opacity, 0.25);
        assert_eq!(settings.waves.color, "white");
        assert_eq!(settings.captions.size, 40);
        assert_eq!(settings.captions.timing, CaptionTiming::Fixed);
    }

    #[test]
    fn background_is_required() {
        assert!(Args::try_parse_from(["mixvid", "music", "out"]).is_err());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Args::try_parse_from(["mixvid", "music", "out", "-b", "bg.png", "-m", "bars"]).is_err());
    }
}
