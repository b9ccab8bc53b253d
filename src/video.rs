//! Captioned waveform video: background image, `showwaves` overlay, one
//! time-gated title per track and a running clock.

use std::path::Path;

use log::debug;

use crate::command::ToolCommand;
use crate::error::MixError;
use crate::params::VisualParams;
use crate::playlist::Track;
use crate::probe::DurationProvider;

/// Side of the square output frame, in pixels.
const FRAME: u32 = 1000;

const CAPTION_BOX: &str = "box=1:boxcolor=black@0.5:boxborderw=5";

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionWindow {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Where each title is shown, plus the total length when it is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub windows: Vec<CaptionWindow>,
    pub total: Option<f64>,
}

impl Timeline {
    /// Every track gets `window` seconds regardless of its real length.
    pub fn fixed(tracks: &[Track], window: u32) -> Self {
        let window = f64::from(window);
        let windows = tracks
            .iter()
            .enumerate()
            .map(|(i, track)| CaptionWindow {
                text: track.name.clone(),
                start: i as f64 * window,
                end: (i + 1) as f64 * window,
            })
            .collect();
        Self {
            windows,
            total: None,
        }
    }

    /// Back-to-back windows sized by each track's probed duration.
    pub fn probed(tracks: &[Track], durations: &dyn DurationProvider) -> Result<Self, MixError> {
        let mut windows = Vec::with_capacity(tracks.len());
        let mut elapsed = 0.0;

        for track in tracks {
            let length = durations.duration(&track.path)?;
            debug!("{} lasts {length}s", track.path.display());
            windows.push(CaptionWindow {
                text: track.name.clone(),
                start: elapsed,
                end: elapsed + length,
            });
            elapsed += length;
        }

        Ok(Self {
            windows,
            total: Some(elapsed),
        })
    }
}

/// Makes `text` literal inside a single-quoted drawtext value of a
/// `-filter_complex` graph.
///
/// The graph parser strips the quotes, the option parser unescapes once
/// more, and drawtext expands `%{..}` and backslashes on its own. A quote
/// closes the string, emits a quote escaped for the graph and option
/// parsers, and reopens. `:` is escaped for the option parser, backslash
/// and `%` for the option parser and drawtext.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\'' => escaped.push_str(r"'\\\''"),
            '\\' => escaped.push_str(r"\\\\"),
            '%' => escaped.push_str(r"\\%"),
            ':' => escaped.push_str(r"\:"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn drawtext(params: &VisualParams, position: &str, text: &str) -> String {
    format!(
        "drawtext=fontsize={}:fontcolor={}:{CAPTION_BOX}:{position}:text='{text}'",
        params.caption_size, params.caption_color
    )
}

/// Full `-filter_complex` graph producing the `[v]` stream.
pub fn video_graph(timeline: &Timeline, params: &VisualParams) -> String {
    let mut captions: Vec<String> = timeline
        .windows
        .iter()
        .map(|w| {
            format!(
                "{}:enable='between(t,{},{})'",
                drawtext(params, "x=10:y=h-th-10", &escape_text(&w.text)),
                w.start,
                w.end
            )
        })
        .collect();
    captions.push(drawtext(params, "x=w-tw-10:y=h-th-10", r"%{pts\:hms}"));

    format!(
        "[0:v]scale={FRAME}:{FRAME}[bg];\
         [1:a]showwaves=s={FRAME}x{FRAME}:mode={}:colors={}@{}[waves];\
         [bg][waves]overlay=format=auto,format=yuv420p,{}[v]",
        params.mode.as_str(),
        params.wave_color,
        params.wave_opacity,
        captions.join(",")
    )
}

/// Single ffmpeg run that renders `audio` over the looped `background`.
///
/// Video is re-encoded with x264 and the audio copied. The output is cut at
/// the timeline total when known, otherwise at the shortest stream.
pub fn build_video_command(
    ffmpeg: &str,
    audio: &Path,
    background: &Path,
    output: &Path,
    timeline: &Timeline,
    params: &VisualParams,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffmpeg);
    cmd.args(["-y", "-loop", "1", "-i"])
        .arg(background)
        .arg("-i")
        .arg(audio)
        .arg("-filter_complex")
        .arg(video_graph(timeline, params))
        .args(["-map", "[v]", "-map", "1:a", "-c:v", "libx264", "-c:a", "copy"]);

    match timeline.total {
        Some(total) => cmd.arg("-t").arg(total.to_string()),
        None => cmd.arg("-shortest"),
    };

    cmd.arg(output);
    cmd
}
