use std::path::Path;

use serde::Deserialize;

use crate::command::ToolCommand;
use crate::error::MixError;

/// Source of track durations for the probed caption timeline.
pub trait DurationProvider {
    /// Duration of the media at `path`, in seconds.
    fn duration(&self, path: &Path) -> Result<f64, MixError>;
}

/// Reads durations with `ffprobe`'s JSON output.
#[derive(Debug, Clone)]
pub struct Ffprobe {
    program: String,
}

impl Ffprobe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command(&self, path: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.program);
        cmd.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path);
        cmd
    }
}

impl DurationProvider for Ffprobe {
    fn duration(&self, path: &Path) -> Result<f64, MixError> {
        let output = self.command(path).run()?;
        parse_duration(&output.stdout).map_err(|reason| MixError::Probe {
            path: path.to_path_buf(),
            reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// Container duration, falling back to the first audio stream's.
fn parse_duration(json: &[u8]) -> Result<f64, String> {
    let report: ProbeReport =
        serde_json::from_slice(json).map_err(|e| format!("unreadable ffprobe output: {e}"))?;

    let raw = report
        .format
        .and_then(|f| f.duration)
        .or_else(|| {
            report
                .streams
                .into_iter()
                .filter(|s| s.codec_type.as_deref() == Some("audio"))
                .find_map(|s| s.duration)
        })
        .ok_or_else(|| "ffprobe reported no duration".to_string())?;

    let seconds = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid duration {raw:?}: {e}"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid duration {raw:?}"));
    }
    Ok(seconds)
}
