use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// Default path: `$XDG_CONFIG_HOME/mixvid/config.toml` or
/// `~/.config/mixvid/config.toml`, overridden by `MIXVID_CONFIG_PATH`.
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `MIXVID__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mix: MixSettings,
    pub waves: WaveSettings,
    pub captions: CaptionSettings,
    pub tools: ToolSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MixSettings {
    /// Crossfade between consecutive tracks (seconds).
    pub crossfade_secs: u32,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self { crossfade_secs: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveSettings {
    pub mode: WaveMode,
    /// Colour name (`red`) or hex code (`0xFFFFFF`).
    pub color: String,
    /// From 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            mode: WaveMode::Line,
            color: "white".to_string(),
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    pub color: String,
    pub size: u32,
    pub timing: CaptionTiming,
    /// Length of every caption window under `fixed` timing (seconds).
    pub window_secs: u32,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            color: "orange".to_string(),
            size: 24,
            timing: CaptionTiming::Probed,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

/// `showwaves` render modes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WaveMode {
    /// A point for each sample
    Point,
    /// A vertical line for each sample
    Line,
    /// Points joined point to point
    P2p,
    /// A centered vertical line for each sample
    Cline,
}

impl WaveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WaveMode::Point => "point",
            WaveMode::Line => "line",
            WaveMode::P2p => "p2p",
            WaveMode::Cline => "cline",
        }
    }
}

/// How caption windows are placed on the timeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CaptionTiming {
    /// Every track gets the same fixed-length window
    Fixed,
    /// Windows follow the probed duration of each track
    Probed,
}
