use crate::config::{Settings, WaveMode};

/// Rendering options shared by the mix and video builders, fixed for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualParams {
    /// Crossfade between consecutive tracks, in seconds.
    pub crossfade: u32,
    pub mode: WaveMode,
    pub wave_color: String,
    /// 0.0 is fully transparent, 1.0 opaque.
    pub wave_opacity: f32,
    pub caption_color: String,
    pub caption_size: u32,
}

impl From<&Settings> for VisualParams {
    fn from(settings: &Settings) -> Self {
        Self {
            crossfade: settings.mix.crossfade_secs,
            mode: settings.waves.mode,
            wave_color: settings.waves.color.clone(),
            wave_opacity: settings.waves.opacity,
            caption_color: settings.captions.color.clone(),
            caption_size: settings.captions.size,
        }
    }
}
