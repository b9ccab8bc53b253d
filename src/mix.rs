use std::path::Path;

use crate::command::ToolCommand;
use crate::error::MixError;
use crate::playlist::Track;

/// Fade curve for both sides of every crossfade.
const CURVE: &str = "tri";

/// Chained `acrossfade` graph: `[0:a][1:a]` into `[a1]`, then each further
/// input against the previous label. Returns the graph and its final label.
pub fn crossfade_graph(inputs: usize, crossfade: u32) -> (String, String) {
    let mut last = "[0:a]".to_string();
    let mut stages = Vec::with_capacity(inputs.saturating_sub(1));

    for i in 1..inputs {
        let current = format!("[a{i}]");
        stages.push(format!(
            "{last}[{i}:a]acrossfade=d={crossfade}:c1={CURVE}:c2={CURVE}{current}"
        ));
        last = current;
    }

    (stages.join(";"), last)
}

/// Single ffmpeg run that crossfades every track into `output` as MP3.
///
/// One track degrades to a plain re-encode.
pub fn build_mix_command(
    ffmpeg: &str,
    tracks: &[Track],
    crossfade: u32,
    output: &Path,
) -> Result<ToolCommand, MixError> {
    if tracks.is_empty() {
        return Err(MixError::InsufficientTracks { found: 0 });
    }

    let mut cmd = ToolCommand::new(ffmpeg);
    cmd.arg("-y");
    for track in tracks {
        cmd.arg("-i").arg(&track.path);
    }

    if tracks.len() == 1 {
        cmd.args(["-map", "0:a"]);
    } else {
        let (graph, last) = crossfade_graph(tracks.len(), crossfade);
        cmd.arg("-filter_complex").arg(graph).arg("-map").arg(last);
    }

    cmd.args(["-c:a", "libmp3lame"]).arg(output);
    Ok(cmd)
}
