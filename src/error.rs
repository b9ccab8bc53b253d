use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MixError {
    #[error("no .m3u playlist found in {}", .dir.display())]
    MissingPlaylist { dir: PathBuf },

    #[error("a mix needs at least two tracks in the playlist, found {found}")]
    InsufficientTracks { found: usize },

    #[error("command exited with {}: {command}", .code.map_or("a signal".to_string(), |c| format!("code {c}")))]
    ToolFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("failed to launch {program}: {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} was not found in PATH")]
    ToolMissing { program: String },

    #[error("could not read duration of {}: {reason}", .path.display())]
    Probe { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}
