use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::MixError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub name: String,
}

/// First `.m3u`/`.m3u8` file in `dir`, by file name.
pub fn find_playlist(dir: &Path) -> Result<PathBuf, MixError> {
    let missing = || MixError::MissingPlaylist {
        dir: dir.to_path_buf(),
    };

    let mut playlists: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|_| missing())?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            (path.is_file() && (ext == "m3u" || ext == "m3u8")).then_some(path)
        })
        .collect();

    playlists.sort();
    playlists.into_iter().next().ok_or_else(missing)
}

pub fn read_playlist(path: &Path) -> Result<Vec<Track>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read playlist {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(parse_playlist(&contents, base))
}

/// One track per line that is neither blank nor a `#` comment, resolved
/// against `base`. A leading byte-order mark is dropped.
pub fn parse_playlist(contents: &str, base: &Path) -> Vec<Track> {
    contents
        .strip_prefix('\u{FEFF}')
        .unwrap_or(contents)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| Track {
            path: base.join(line),
            name: Path::new(line)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| line.to_string()),
        })
        .collect()
}

pub fn require_mixable(tracks: &[Track]) -> Result<(), MixError> {
    if tracks.len() < 2 {
        return Err(MixError::InsufficientTracks {
            found: tracks.len(),
        });
    }
    Ok(())
}
