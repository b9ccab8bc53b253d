use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::error::MixError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Serialises tests that touch the process environment.
static ENV: Mutex<()> = Mutex::new(());

/// Environment overrides that are rolled back on drop. Holds the env lock.
struct ScopedEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }

    fn set(mut self, key: &'static str, val: impl AsRef<std::ffi::OsStr>) -> Self {
        self.saved.push((key, std::env::var_os(key)));
        std::env::set_var(key, val);
        self
    }

    fn unset(mut self, key: &'static str) -> Self {
        self.saved.push((key, std::env::var_os(key)));
        std::env::remove_var(key);
        self
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, old) in self.saved.drain(..).rev() {
            match old {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn explicit_config_wins_over_env_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let from_env = write_config(dir.path(), "env.toml", "[mix]\ncrossfade_secs = 3\n");
    let explicit = write_config(dir.path(), "cli.toml", "[mix]\ncrossfade_secs = 9\n");
    let _env = ScopedEnv::new()
        .set("MIXVID_CONFIG_PATH", &from_env)
        .unset("MIXVID__MIX__CROSSFADE_SECS");

    assert_eq!(Settings::load(Some(&explicit)).unwrap().mix.crossfade_secs, 9);
    assert_eq!(Settings::load(None).unwrap().mix.crossfade_secs, 3);
}

#[test]
fn missing_env_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let _env = ScopedEnv::new()
        .set("MIXVID_CONFIG_PATH", dir.path().join("absent.toml"))
        .unset("MIXVID__MIX__CROSSFADE_SECS");

    let s = Settings::load(None).unwrap();
    assert_eq!(s.mix.crossfade_secs, 5);
    assert_eq!(s.waves.mode, WaveMode::Line);
}

#[test]
fn empty_env_config_path_uses_xdg_location() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "mixvid/config.toml", "[waves]\nmode = \"cline\"\n");
    let _env = ScopedEnv::new()
        .set("MIXVID_CONFIG_PATH", "")
        .set("XDG_CONFIG_HOME", dir.path());

    assert_eq!(
        resolve_config_path().unwrap(),
        dir.path().join("mixvid").join("config.toml")
    );
    assert_eq!(Settings::load(None).unwrap().waves.mode, WaveMode::Cline);
}

#[test]
fn relative_xdg_config_home_is_ignored() {
    let _env = ScopedEnv::new()
        .set("XDG_CONFIG_HOME", "relative/config")
        .set("HOME", "/tmp/mixvid-home");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/mixvid-home/.config/mixvid/config.toml")
    );
}

#[test]
fn defaults_match_the_classic_look() {
    let s = Settings::default();
    assert_eq!(s.mix.crossfade_secs, 5);
    assert_eq!(s.waves.mode, WaveMode::Line);
    assert_eq!(s.waves.color, "white");
    assert_eq!(s.waves.opacity, 1.0);
    assert_eq!(s.captions.color, "orange");
    assert_eq!(s.captions.size, 24);
    assert_eq!(s.captions.timing, CaptionTiming::Probed);
    assert_eq!(s.captions.window_secs, 60);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[mix]
crossfade_secs = 3

[waves]
mode = "p2p"
color = "0x00FF00"
opacity = 0.5

[captions]
color = "yellow"
size = 32
timing = "fixed"
window_secs = 90

[tools]
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
"#,
    )
    .unwrap();

    let _env = ScopedEnv::new()
        .set("MIXVID_CONFIG_PATH", &cfg_path)
        .unset("MIXVID__MIX__CROSSFADE_SECS");

    let s = Settings::load(None).unwrap();
    assert_eq!(s.mix.crossfade_secs, 3);
    assert_eq!(s.waves.mode, WaveMode::P2p);
    assert_eq!(s.waves.color, "0x00FF00");
    assert_eq!(s.waves.opacity, 0.5);
    assert_eq!(s.captions.color, "yellow");
    assert_eq!(s.captions.size, 32);
    assert_eq!(s.captions.timing, CaptionTiming::Fixed);
    assert_eq!(s.captions.window_secs, 90);
    assert_eq!(s.tools.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
    assert_eq!(s.tools.ffprobe, "ffprobe");
}

#[test]
fn settings_env_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_config(dir.path(), "config.toml", "[mix]\ncrossfade_secs = 3\n");
    let _env = ScopedEnv::new().set("MIXVID__MIX__CROSSFADE_SECS", "8");

    let s = Settings::load(Some(&cfg_path)).unwrap();
    assert_eq!(s.mix.crossfade_secs, 8);
}

#[test]
fn explicit_config_file_must_exist() {
    let _env = ScopedEnv::new();
    let dir = tempfile::tempdir().unwrap();
    assert!(Settings::load(Some(&dir.path().join("missing.toml"))).is_err());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.waves.opacity = 1.5;
    assert!(matches!(s.validate(), Err(MixError::Config(_))));

    let mut s = Settings::default();
    s.captions.size = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.tools.ffprobe = "  ".to_string();
    assert!(s.validate().is_err());
}
