use std::{env, fs, path::PathBuf};

use once_cell::sync::Lazy;
use trellis::ini::{Ini, IniError, GLOBAL};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data")).join(name)
}

fn sample() -> &'static Ini {
    static INI: Lazy<Ini> = Lazy::new(|| Ini::load(data_path("sample.ini")).unwrap());
    &INI
}

#[test]
fn load_sample() {
    let ini = sample();
    assert_eq!(ini.get_parsed::<u32>(GLOBAL, "version").unwrap(), Some(3));
    assert_eq!(ini.get("window", "title"), Some("  Trellis Demo  "));
    assert_eq!(ini.get_parsed::<u32>("window", "width").unwrap(), Some(1280));
    assert_eq!(ini.get_bool("window", "fullscreen").unwrap(), Some(false));
    assert_eq!(ini.get_bool("window", "vsync").unwrap(), Some(true));
    assert_eq!(ini.get_parsed::<f32>("audio", "volume").unwrap(), Some(0.8));
    assert_eq!(ini.get("audio", "device"), Some("default"));
    assert_eq!(ini.get_bool("audio", "muted").unwrap(), Some(false));

    let names = ini.sections().map(|(name, _)| name).collect::<Vec<_>>();
    assert_eq!(names, ["", "audio", "window"]);
}

#[test]
fn save_and_reload() {
    let mut ini = sample().clone();
    ini.set("audio", "device", "speakers; left").unwrap();
    ini.set("network", "host", "example.org").unwrap();
    ini.remove("window", "vsync");

    let path = env::temp_dir().join(format!("trellis-ini-{}.ini", std::process::id()));
    ini.save(&path).unwrap();
    let reloaded = Ini::load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(reloaded, ini);
    assert_eq!(reloaded.get("audio", "device"), Some("speakers; left"));
    assert!(!reloaded.contains("window", "vsync"));
}

#[test]
fn missing_file() {
    match Ini::load(data_path("does-not-exist.ini")) {
        Err(IniError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected I/O error, got {other:?}"),
    }
}
