// tests/settings_config.rs
use room_price_watch::config::settings::{ENV_CONFIG_PATH, ENV_THRESHOLD};
use room_price_watch::config::Settings;
use std::{env, fs};

#[test]
fn load_from_explicit_toml() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("room_watch.toml");
    fs::write(
        &p,
        r#"
threshold = 3000
currency_prefix = "¥"
utc_offset_hours = 9
"#,
    )
    .unwrap();
    let s = Settings::load_from(&p).unwrap();
    assert_eq!(s.threshold, 3000);
    assert_eq!(s.currency_prefix, "¥");
    assert_eq!(s.utc_offset_hours, 9);
    assert_eq!(s.probe_timeout_secs, 10);
}

#[test]
fn bad_custom_pattern_fails_checker_build() {
    let s: Settings = toml::from_str(
        r#"
[[sources]]
key = "x"
name = "X"
url = "http://x/"
pattern = "(["
"#,
    )
    .unwrap();
    let err = s.source_set().unwrap_err();
    assert!(format!("{err:#}").contains("'x'"), "got: {err:#}");
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ does not leak in
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_THRESHOLD);

    // 1) Nothing on disk -> built-in defaults
    let s = Settings::load_default().unwrap();
    assert_eq!(s.threshold, 4000);
    assert!(s.sources.is_none());

    // 2) ./config/room_watch.toml
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(tmp.path().join("config/room_watch.toml"), "threshold = 4500").unwrap();
    assert_eq!(Settings::load_default().unwrap().threshold, 4500);

    // 3) Env path wins over the fallback file
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "threshold = 2500").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(Settings::load_default().unwrap().threshold, 2500);

    // 4) Threshold env overrides the file
    env::set_var(ENV_THRESHOLD, "3333");
    assert_eq!(Settings::load_default().unwrap().threshold, 3333);

    // 5) Missing env path is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(Settings::load_default().is_err());

    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_THRESHOLD);
    env::set_current_dir(&old).unwrap();
}
