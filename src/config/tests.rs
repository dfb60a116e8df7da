use super::load::{default_config_path, default_library_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_aria_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ARIA_CONFIG_PATH", "/tmp/aria-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/aria-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("aria")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("aria")
            .join("config.toml")
    );
}

#[test]
fn default_library_path_prefers_xdg_data_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_library_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-data-home")
            .join("aria")
            .join("songs.json")
    );
}

#[test]
fn default_library_path_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_library_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("share")
            .join("aria")
            .join("songs.json")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_order_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
client_id = "abc12345"
page_size = 50
audio_format = "ogg"
default_order = "releasedate_desc"

[player]
volume = 0.5
tick_interval_ms = 250

[library]
path = "/tmp/aria-songs.json"

[ui]
header_text = "hello"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ARIA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ARIA__CATALOG__CLIENT_ID");
    let _g3 = EnvGuard::remove("ARIA__CATALOG__PAGE_SIZE");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.client_id, "abc12345");
    assert_eq!(s.catalog.page_size, 50);
    assert_eq!(s.catalog.audio_format, "ogg");
    assert_eq!(s.catalog.default_order, OrderSetting::Latest);
    assert_eq!(s.catalog.base_url, "https://api.jamendo.com/v3.0");
    assert_eq!(s.player.volume, 0.5);
    assert_eq!(s.player.tick_interval_ms, 250);
    assert_eq!(
        s.library.path.as_deref(),
        Some(std::path::Path::new("/tmp/aria-songs.json"))
    );
    assert_eq!(s.ui.header_text, "hello");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
client_id = "from-file"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ARIA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ARIA__CATALOG__CLIENT_ID", "from-env");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.client_id, "from-env");
}

#[test]
fn order_setting_maps_onto_catalog_order() {
    use crate::catalog::Order;

    assert_eq!(Order::from(OrderSetting::Relevance), Order::Relevance);
    assert_eq!(Order::from(OrderSetting::Popular), Order::Popular);
    assert_eq!(Order::from(OrderSetting::Latest), Order::Latest);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.catalog.page_size = 0;
    assert!(s.validate().is_err());
    s.catalog.page_size = 500;
    assert!(s.validate().is_err());
    s.catalog.page_size = 20;

    s.player.tick_interval_ms = 1;
    assert!(s.validate().is_err());
    s.player.tick_interval_ms = 100;

    s.player.volume = 1.5;
    assert!(s.validate().is_err());
    s.player.volume = 0.7;
    assert!(s.validate().is_ok());
}
