use super::load::{default_config_path, resolve_config_path};
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
fn defaults_are_sane() {
    let s = Settings::default();
    assert_eq!(s.playback.volume, 1.0);
    assert_eq!(s.playback.tick_interval_ms, 250);
    assert_eq!(s.rpc.timeout_ms, 5_000);
    assert!(s.rpc.api_key.is_none());
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_empty_base_url_and_zero_intervals() {
    let mut s = Settings::default();
    s.rpc.base_url = "  ".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.rpc.timeout_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.tick_interval_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn resolve_config_path_prefers_vivace_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", "/tmp/vivace-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/vivace-test-config.toml")
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
            .join("vivace")
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
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[rpc]
base_url = "https://api.example.com/rest/v1"
api_key = "anon-key"
timeout_ms = 1500

[playback]
volume = 0.4
tick_interval_ms = 100
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VIVACE__RPC__TIMEOUT_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.rpc.base_url, "https://api.example.com/rest/v1");
    assert_eq!(s.rpc.api_key.as_deref(), Some("anon-key"));
    assert_eq!(s.rpc.timeout_ms, 1500);
    assert_eq!(s.playback.volume, 0.4);
    assert_eq!(s.playback.tick_interval_ms, 100);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[rpc]
timeout_ms = 5000
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VIVACE__RPC__TIMEOUT_MS", "250");

    let s = Settings::load().unwrap();
    assert_eq!(s.rpc.timeout_ms, 250);
}
