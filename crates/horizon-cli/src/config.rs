// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use horizon_app::Screen;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR: &str = "horizon";
pub const CONFIG_PATH_ENV: &str = "HORIZON_CONFIG_PATH";
pub const BASE_URL_ENV: &str = "HORIZON_API_BASE_URL";

const CONFIG_VERSION: i64 = 1;
const DEFAULT_APP_NAME: &str = "42.AI Horizon";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub app: App,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
            app: App::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_screen: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_screen: Some(Screen::Catalog.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub name: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            name: Some(DEFAULT_APP_NAME.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_DIR);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [api], [ui], and [app]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `horizon --print-example-config` for a template",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            horizon_api::normalize_base_url(base_url)
                .with_context(|| format!("invalid [api] section in {}", path.display()))?;
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(screen) = &self.ui.start_screen
            && Screen::parse(screen).is_none()
        {
            bail!(
                "ui.start_screen in {} must be \"catalog\" or \"inquiry\", got {:?}",
                path.display(),
                screen
            );
        }

        if let Some(name) = &self.app.name
            && name.trim().is_empty()
        {
            bail!("app.name in {} must not be blank", path.display());
        }

        Ok(())
    }

    /// Base URL from the config file, then `HORIZON_API_BASE_URL`, then the
    /// local development default.
    pub fn api_base_url(&self) -> Result<String> {
        let raw = match &self.api.base_url {
            Some(url) => url.clone(),
            None => match env::var(BASE_URL_ENV) {
                Ok(url) if !url.trim().is_empty() => url,
                _ => horizon_api::DEFAULT_BASE_URL.to_owned(),
            },
        };
        horizon_api::normalize_base_url(&raw)
            .with_context(|| format!("set [api].base_url or {BASE_URL_ENV} to an http(s) URL"))
    }

    pub fn api_timeout(&self) -> Result<Option<Duration>> {
        self.api.timeout.as_deref().map(parse_duration).transpose()
    }

    pub fn start_screen(&self) -> Screen {
        self.ui
            .start_screen
            .as_deref()
            .and_then(Screen::parse)
            .unwrap_or(Screen::Catalog)
    }

    pub fn app_name(&self) -> &str {
        self.app.name.as_deref().unwrap_or(DEFAULT_APP_NAME)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# horizon config\n# Place this file at: {}\n\nversion = 1\n\n[api]\n# Falls back to {} and then to the default below.\nbase_url = \"{}\"\n# Optional. Unset means requests wait on the server.\n# timeout = \"10s\"\n\n[ui]\n# catalog or inquiry\nstart_screen = \"catalog\"\n\n[app]\nname = \"{}\"\n",
            path.display(),
            BASE_URL_ENV,
            horizon_api::DEFAULT_BASE_URL,
            DEFAULT_APP_NAME,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{BASE_URL_ENV, CONFIG_PATH_ENV, Config, parse_duration};
    use anyhow::Result;
    use horizon_app::Screen;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(BASE_URL_ENV);
        }
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.api_base_url()?, "http://localhost:3001");
        assert_eq!(config.api_timeout()?, None);
        assert_eq!(config.start_screen(), Screen::Catalog);
        assert_eq!(config.app_name(), "42.AI Horizon");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url=\"http://localhost:3001\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [ui], and [app]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"https://api.example.com//\"\ntimeout = \"2s\"\n[ui]\nstart_screen = \"inquiry\"\n[app]\nname = \"Studio\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url()?, "https://api.example.com");
        assert_eq!(config.api_timeout()?, Some(Duration::from_secs(2)));
        assert_eq!(config.start_screen(), Screen::Inquiry);
        assert_eq!(config.app_name(), "Studio");
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn base_url_without_http_scheme_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\nbase_url = \"ftp://example.com\"\n")?;
        let error = Config::load(&path).expect_err("ftp base url should fail");
        let message = format!("{error:#}");
        assert!(message.contains("[api]"), "unexpected message: {message}");
        assert!(message.contains("http or https"), "unexpected message: {message}");
        Ok(())
    }

    #[test]
    fn unknown_start_screen_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_screen = \"dashboard\"\n")?;
        let error = Config::load(&path).expect_err("unknown screen should fail");
        assert!(error.to_string().contains("ui.start_screen"));
        Ok(())
    }

    #[test]
    fn blank_app_name_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[app]\nname = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank name should fail");
        assert!(error.to_string().contains("must not be blank"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("horizon/config.toml"));
        Ok(())
    }

    #[test]
    fn base_url_prefers_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[api]\nbase_url = \"http://from-config:3001\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(BASE_URL_ENV, "http://from-env:3001");
        }
        let config = Config::load(&path)?;
        let resolved = config.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(BASE_URL_ENV);
        }
        assert_eq!(resolved?, "http://from-config:3001");
        Ok(())
    }

    #[test]
    fn base_url_uses_env_override_when_config_value_missing() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(BASE_URL_ENV, "https://portfolio.example.com/");
        }
        let config = Config::load(&path)?;
        let resolved = config.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(BASE_URL_ENV);
        }
        assert_eq!(resolved?, "https://portfolio.example.com");
        Ok(())
    }

    #[test]
    fn invalid_env_base_url_points_at_both_sources() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(BASE_URL_ENV, "localhost:3001");
        }
        let config = Config::load(&path)?;
        let resolved = config.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(BASE_URL_ENV);
        }
        let message = resolved.expect_err("scheme-less url should fail").to_string();
        assert!(message.contains(BASE_URL_ENV), "unexpected message: {message}");
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn timeout_rejects_invalid_duration() {
        let error = parse_duration("oops").expect_err("invalid duration should fail");
        let message = error.to_string();
        assert!(
            message.contains("invalid duration") || message.contains("invalid timeout duration"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn timeout_rejects_non_positive_values_in_config() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[app]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url()?, "http://localhost:3001");
        assert_eq!(config.start_screen(), Screen::Catalog);
        Ok(())
    }
}
