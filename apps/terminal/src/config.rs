use std::{fs, io::ErrorKind, path::Path, str::FromStr, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::{domain::Size, messages::Messages};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub time_unit_ms: u64,
    pub container_width: u32,
    pub container_height: u32,
    pub token_width: u32,
    pub token_height: u32,
    pub seed: Option<u64>,
    pub messages: Messages,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_unit_ms: 1000,
            container_width: 640,
            container_height: 480,
            token_width: 96,
            token_height: 48,
            seed: None,
            messages: Messages::default(),
        }
    }
}

impl Settings {
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    pub fn container_size(&self) -> Size {
        Size::new(self.container_width, self.container_height)
    }

    pub fn token_size(&self) -> Size {
        Size::new(self.token_width, self.token_height)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    time_unit_ms: Option<u64>,
    container_width: Option<u32>,
    container_height: Option<u32>,
    token_width: Option<u32>,
    token_height: Option<u32>,
    seed: Option<u64>,
    messages: Option<Messages>,
}

/// Defaults, then the optional toml file at `path`, then environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file.time_unit_ms {
        settings.time_unit_ms = v;
    }
    if let Some(v) = file.container_width {
        settings.container_width = v;
    }
    if let Some(v) = file.container_height {
        settings.container_height = v;
    }
    if let Some(v) = file.token_width {
        settings.token_width = v;
    }
    if let Some(v) = file.token_height {
        settings.token_height = v;
    }
    if file.seed.is_some() {
        settings.seed = file.seed;
    }
    if let Some(messages) = file.messages {
        settings.messages = messages;
    }

    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env_value(&lookup, &["MEMORY_TIME_UNIT_MS", "APP__TIME_UNIT_MS"]) {
        settings.time_unit_ms = v;
    }
    if let Some(v) = env_value(&lookup, &["APP__CONTAINER_WIDTH"]) {
        settings.container_width = v;
    }
    if let Some(v) = env_value(&lookup, &["APP__CONTAINER_HEIGHT"]) {
        settings.container_height = v;
    }
    if let Some(v) = env_value(&lookup, &["APP__TOKEN_WIDTH"]) {
        settings.token_width = v;
    }
    if let Some(v) = env_value(&lookup, &["APP__TOKEN_HEIGHT"]) {
        settings.token_height = v;
    }
    if let Some(v) = env_value(&lookup, &["APP__SEED"]) {
        settings.seed = Some(v);
    }
}

// Later keys win, matching the APP__ prefix taking precedence over legacy names.
fn env_value<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<T> {
    let mut value = None;
    for &key in keys {
        let Some(raw) = lookup(key) else {
            continue;
        };
        match raw.trim().parse::<T>() {
            Ok(parsed) => value = Some(parsed),
            Err(_) => warn!(key, raw = raw.as_str(), "config: ignoring unparsable override"),
        }
    }
    value
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
