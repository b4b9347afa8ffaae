//! Configuration types and loading.
//!
//! Config is loaded once at start-up from a JSON file (e.g. `~/.mazerobo/config.json`)
//! and environment, then handed to the gateway, light client and connector.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Chat-platform app identity.
    #[serde(default)]
    pub bot: BotConfig,

    /// Smart-light endpoint.
    #[serde(default)]
    pub light: LightConfig,
}

/// Gateway bind, port and messages endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 3978, the connector's conventional bot port).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,

    /// Path the connector POSTs activities to (default "/api/messages").
    #[serde(default = "default_messages_path")]
    pub messages_path: String,
}

fn default_gateway_port() -> u16 {
    3978
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_messages_path() -> String {
    "/api/messages".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
            messages_path: default_messages_path(),
        }
    }
}

/// App credentials for the connector. Both absent = emulator mode (no outbound auth).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Overridden by MICROSOFT_APP_ID env.
    pub app_id: Option<String>,
    /// Overridden by MICROSOFT_APP_PASSWORD env.
    pub app_password: Option<String>,
}

/// Light API config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightConfig {
    /// Full URL of the light state resource that receives PUTs. Overridden by URL env.
    pub url: Option<String>,
}

impl BotConfig {
    /// Both halves, trimmed and non-empty; otherwise None (emulator mode).
    pub fn credentials(&self) -> Option<AppCredentials> {
        Some(AppCredentials {
            app_id: config_value(&self.app_id)?,
            app_password: config_value(&self.app_password)?,
        })
    }
}

/// App id and password, both non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_password: String,
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn config_value(v: &Option<String>) -> Option<String> {
    v.as_deref().and_then(non_empty)
}

/// Light endpoint: env URL overrides config.
fn light_url_from(config: &Config, env: impl Fn(&str) -> Option<String>) -> Option<String> {
    env("URL")
        .as_deref()
        .and_then(non_empty)
        .or_else(|| config_value(&config.light.url))
}

/// Apply environment overrides so the rest of the process only reads the struct.
pub fn apply_env_overrides(config: Config) -> Config {
    overrides_from(config, |name| std::env::var(name).ok())
}

/// Blank values from `env` count as unset.
fn overrides_from(mut config: Config, env: impl Fn(&str) -> Option<String>) -> Config {
    let value = |name: &str| env(name).as_deref().and_then(non_empty);
    config.light.url = light_url_from(&config, &env);
    if let Some(id) = value("MICROSOFT_APP_ID") {
        config.bot.app_id = Some(id);
    }
    if let Some(pw) = value("MICROSOFT_APP_PASSWORD") {
        config.bot.app_password = Some(pw);
    }
    config
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("MAZEROBO_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".mazerobo").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Parse a config document. Empty input yields defaults.
pub fn parse_config(s: &str) -> Result<Config> {
    if s.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_json::from_str(s)?)
}

/// Load config from the given path (or MAZEROBO_CONFIG_PATH / default). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        parse_config(&s).with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((apply_env_overrides(config), path))
}
