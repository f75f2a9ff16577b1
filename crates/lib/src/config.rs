//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.gemline/config.json`) and
//! environment. The LINE channel secret/access token and the Gemini API key
//! are required at startup; everything else has defaults.

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

    /// Channel settings (LINE).
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Gemini API settings (key, models).
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for the webhook HTTP server (default 5000). Overridden by PORT env.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the LINE platform must reach /callback).
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    5000
}

fn default_gateway_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Per-channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsConfig {
    #[serde(default)]
    pub line: LineChannelConfig,
}

/// LINE Messaging API channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChannelConfig {
    /// Channel secret used to verify x-line-signature. Overridden by ChannelSecret env.
    pub channel_secret: Option<String>,
    /// Long-lived channel access token for the Messaging API. Overridden by ChannelAccessToken env.
    pub channel_access_token: Option<String>,
    /// Messaging API base (default https://api.line.me). Override for tests.
    pub api_base: Option<String>,
    /// Content (blob) API base (default https://api-data.line.me). Override for tests.
    pub blob_base: Option<String>,
}

/// Gemini API config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiConfig {
    /// API key. Overridden by GOOGLE_GEMINI_API_KEY env.
    pub api_key: Option<String>,
    /// Text model (default "gemini-pro").
    pub model: Option<String>,
    /// Vision model for image description (default "gemini-pro-vision").
    pub vision_model: Option<String>,
    /// API base (default https://generativelanguage.googleapis.com). Override for tests.
    pub base_url: Option<String>,
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn config_nonempty(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve the LINE channel secret: env ChannelSecret overrides config.
pub fn resolve_channel_secret(config: &Config) -> Option<String> {
    env_nonempty("ChannelSecret").or_else(|| config_nonempty(&config.channels.line.channel_secret))
}

/// Resolve the LINE channel access token: env ChannelAccessToken overrides config.
pub fn resolve_channel_access_token(config: &Config) -> Option<String> {
    env_nonempty("ChannelAccessToken")
        .or_else(|| config_nonempty(&config.channels.line.channel_access_token))
}

/// Resolve the Gemini API key: env GOOGLE_GEMINI_API_KEY overrides config.
pub fn resolve_gemini_api_key(config: &Config) -> Option<String> {
    env_nonempty("GOOGLE_GEMINI_API_KEY").or_else(|| config_nonempty(&config.gemini.api_key))
}

/// Resolve the gateway port: env PORT overrides config.
pub fn resolve_port(config: &Config) -> u16 {
    env_nonempty("PORT")
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.gateway.port)
}

/// Resolve config path from env or default (~/.gemline/config.json).
pub fn default_config_path() -> PathBuf {
    std::env::var("GEMLINE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".gemline").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or GEMLINE_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gateway_port_and_bind() {
        let g = GatewayConfig::default();
        assert_eq!(g.port, 5000);
        assert_eq!(g.bind, "0.0.0.0");
    }

    #[test]
    fn empty_config_values_resolve_to_none() {
        let mut config = Config::default();
        config.channels.line.channel_secret = Some("   ".to_string());
        assert_eq!(resolve_channel_secret(&config), None);
    }

    #[test]
    fn config_values_are_trimmed() {
        let mut config = Config::default();
        config.channels.line.channel_access_token = Some("  tok-123  ".to_string());
        assert_eq!(
            resolve_channel_access_token(&config),
            Some("tok-123".to_string())
        );
    }

    #[test]
    fn parses_camel_case_config() {
        let s = r#"{
            "gateway": { "port": 8080 },
            "channels": { "line": { "channelSecret": "s", "channelAccessToken": "t" } },
            "gemini": { "apiKey": "k", "visionModel": "gemini-pro-vision" }
        }"#;
        let config: Config = serde_json::from_str(s).expect("parse config");
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.channels.line.channel_secret.as_deref(), Some("s"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("k"));
        assert_eq!(
            config.gemini.vision_model.as_deref(),
            Some("gemini-pro-vision")
        );
    }
}
