use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::OnairConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["onair.toml", "onair.yaml", "onair.yml", "onair.json"];

/// Environment variables that override file values.
pub const ENV_PORT: &str = "PORT";
pub const ENV_BIND: &str = "BIND";
pub const ENV_CONTROL_KEY: &str = "LIVE_CONTROL_KEY";
pub const ENV_NOTIFY_WEBHOOK_URL: &str = "LIVE_NOTIFY_WEBHOOK_URL";
pub const ENV_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";
pub const ENV_CONTROL_CHANNEL: &str = "LIVE_CONTROL_CHANNEL";
pub const ENV_API_BASE: &str = "LIVE_API_BASE";
pub const ENV_FAN_WEBHOOK_URL: &str = "FAN_WEBHOOK_URL";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<OnairConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply
/// environment overrides.
///
/// Search order:
/// 1. `./onair.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/onair/onair.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `OnairConfig::default()` when no file is found or the file
/// does not parse.
pub fn discover_and_load() -> OnairConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                OnairConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            OnairConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Overlay environment values on `config`.
///
/// Optional settings are replaced even with an empty value, so an empty
/// `LIVE_CONTROL_KEY` disables a key set in the file.
pub fn apply_env_overrides(config: &mut OnairConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(port) = lookup(ENV_PORT) {
        match port.trim().parse() {
            Ok(p) => config.server.port = p,
            Err(_) => warn!(value = %port, "ignoring invalid {ENV_PORT}"),
        }
    }
    if let Some(bind) = lookup(ENV_BIND).filter(|b| !b.trim().is_empty()) {
        config.server.bind = bind;
    }
    if let Some(key) = lookup(ENV_CONTROL_KEY) {
        config.live.control_key = Some(key);
    }
    if let Some(url) = lookup(ENV_NOTIFY_WEBHOOK_URL) {
        config.live.notify_webhook_url = Some(url);
    }
    if let Some(token) = lookup(ENV_BOT_TOKEN) {
        config.discord.bot_token = Some(token);
    }
    if let Some(channel) = lookup(ENV_CONTROL_CHANNEL).filter(|c| !c.trim().is_empty()) {
        config.discord.control_channel = channel;
    }
    if let Some(base) = lookup(ENV_API_BASE) {
        config.discord.api_base = Some(base);
    }
    if let Some(url) = lookup(ENV_FAN_WEBHOOK_URL) {
        config.relay.webhook_url = Some(url);
    }
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory, `~/.config/onair/`.
pub fn config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("onair"))
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<OnairConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
