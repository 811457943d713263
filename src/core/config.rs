//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.stratum/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StratumConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Catalog TOML replacing the built-in site content.
    pub content_file: Option<String>,
    pub haptics: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThemeConfig {
    pub header_color: Option<String>,
    pub background_color: Option<String>,
    pub accent_color: Option<String>,
    pub closing_confirmation: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BridgeConfig {
    pub enabled: Option<bool>,
    pub outbox: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_HEADER_COLOR: &str = "#F5F5F7";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#F5F5F7";
pub const DEFAULT_ACCENT_COLOR: &str = "#0071E3";
pub const DEFAULT_OUTBOX_FILE: &str = "outbox.jsonl";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub header_color: String,
    pub background_color: String,
    pub accent_color: String,
    pub closing_confirmation: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: DEFAULT_HEADER_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            closing_confirmation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub content_file: Option<PathBuf>,
    pub haptics: bool,
    pub theme: Theme,
    pub bridge_enabled: bool,
    pub outbox: PathBuf,
}

/// Values given on the command line. `None`/`false` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub content: Option<PathBuf>,
    pub outbox: Option<PathBuf>,
    pub no_bridge: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.stratum`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".stratum"))
}

/// Returns the path to `~/.stratum/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.stratum/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `StratumConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<StratumConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(StratumConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<StratumConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(StratumConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: StratumConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r##"# Stratum Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# content_file = "content.toml"      # Relative to ~/.stratum/ (or STRATUM_CONTENT)
# haptics = true

# [theme]
# header_color = "#F5F5F7"
# background_color = "#F5F5F7"
# accent_color = "#0071E3"
# closing_confirmation = true

# [bridge]
# enabled = true                     # Or set STRATUM_NO_BRIDGE=1 to disable
# outbox = "outbox.jsonl"            # Relative to ~/.stratum/ (or STRATUM_OUTBOX)
"##;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &StratumConfig, cli: &CliOverrides) -> ResolvedConfig {
    let base = config_dir().unwrap_or_else(|| PathBuf::from("."));
    resolve_with(config, cli, &base, |key| std::env::var(key).ok())
}

/// Resolution with the environment and base directory injected.
///
/// Paths from the config file are relative to `base`; paths from env vars
/// and CLI flags are taken as given.
pub fn resolve_with(
    config: &StratumConfig,
    cli: &CliOverrides,
    base: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Content: CLI → env → config → built-in
    let content_file = cli
        .content
        .clone()
        .or_else(|| env("STRATUM_CONTENT").map(PathBuf::from))
        .or_else(|| config.general.content_file.as_ref().map(|f| base.join(f)));

    // Outbox: CLI → env → config → default
    let outbox = cli
        .outbox
        .clone()
        .or_else(|| env("STRATUM_OUTBOX").map(PathBuf::from))
        .or_else(|| config.bridge.outbox.as_ref().map(|f| base.join(f)))
        .unwrap_or_else(|| base.join(DEFAULT_OUTBOX_FILE));

    // Bridge: --no-bridge and STRATUM_NO_BRIDGE both switch it off
    let env_disabled = env("STRATUM_NO_BRIDGE").is_some_and(|v| is_truthy(&v));
    let bridge_enabled = !cli.no_bridge && !env_disabled && config.bridge.enabled.unwrap_or(true);

    let defaults = Theme::default();
    let theme = Theme {
        header_color: config
            .theme
            .header_color
            .clone()
            .unwrap_or(defaults.header_color),
        background_color: config
            .theme
            .background_color
            .clone()
            .unwrap_or(defaults.background_color),
        accent_color: config
            .theme
            .accent_color
            .clone()
            .unwrap_or(defaults.accent_color),
        closing_confirmation: config
            .theme
            .closing_confirmation
            .unwrap_or(defaults.closing_confirmation),
    };

    ResolvedConfig {
        content_file,
        haptics: config.general.haptics.unwrap_or(true),
        theme,
        bridge_enabled,
        outbox,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = StratumConfig::default();
        let resolved = resolve_with(&config, &CliOverrides::default(), Path::new("/cfg"), no_env);
        assert_eq!(resolved.content_file, None);
        assert!(resolved.haptics);
        assert!(resolved.bridge_enabled);
        assert_eq!(resolved.outbox, PathBuf::from("/cfg/outbox.jsonl"));
        assert_eq!(resolved.theme, Theme::default());
        assert_eq!(resolved.theme.header_color, "#F5F5F7");
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = StratumConfig {
            general: GeneralConfig {
                content_file: Some("site.toml".to_string()),
                haptics: Some(false),
            },
            theme: ThemeConfig {
                accent_color: Some("#FF0000".to_string()),
                closing_confirmation: Some(false),
                ..Default::default()
            },
            bridge: BridgeConfig {
                enabled: Some(false),
                outbox: Some("orders.jsonl".to_string()),
            },
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), Path::new("/cfg"), no_env);
        assert_eq!(resolved.content_file, Some(PathBuf::from("/cfg/site.toml")));
        assert!(!resolved.haptics);
        assert!(!resolved.bridge_enabled);
        assert_eq!(resolved.outbox, PathBuf::from("/cfg/orders.jsonl"));
        assert_eq!(resolved.theme.accent_color, "#FF0000");
        assert_eq!(resolved.theme.background_color, DEFAULT_BACKGROUND_COLOR);
        assert!(!resolved.theme.closing_confirmation);
    }

    #[test]
    fn test_env_overrides_config() {
        let config = StratumConfig {
            bridge: BridgeConfig {
                outbox: Some("orders.jsonl".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = env_of(&[
            ("STRATUM_OUTBOX", "/tmp/out.jsonl"),
            ("STRATUM_CONTENT", "/tmp/site.toml"),
            ("STRATUM_NO_BRIDGE", "yes"),
        ]);
        let resolved = resolve_with(&config, &CliOverrides::default(), Path::new("/cfg"), env);
        assert_eq!(resolved.outbox, PathBuf::from("/tmp/out.jsonl"));
        assert_eq!(resolved.content_file, Some(PathBuf::from("/tmp/site.toml")));
        assert!(!resolved.bridge_enabled);
    }

    #[test]
    fn test_cli_wins() {
        let cli = CliOverrides {
            content: Some(PathBuf::from("cli.toml")),
            outbox: Some(PathBuf::from("cli.jsonl")),
            no_bridge: true,
        };
        let env = env_of(&[("STRATUM_OUTBOX", "/tmp/out.jsonl"), ("STRATUM_NO_BRIDGE", "0")]);
        let resolved = resolve_with(&StratumConfig::default(), &cli, Path::new("/cfg"), env);
        assert_eq!(resolved.content_file, Some(PathBuf::from("cli.toml")));
        assert_eq!(resolved.outbox, PathBuf::from("cli.jsonl"));
        assert!(!resolved.bridge_enabled);
    }

    #[test]
    fn test_falsy_env_keeps_bridge() {
        let env = env_of(&[("STRATUM_NO_BRIDGE", "false")]);
        let resolved =
            resolve_with(&StratumConfig::default(), &CliOverrides::default(), Path::new("/cfg"), env);
        assert!(resolved.bridge_enabled);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r##"
[theme]
header_color = "#000000"
"##;
        let config: StratumConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme.header_color.as_deref(), Some("#000000"));
        assert!(config.theme.accent_color.is_none());
        assert!(config.general.content_file.is_none());
        assert!(config.bridge.enabled.is_none());
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let config: StratumConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.general.haptics.is_none());
    }

    #[test]
    fn test_load_generates_default_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.theme.header_color.is_none());
        assert!(path.exists());
        assert!(fs::read_to_string(&path).unwrap().starts_with("# Stratum Configuration"));
    }

    #[test]
    fn test_load_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\nhaptics = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
