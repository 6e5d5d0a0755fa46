//! Application configuration loading.
//!
//! Configuration is read from `{config_dir}/opsdesk/config.toml` when
//! present, then overridden by environment variables:
//!
//! - `OPSDESK_DATA_SOURCE` - `fixture` or `live`
//! - `OPSDESK_BASE_URL` - live-service base URL
//! - `OPSDESK_API_TOKEN` - live-service bearer token

use std::fs;
use std::path::{Path, PathBuf};

use opsdesk_core::config::{DataSourceKind, LiveConfig, OpsdeskConfig};
use opsdesk_core::error::{OpsdeskError, Result};

const CONFIG_DIR_NAME: &str = "opsdesk";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the default config file location for this user.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads configuration from `path` (or the default location) and applies
/// environment overrides.
///
/// A missing file yields the default configuration; a malformed file is an
/// error.
pub fn load_config(path: Option<&Path>) -> Result<OpsdeskConfig> {
    let resolved = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    let mut config = match resolved {
        Some(ref p) if p.exists() => {
            let content = fs::read_to_string(p)?;
            tracing::debug!(path = %p.display(), "loaded configuration file");
            toml::from_str(&content)?
        }
        _ => OpsdeskConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Applies environment overrides using `lookup` as the variable source.
fn apply_env_overrides(
    config: &mut OpsdeskConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(kind) = lookup("OPSDESK_DATA_SOURCE") {
        config.data_source = match kind.as_str() {
            "fixture" => DataSourceKind::Fixture,
            "live" => DataSourceKind::Live,
            other => {
                return Err(OpsdeskError::config(format!(
                    "OPSDESK_DATA_SOURCE must be \"fixture\" or \"live\", got \"{other}\""
                )));
            }
        };
    }

    if let Some(base_url) = lookup("OPSDESK_BASE_URL") {
        match &mut config.live {
            Some(live) => live.base_url = base_url,
            None => {
                config.live = Some(LiveConfig {
                    base_url,
                    api_token: None,
                })
            }
        }
    }

    if let Some(token) = lookup("OPSDESK_API_TOKEN") {
        if let Some(live) = &mut config.live {
            live.api_token = Some(token);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, OpsdeskConfig::default());
    }

    #[test]
    fn test_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "data_source = \"live\"").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "[live]").unwrap();
        writeln!(file, "base_url = \"https://api.example.com/inbox\"").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.data_source, DataSourceKind::Live);
        assert_eq!(
            config.live.unwrap().base_url,
            "https://api.example.com/inbox"
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "data_source = ").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_env_overrides_select_live() {
        let mut config = OpsdeskConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("OPSDESK_DATA_SOURCE", "live"),
                ("OPSDESK_BASE_URL", "https://api.example.com/inbox"),
                ("OPSDESK_API_TOKEN", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!(config.data_source, DataSourceKind::Live);
        let live = config.live.unwrap();
        assert_eq!(live.base_url, "https://api.example.com/inbox");
        assert_eq!(live.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_data_source_is_a_config_error() {
        let mut config = OpsdeskConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("OPSDESK_DATA_SOURCE", "cloud")]))
            .unwrap_err();
        assert!(err.is_config());
    }
}
