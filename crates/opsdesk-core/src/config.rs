use serde::{Deserialize, Serialize};

/// Which inbox data source the application composes at startup.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    /// In-memory fixture with seeded conversations.
    Fixture,
    /// Remote inbox service over HTTP.
    Live,
}

impl Default for DataSourceKind {
    fn default() -> Self {
        DataSourceKind::Fixture
    }
}

/// Connection settings for the live inbox service.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LiveConfig {
    /// Base URL of the inbox service, e.g. `https://api.example.com/inbox`
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Root application configuration.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct OpsdeskConfig {
    /// Data source selection
    #[serde(default)]
    pub data_source: DataSourceKind,
    /// Live-service settings, required when `data_source = "live"`
    #[serde(default)]
    pub live: Option<LiveConfig>,
}

impl OpsdeskConfig {
    /// Returns the live settings.
    ///
    /// # Errors
    ///
    /// Returns a config error when `data_source = "live"` but no `[live]`
    /// section is present.
    pub fn live(&self) -> crate::error::Result<&LiveConfig> {
        self.live.as_ref().ok_or_else(|| {
            crate::error::OpsdeskError::config("data_source is \"live\" but [live] is missing")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_fixture() {
        let config = OpsdeskConfig::default();
        assert_eq!(config.data_source, DataSourceKind::Fixture);
        assert!(config.live.is_none());
    }

    #[test]
    fn test_parse_live_config_from_toml() {
        let config: OpsdeskConfig = toml::from_str(
            r#"
            data_source = "live"

            [live]
            base_url = "https://api.example.com/inbox"
            api_token = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_source, DataSourceKind::Live);
        let live = config.live().unwrap();
        assert_eq!(live.base_url, "https://api.example.com/inbox");
        assert_eq!(live.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_live_without_section_is_a_config_error() {
        let config: OpsdeskConfig = toml::from_str("data_source = \"live\"").unwrap();
        assert!(config.live().unwrap_err().is_config());
    }
}
