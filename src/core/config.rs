use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    MetalPriceApi,
    GoldApi,
    FcsApi,
}

impl ProviderKind {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::MetalPriceApi => "https://api.metalpriceapi.com",
            ProviderKind::GoldApi => "https://www.goldapi.io",
            ProviderKind::FcsApi => "https://fcsapi.com",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub kind: ProviderKind,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Environment variable holding the API key, used when `api_key` is unset.
    pub api_key_env: Option<String>,
    pub priority: u32,
}

impl ProviderConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.kind.default_endpoint())
            .trim_end_matches('/')
    }

    pub fn credential(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| {
                self.api_key_env
                    .as_ref()
                    .and_then(|var| std::env::var(var).ok())
            })
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_secs: default_ttl_secs(),
            persist: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// INR per USD, used to normalize USD quotes.
    #[serde(default = "default_usd_inr_rate")]
    pub usd_inr_rate: f64,
    /// INR per gram returned when no provider or cached price is available.
    #[serde(default = "default_mock_price")]
    pub mock_price: f64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub data_path: Option<String>,
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_usd_inr_rate() -> f64 {
    83.0
}

fn default_mock_price() -> f64 {
    10500.0
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: Vec::new(),
            cache: CacheConfig::default(),
            currency_symbol: default_currency_symbol(),
            usd_inr_rate: default_usd_inr_rate(),
            mock_price: default_mock_price(),
            request_timeout_secs: default_request_timeout_secs(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Loads the default config file, or built-in defaults when it does not exist.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "goldsip", "gold-sip")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "goldsip", "gold-sip")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  - name: "GoldAPI"
    kind: goldapi
    api_key: "abc"
    priority: 2
  - name: "MetalPriceAPI"
    kind: metalpriceapi
    endpoint: "http://localhost:9000/"
    api_key_env: "GOLD_SIP_TEST_UNSET_VARIABLE"
    priority: 1
cache:
  ttl_secs: 60
currency_symbol: "Rs "
usd_inr_rate: 84.5
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.providers.len(), 2);

        let gold_api = &config.providers[0];
        assert_eq!(gold_api.kind, ProviderKind::GoldApi);
        assert_eq!(gold_api.endpoint(), "https://www.goldapi.io");
        assert_eq!(gold_api.credential().as_deref(), Some("abc"));
        assert_eq!(gold_api.priority, 2);

        let metal = &config.providers[1];
        assert_eq!(metal.kind, ProviderKind::MetalPriceApi);
        assert_eq!(metal.endpoint(), "http://localhost:9000");
        assert!(metal.credential().is_none());

        assert_eq!(config.cache.ttl_secs, 60);
        assert!(config.cache.persist);
        assert_eq!(config.currency_symbol, "Rs ");
        assert_eq!(config.usd_inr_rate, 84.5);
        assert_eq!(config.mock_price, 10500.0);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.providers.is_empty());
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.usd_inr_rate, 83.0);
    }

    #[test]
    fn test_blank_api_key_is_no_credential() {
        let provider = ProviderConfig {
            name: "FCS API".to_string(),
            kind: ProviderKind::FcsApi,
            endpoint: None,
            api_key: Some("  ".to_string()),
            api_key_env: None,
            priority: 3,
        };
        assert!(provider.credential().is_none());
        assert_eq!(provider.endpoint(), "https://fcsapi.com");
    }

    #[test]
    fn test_load_from_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "mock_price: 9999.5\n").unwrap();
        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.mock_price, 9999.5);

        let missing = AppConfig::load_from_path("/definitely/not/here.yaml");
        assert!(
            missing
                .unwrap_err()
                .to_string()
                .starts_with("Failed to read config file")
        );
    }
}
