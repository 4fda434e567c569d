use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Send the rendered draw text as its own message before the card image.
    #[serde(default = "Config::default_chain_reply")]
    pub chain_reply: bool,

    /// Prefixes that trigger a full-spread divination.
    #[serde(default = "Config::default_divine_prefixes")]
    pub divine_prefixes: Vec<String>,

    /// Prefixes that trigger a single-card draw.
    #[serde(default = "Config::default_tarot_prefixes")]
    pub tarot_prefixes: Vec<String>,

    /// Prefixes that trigger interpretation of the last draw.
    #[serde(default = "Config::default_interpret_prefixes")]
    pub interpret_prefixes: Vec<String>,

    #[serde(default = "Config::default_enable_daily_limit")]
    pub enable_daily_limit: bool,

    #[serde(default = "Config::default_daily_limit")]
    pub daily_divine_limit: u32,

    #[serde(default = "Config::default_daily_limit")]
    pub daily_tarot_limit: u32,

    #[serde(default)]
    pub catalog: CatalogConfig,

    pub providers: ProvidersConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl Config {
    const fn default_chain_reply() -> bool {
        true
    }

    fn default_divine_prefixes() -> Vec<String> {
        vec!["%占卜".to_string(), "？占卜".to_string()]
    }

    fn default_tarot_prefixes() -> Vec<String> {
        vec!["%塔罗牌".to_string(), "？塔罗牌".to_string()]
    }

    fn default_interpret_prefixes() -> Vec<String> {
        vec!["%解读".to_string()]
    }

    const fn default_enable_daily_limit() -> bool {
        true
    }

    const fn default_daily_limit() -> u32 {
        1
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    /// Remote dataset document with the `cards` and `formations` collections.
    #[serde(default = "CatalogConfig::default_source_url")]
    pub source_url: String,

    /// Local cache file; defaults to `~/tarobot/tarot.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,

    /// Cache older than this many days is refetched.
    #[serde(default = "CatalogConfig::default_refresh_days")]
    pub refresh_days: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: Self::default_source_url(),
            cache_file: None,
            refresh_days: Self::default_refresh_days(),
        }
    }
}

impl CatalogConfig {
    fn default_source_url() -> String {
        "https://raw.githubusercontent.com/lemodragon/tarot2cow/main/tarot.json".to_string()
    }

    const fn default_refresh_days() -> u64 {
        7
    }

    /// Resolve the cache file path, falling back to `~/tarobot/tarot.json`.
    pub fn cache_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.cache_file {
            return Ok(path.clone());
        }
        Ok(Config::config_dir()?.join("tarot.json"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub zhipu: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub allow_from: Vec<String>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'tarobot init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        tracing::info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("tarobot"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "chain_reply": true,
  "divine_prefixes": ["%占卜", "？占卜"],
  "tarot_prefixes": ["%塔罗牌", "？塔罗牌"],
  "interpret_prefixes": ["%解读"],
  "enable_daily_limit": true,
  "daily_divine_limit": 1,
  "daily_tarot_limit": 1,
  "catalog": {
    "source_url": "https://raw.githubusercontent.com/lemodragon/tarot2cow/main/tarot.json",
    "refresh_days": 7
  },
  "providers": {
    "zhipu": {
      "api_key": "your-zhipu-api-key-here"
    }
  },
  "telegram": {
    "enabled": false,
    "token": "",
    "allow_from": []
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your Zhipu API key");
        println!("   2. Set \"telegram.enabled\": true and add your bot token");
        println!("   3. Run 'tarobot telegram' to start the bot");
        println!();
        println!("🔧 Configuration options:");
        println!("   - divine_prefixes / tarot_prefixes / interpret_prefixes: command triggers");
        println!("   - daily_divine_limit / daily_tarot_limit: per-user draws per day");
        println!("   - catalog.refresh_days: days before the card dataset is refetched");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let json = r#"{"providers": {"zhipu": {"api_key": "k"}}}"#;
        let config: Config = serde_json::from_str(json).expect("minimal config should parse");

        assert!(config.chain_reply);
        assert_eq!(config.divine_prefixes, vec!["%占卜", "？占卜"]);
        assert_eq!(config.tarot_prefixes, vec!["%塔罗牌", "？塔罗牌"]);
        assert_eq!(config.interpret_prefixes, vec!["%解读"]);
        assert!(config.enable_daily_limit);
        assert_eq!(config.daily_divine_limit, 1);
        assert_eq!(config.daily_tarot_limit, 1);
        assert_eq!(config.catalog.refresh_days, 7);
        assert!(!config.telegram.enabled);
    }

    #[test]
    fn missing_provider_block_is_rejected() {
        let json = r#"{"chain_reply": false}"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn explicit_cache_file_wins() {
        let catalog = CatalogConfig {
            cache_file: Some(PathBuf::from("/tmp/cards.json")),
            ..CatalogConfig::default()
        };
        let path = catalog.cache_path().expect("explicit path never fails");
        assert_eq!(path, PathBuf::from("/tmp/cards.json"));
    }
}
