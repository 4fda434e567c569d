use crate::command::CommandStrategy;
use std::sync::Arc;
use tarobot_catalog::CatalogLoader;
use tarobot_config::Config;
use tarobot_core::Interpreter;
use tarobot_providers::ZhipuClient;
use tarobot_quota::{QuotaLimits, QuotaTracker};
use tarobot_session::LastDrawCache;
use tarobot_telegram::TarotBot;
use tracing::info;

/// Input for the Telegram bot command.
pub struct TelegramInput {
    /// Optional bot token (overrides config)
    pub token: Option<String>,
    /// Optional allowed chat IDs (overrides config)
    pub allow_from: Option<Vec<String>>,
}

/// Strategy for running the Telegram bot.
pub struct TelegramStrategy;

impl CommandStrategy for TelegramStrategy {
    type Input = TelegramInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        if !config.telegram.enabled {
            anyhow::bail!("Telegram is not enabled in config. Set \"telegram.enabled\": true");
        }

        // Get token from input or config
        let token = if let Some(t) = input.token {
            t
        } else if !config.telegram.token.is_empty() {
            config.telegram.token.clone()
        } else {
            anyhow::bail!("Telegram bot token not configured. Set \"telegram.token\" in config");
        };

        // Get allowed chats from input or config
        let allow_from = input
            .allow_from
            .unwrap_or_else(|| config.telegram.allow_from.clone());

        info!("Starting tarot bot...");

        // Load the card catalog, refetching the dataset if stale
        let loader = CatalogLoader::new(
            config.catalog.source_url.clone(),
            config.catalog.cache_path()?,
        )?
        .with_refresh_days(config.catalog.refresh_days);
        let catalog = Arc::new(loader.load().await?);

        let quota = Arc::new(QuotaTracker::new(QuotaLimits {
            enabled: config.enable_daily_limit,
            divine: config.daily_divine_limit,
            tarot: config.daily_tarot_limit,
        }));
        let last_draws = Arc::new(LastDrawCache::new());
        let interpreter: Arc<dyn Interpreter> =
            Arc::new(ZhipuClient::new(config.providers.zhipu.api_key.clone()));

        let bot = TarotBot::new(
            token,
            config,
            catalog,
            quota,
            last_draws,
            interpreter,
            &allow_from,
        )?;

        info!("Tarot bot is running. Press Ctrl+C to stop.");
        bot.run().await?;

        Ok(())
    }
}
