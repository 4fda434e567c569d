use crate::{Command, Error, Result};
use std::{sync::Arc, time::Duration};
use tarobot_catalog::Catalog;
use tarobot_config::Config;
use tarobot_core::{DrawType, Interpreter, Reply, build_interpret_prompt};
use tarobot_divination::{Draw, draw_single, draw_spread};
use tarobot_quota::{QuotaDecision, QuotaTracker};
use tarobot_session::LastDrawCache;
use teloxide::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

/// Telegram bot wired to the draw engine, quota tracker and session memory.
pub struct TarotBot {
    /// Teloxide bot instance
    pub bot: Bot,
    /// Configuration
    pub config: Config,
    /// Card catalog, read-only after startup
    catalog: Arc<Catalog>,
    /// Daily quota tracker
    quota: Arc<QuotaTracker>,
    /// Last draw per user, for follow-up interpretation
    last_draws: Arc<LastDrawCache>,
    /// Interpretation collaborator
    interpreter: Arc<dyn Interpreter>,
    /// Allowed chat IDs
    allowed_chats: Vec<i64>,
}

impl TarotBot {
    /// Create a new tarot bot.
    pub fn new(
        token: String,
        config: Config,
        catalog: Arc<Catalog>,
        quota: Arc<QuotaTracker>,
        last_draws: Arc<LastDrawCache>,
        interpreter: Arc<dyn Interpreter>,
        allowed_chats: &[String],
    ) -> Result<Self> {
        let allowed_chats = allowed_chats
            .iter()
            .filter_map(|s| s.parse::<i64>().ok())
            .collect();

        let bot = Bot::new(token);

        info!("Divine prefixes: {:?}", config.divine_prefixes);
        info!("Tarot prefixes: {:?}", config.tarot_prefixes);
        info!("Interpret prefixes: {:?}", config.interpret_prefixes);
        info!(
            "Daily limits {}: divine={}, tarot={}",
            if config.enable_daily_limit {
                "enabled"
            } else {
                "disabled"
            },
            config.daily_divine_limit,
            config.daily_tarot_limit
        );

        Ok(Self {
            bot,
            config,
            catalog,
            quota,
            last_draws,
            interpreter,
            allowed_chats,
        })
    }

    /// Check if a chat is allowed
    #[must_use]
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }

    /// Whether the text starts with any configured command prefix.
    #[must_use]
    pub fn recognizes(&self, text: &str) -> bool {
        let text = text.trim();
        starts_with_any(text, &self.config.divine_prefixes)
            || starts_with_any(text, &self.config.tarot_prefixes)
            || starts_with_any(text, &self.config.interpret_prefixes)
    }

    /// Route a trimmed text command to its operation. `None` means the text
    /// is not addressed to the bot.
    pub async fn dispatch(&self, user_id: &str, text: &str) -> Result<Option<Vec<Reply>>> {
        let text = text.trim();

        if starts_with_any(text, &self.config.divine_prefixes) {
            info!("Divination command triggered");
            return Ok(Some(self.divine(user_id).await?));
        }
        if starts_with_any(text, &self.config.tarot_prefixes) {
            info!("Single-card command triggered");
            return Ok(Some(self.draw_single_card(user_id).await?));
        }
        if starts_with_any(text, &self.config.interpret_prefixes) {
            info!("Interpret command triggered");
            return Ok(Some(self.interpret(user_id).await?));
        }

        Ok(None)
    }

    /// Full-spread divination behind the quota gate.
    async fn divine(&self, user_id: &str) -> Result<Vec<Reply>> {
        if let QuotaDecision::Exhausted { message } =
            self.quota.check(user_id, DrawType::Divine).await
        {
            return Ok(vec![Reply::Text(message)]);
        }

        let draw = {
            let mut rng = rand::rng();
            draw_spread(&self.catalog, &mut rng)?
        };

        self.remember_and_reply(user_id, &draw).await
    }

    /// Single-card draw behind the quota gate.
    async fn draw_single_card(&self, user_id: &str) -> Result<Vec<Reply>> {
        if let QuotaDecision::Exhausted { message } =
            self.quota.check(user_id, DrawType::Tarot).await
        {
            return Ok(vec![Reply::Text(message)]);
        }

        let draw = {
            let mut rng = rand::rng();
            draw_single(&self.catalog, &mut rng)?
        };

        self.remember_and_reply(user_id, &draw).await
    }

    async fn remember_and_reply(&self, user_id: &str, draw: &Draw) -> Result<Vec<Reply>> {
        let text = draw.render();
        self.last_draws.remember(user_id, &text).await;
        Ok(self.draw_replies(text, draw.image_urls()))
    }

    /// Reply policy: with `chain_reply` the rendered text goes first and the
    /// card image follows; otherwise the image alone, falling back to text.
    fn draw_replies(&self, text: String, image_urls: Vec<String>) -> Vec<Reply> {
        let image = image_urls.into_iter().next();

        if self.config.chain_reply {
            let mut replies = vec![Reply::Text(text)];
            if let Some(url) = image {
                replies.push(Reply::ImageUrl(url));
            }
            replies
        } else if let Some(url) = image {
            vec![Reply::ImageUrl(url)]
        } else {
            vec![Reply::Text(text)]
        }
    }

    /// Forward the retained draw to the interpretation collaborator.
    async fn interpret(&self, user_id: &str) -> Result<Vec<Reply>> {
        let Some(last_draw) = self.last_draws.recall(user_id).await else {
            return Ok(vec![Reply::Text(
                "抱歉，没有找到最近的抽牌结果。请先进行占卜或抽取单张塔罗牌。".to_string(),
            )]);
        };

        let prompt = build_interpret_prompt(&last_draw);
        let answer = self
            .interpreter
            .interpret(&prompt)
            .await
            .map_err(Error::Interpreter)?;

        Ok(vec![Reply::Text(answer)])
    }

    /// Test connection to Telegram API with backoff retry.
    /// Starts at 2s, increases by 2s each attempt, max 10s delay.
    /// Retries indefinitely until connection succeeds.
    async fn test_connection(&self) -> Result<()> {
        const INITIAL_DELAY_SECS: u64 = 2;
        const MAX_DELAY_SECS: u64 = 10;

        let mut attempt = 1u64;
        loop {
            match self.bot.get_me().await {
                Ok(bot_user) => {
                    info!(
                        "Connected to Telegram API: @{} (id: {})",
                        bot_user
                            .user
                            .username
                            .unwrap_or_else(|| "no username".to_string()),
                        bot_user.user.id
                    );
                    return Ok(());
                }
                Err(e) => {
                    let delay_secs = (INITIAL_DELAY_SECS * attempt).min(MAX_DELAY_SECS);

                    warn!("Connection attempt {attempt} failed: {e}. Retrying in {delay_secs}s...");

                    sleep(Duration::from_secs(delay_secs)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Run the bot
    pub async fn run(self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::Update;

        self.test_connection().await?;
        self.bot.set_my_commands(Command::bot_commands()).await?;

        let bot = self.bot.clone();

        let schema = dptree::entry().branch(Update::filter_message().endpoint({
            let bot_clone = self.clone();
            move |_bot: Bot, msg: teloxide::types::Message| {
                let bot_clone = bot_clone.clone();
                async move { crate::handler::handle_message(bot_clone, msg).await }
            }
        }));

        Dispatcher::builder(bot, schema)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

fn starts_with_any(text: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| text.starts_with(prefix.as_str()))
}

impl Clone for TarotBot {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
            config: self.config.clone(),
            catalog: Arc::clone(&self.catalog),
            quota: Arc::clone(&self.quota),
            last_draws: Arc::clone(&self.last_draws),
            interpreter: Arc::clone(&self.interpreter),
            allowed_chats: self.allowed_chats.clone(),
        }
    }
}
