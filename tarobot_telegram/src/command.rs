use std::fmt::Write as _;
use tarobot_config::Config;
use teloxide::types::BotCommand;

#[derive(Clone, Debug)]
pub enum Command {
    Start,
    Help,
}

impl Command {
    fn all() -> Vec<BotCommand> {
        vec![
            BotCommand {
                command: "start".to_string(),
                description: "开始使用机器人".to_string(),
            },
            BotCommand {
                command: "help".to_string(),
                description: "显示使用指南".to_string(),
            },
        ]
    }

    #[must_use]
    pub fn bot_commands() -> Vec<BotCommand> {
        Self::all()
    }

    #[must_use]
    pub fn parse_from_text(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();

        // Remove bot mention if present (e.g., "/start@my_bot")
        let text = text.split('@').next().unwrap_or(&text).to_string();

        match text.as_str() {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

#[must_use]
pub const fn welcome_text() -> &'static str {
    r"
👋 欢迎使用塔罗占卜机器人！

我可以为你:
• 进行完整的塔罗牌占卜
• 抽取单张塔罗牌
• 解读最近一次抽牌结果

发送 /help 查看使用指南。
"
}

/// Usage guide built from the configured prefixes and limits.
#[must_use]
pub fn help_text(config: &Config) -> String {
    let mut text = String::from("🔮 塔罗牌占卜使用指南：\n\n");

    if let Some(prefix) = config.divine_prefixes.first() {
        let _ = writeln!(text, "1. 输入 '{prefix}' 进行完整的塔罗牌占卜");
    }
    if let Some(prefix) = config.tarot_prefixes.first() {
        let _ = writeln!(text, "2. 输入 '{prefix}' 抽取单张塔罗牌");
    }
    if let Some(prefix) = config.interpret_prefixes.first() {
        let _ = writeln!(text, "3. 输入 '{prefix}' 获取最近一次抽牌的详细解读");
    }

    if config.enable_daily_limit {
        let _ = write!(
            text,
            "\n注意：每位用户每天可以进行 {} 次占卜和 {} 次单张塔罗牌抽取。次日凌晨00:00后重置次数。",
            config.daily_divine_limit, config.daily_tarot_limit
        );
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        serde_json::from_str(r#"{"providers": {"zhipu": {"api_key": "k"}}}"#)
            .expect("minimal config should parse")
    }

    #[test]
    fn parses_commands_with_mention() {
        assert!(matches!(
            Command::parse_from_text("/start@tarot_bot"),
            Some(Command::Start)
        ));
        assert!(matches!(Command::parse_from_text("/help"), Some(Command::Help)));
        assert!(Command::parse_from_text("%占卜").is_none());
    }

    #[test]
    fn help_lists_prefixes_and_limits() {
        let text = help_text(&test_config());
        assert!(text.contains("%占卜"));
        assert!(text.contains("%塔罗牌"));
        assert!(text.contains("%解读"));
        assert!(text.contains("1 次占卜和 1 次单张塔罗牌抽取"));
    }

    #[test]
    fn help_omits_limits_when_disabled() {
        let mut config = test_config();
        config.enable_daily_limit = false;
        let text = help_text(&config);
        assert!(!text.contains("注意："));
    }
}
