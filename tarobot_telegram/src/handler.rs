use crate::{Command, Error, Result, TarotBot, command};
use tarobot_core::Reply;
use teloxide::{
    requests::Requester,
    types::{ChatId, InputFile, Message},
};
use tracing::{error, info};
use url::Url;

/// Handle bot commands
pub async fn handle_command(bot: TarotBot, msg: Message, cmd: Command) -> Result<()> {
    let username = msg
        .from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    match cmd {
        Command::Start => {
            info!("[@{username}] Command: /start");
            bot.bot
                .send_message(msg.chat.id, command::welcome_text())
                .await?;
        }
        Command::Help => {
            info!("[@{username}] Command: /help");
            bot.bot
                .send_message(msg.chat.id, command::help_text(&bot.config))
                .await?;
        }
    }

    Ok(())
}

/// Handle any message (commands or prefixed draw requests)
pub async fn handle_message(bot: TarotBot, msg: Message) -> Result<()> {
    let chat_id = msg.chat.id.0;
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let username = msg
        .from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    if let Some(cmd) = Command::parse_from_text(text) {
        return handle_command(bot, msg, cmd).await;
    }

    if !bot.recognizes(text) {
        return Ok(());
    }

    if !bot.is_allowed(chat_id) {
        return Err(Error::Unauthorized(chat_id));
    }

    info!("[@{username}] Message: {text}");

    // Show typing indicator
    bot.bot
        .send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
        .await?;

    // Any failure past this point becomes a reply, not a crash
    match bot.dispatch(&chat_id.to_string(), text).await {
        Ok(Some(replies)) => {
            info!("[@{username}] Replying with {} message(s)", replies.len());
            send_replies(&bot, msg.chat.id, replies).await?;
        }
        Ok(None) => {}
        Err(e) => {
            error!("Error while handling message: {e}");
            bot.bot
                .send_message(msg.chat.id, format!("发生错误: {e}"))
                .await?;
        }
    }

    Ok(())
}

async fn send_replies(bot: &TarotBot, chat_id: ChatId, replies: Vec<Reply>) -> Result<()> {
    for reply in replies {
        match reply {
            Reply::Text(text) => {
                bot.bot.send_message(chat_id, text).await?;
            }
            Reply::ImageUrl(url) => {
                let url = Url::parse(&url)?;
                bot.bot.send_photo(chat_id, InputFile::url(url)).await?;
            }
        }
    }

    Ok(())
}
