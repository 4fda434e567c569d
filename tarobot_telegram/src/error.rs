use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Draw error: {0}")]
    Draw(#[from] tarobot_catalog::Error),

    #[error("Interpreter error: {0}")]
    Interpreter(anyhow::Error),

    #[error("Invalid image URL: {0}")]
    ImageUrl(#[from] url::ParseError),

    #[error("Unauthorized access from chat_id: {0}")]
    Unauthorized(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
