use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("catalog has no formations")]
    NoFormations,

    #[error("catalog has no cards")]
    NoCards,

    #[error("formation {0} has no representation sets")]
    NoRepresentations(String),

    #[error("not enough cards: requested {requested}, catalog has {available}")]
    InsufficientCards { requested: usize, available: usize },

    #[error("failed to read cached dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to fetch dataset: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}
