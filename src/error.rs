use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown difficulty {0:?} (expected easy, normal or hard)")]
    InvalidDifficulty(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
