use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must be at least 1x1")]
    InvalidDimensions,
    #[error("Too many mines")]
    TooManyMines,
    #[error("A game needs at least one mine")]
    NoMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(&'static str),
    #[error("Snapshot does not match the current settings")]
    SettingsMismatch,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure while decoding or restoring a persisted game.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}
