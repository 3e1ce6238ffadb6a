use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SweepError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board needs at least one mine")]
    NoMines,
    #[error("Unknown cell symbol {symbol:?}")]
    UnknownSymbol { symbol: char },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Game surface is not available")]
    EnvironmentUnavailable,
}

pub type Result<T> = core::result::Result<T, SweepError>;
