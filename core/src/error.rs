use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Swap positions are not orthogonally adjacent")]
    NotAdjacent,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board has empty cells")]
    EmptyCells,
    #[error("A swap or cascade is still in progress")]
    Busy,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
