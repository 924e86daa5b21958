use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("could not parse configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// No empty square is left to place food on. The controller treats
    /// this as the board-full terminal state rather than an infinite
    /// rejection-sampling loop.
    #[error("no empty square left to place food on")]
    WorldFull,

    /// The tail moved into a square the head never painted. This is a
    /// broken invariant, not a game event; it surfaces loudly instead of
    /// silently corrupting the grid.
    #[error("tail moved into a non-snake square at ({x}, {y})")]
    TailOffTrack { x: i32, y: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
