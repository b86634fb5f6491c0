use thiserror::Error;

use crate::game::Phase;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures while turning a raw move payload into an [`Intent`](crate::Intent).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed payload: key '{key}' has no value")]
    MalformedPayload { key: String },

    #[error("Wrong opponent format: {0}")]
    MalformedOpponent(String),

    #[error("Wrong commit format: {0}")]
    MalformedCommit(String),

    #[error("Invalid parity: {0}")]
    InvalidParity(String),

    #[error("Wrong action format: {0}")]
    MalformedAction(String),

    #[error("Malformed hex payload: {0}")]
    MalformedHex(String),
}

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Parse,
    Validation,
    InvalidAction,
    CorruptState,
    Internal,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Cannot create game: a player cannot play against themselves")]
    SelfPlay,

    #[error("Missing field: no {0} defined")]
    MissingField(&'static str),

    #[error("Cannot cancel game: {0}")]
    CancelNotAllowed(String),

    #[error("Cannot claim timeout: {0}")]
    TimeoutNotEligible(String),

    #[error("Game id {game_id} is already taken by another pair of players")]
    GameIdCollision { game_id: String },

    #[error("Invalid action of player {sender} for game {game_id} in {phase} phase")]
    InvalidAction {
        sender: String,
        game_id: String,
        phase: Phase,
    },

    #[error("Corrupt state: game {game_id} stored in {phase} phase")]
    CorruptState { game_id: String, phase: Phase },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub fn cancel_not_allowed(msg: impl Into<String>) -> Self {
        Self::CancelNotAllowed(msg.into())
    }

    pub fn timeout_not_eligible(msg: impl Into<String>) -> Self {
        Self::TimeoutNotEligible(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Parse(_) => ErrorClass::Parse,
            Self::SelfPlay
            | Self::MissingField(_)
            | Self::CancelNotAllowed(_)
            | Self::TimeoutNotEligible(_)
            | Self::GameIdCollision { .. } => ErrorClass::Validation,
            Self::InvalidAction { .. } => ErrorClass::InvalidAction,
            Self::CorruptState { .. } => ErrorClass::CorruptState,
            Self::Config(_) | Self::Serialization(_) => ErrorClass::Internal,
        }
    }

    /// Everything except a corrupt record can be reported back to the sender.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CorruptState { .. })
    }
}
