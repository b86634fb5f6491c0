//! Odds-and-Evens Commit-Reveal Game Engine
//!
//! Two players bet on the parity of the sum of two hidden numbers. Each player
//! commits to `"<action>-<nonce>"` with a SHA-512/256 hash, then reveals it. A
//! wrong reveal or a missed reveal forfeits the game.
//!
//! The engine is deterministic: it never reads a clock, and replaying the same
//! ordered moves always produces the same games and messages.

pub mod codec;
pub mod commitment;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod game_id;
pub mod handlers;
pub mod payload;
pub mod player;
pub mod status;
pub mod store;

pub use commitment::{compute_commitment, CommitmentScheme, HashCommitment, Reveal};
pub use config::EngineConfig;
pub use engine::{OddsEvensEngine, Outcome, Winner};
pub use error::{EngineError, ErrorClass, ParseError, Result};
pub use game::{GameRecord, Interaction, Phase, Victory};
pub use game_id::{derive_game_id, game_id};
pub use handlers::{
    handle_advance, handle_inspect, AdvanceRequest, AdvanceResponse, FinishStatus, InspectRequest,
    InspectResponse, Metadata, Output, OutputKind, RollupDriver, RollupRequest,
};
pub use payload::{parse_payload, Intent};
pub use player::{Parity, PlayerId, PlayerSlot, Seat};
pub use store::GameStore;
