use serde::{Deserialize, Serialize};
use std::fmt;

/// Player identity, normalised to lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened `0xabcd...wxyz` form used in status messages.
    pub fn display_id(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let head: String = chars.iter().take(6).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Side a player bets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn from_bit(bit: u8) -> Self {
        if bit % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn bit(self) -> u8 {
        match self {
            Parity::Even => 0,
            Parity::Odd => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => f.write_str("even"),
            Parity::Odd => f.write_str("odd"),
        }
    }
}

/// Which of the two slots of a game a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    /// The player who created the game.
    Creator,
    /// The player named as opponent on creation.
    Challenger,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::Creator => 0,
            Seat::Challenger => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Seat::Creator => Seat::Challenger,
            Seat::Challenger => Seat::Creator,
        }
    }
}

/// Per-player state inside a game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub commit: Option<String>,
    pub parity: Parity,
    pub commit_ts: Option<u64>,
    pub action: Option<i64>,
    pub nonce: Option<String>,
    pub reveal_ts: Option<u64>,
}

impl PlayerSlot {
    pub fn new(parity: Parity) -> Self {
        Self {
            commit: None,
            parity,
            commit_ts: None,
            action: None,
            nonce: None,
            reveal_ts: None,
        }
    }

    pub fn has_committed(&self) -> bool {
        self.commit_ts.is_some()
    }

    pub fn has_revealed(&self) -> bool {
        self.reveal_ts.is_some()
    }

    pub(crate) fn record_commit(&mut self, commit: String, ts: u64) {
        self.commit = Some(commit);
        self.commit_ts = Some(ts);
    }

    pub(crate) fn record_reveal(&mut self, action: i64, nonce: Option<String>, ts: u64) {
        self.action = Some(action);
        if nonce.is_some() {
            self.nonce = nonce;
        }
        self.reveal_ts = Some(ts);
    }
}
