//! Move payload parsing.
//!
//! A payload is a whitespace separated list of `key value` pairs, e.g.
//! `opponent 0x3c44...93bc parity odd commit 9f86...0a08`. Keys are
//! case-insensitive and have short aliases. `cancel` and `timeout` are flags:
//! their value is ignored and may be omitted when they come last.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::player::{Parity, PlayerId};

const OPPONENT_LEN: usize = 42;
const COMMIT_LEN: usize = 64;

/// Structured form of a move payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub opponent: Option<PlayerId>,
    pub parity: Option<Parity>,
    pub commit: Option<String>,
    pub action: Option<i64>,
    pub nonce: Option<String>,
    pub cancel: bool,
    pub timeout: bool,
    /// Unrecognised keys, kept for diagnostics.
    #[serde(skip)]
    pub ignored: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Opponent,
    Parity,
    Commit,
    Action,
    Nonce,
    Cancel,
    Timeout,
}

impl Key {
    fn lookup(token: &str) -> Option<Self> {
        match token {
            "opponent" | "o" => Some(Key::Opponent),
            "parity" | "p" => Some(Key::Parity),
            "commit" | "commitment" | "c" => Some(Key::Commit),
            "action" | "a" => Some(Key::Action),
            "nonce" | "n" => Some(Key::Nonce),
            "cancel" | "x" | "abort" => Some(Key::Cancel),
            "timeout" | "t" => Some(Key::Timeout),
            _ => None,
        }
    }
}

pub fn parse_payload(payload: &str) -> Result<Intent, ParseError> {
    let tokens: Vec<&str> = payload.split_whitespace().collect();
    let mut intent = Intent::default();

    for pair in tokens.chunks(2) {
        let raw_key = pair[0].to_lowercase();
        let value = pair.get(1).copied();

        let Some(key) = Key::lookup(&raw_key) else {
            tracing::warn!("Invalid option {}", raw_key);
            intent.ignored.push(raw_key);
            continue;
        };

        let required = || {
            value.ok_or_else(|| ParseError::MalformedPayload {
                key: raw_key.clone(),
            })
        };

        match key {
            Key::Opponent => intent.opponent = Some(parse_opponent(required()?)?),
            Key::Parity => intent.parity = Some(parse_parity(required()?)?),
            Key::Commit => intent.commit = Some(parse_commit(required()?)?),
            Key::Action => {
                let value = required()?;
                let action = value
                    .parse::<i64>()
                    .map_err(|_| ParseError::MalformedAction(value.to_string()))?;
                intent.action = Some(action);
            }
            Key::Nonce => intent.nonce = Some(required()?.to_string()),
            Key::Cancel => intent.cancel = true,
            Key::Timeout => intent.timeout = true,
        }
    }

    Ok(intent)
}

/// Map an odd/even option to a parity.
pub fn parse_parity(value: &str) -> Result<Parity, ParseError> {
    match value.to_lowercase().as_str() {
        "o" | "odd" | "odds" => Ok(Parity::Odd),
        "e" | "even" | "evens" => Ok(Parity::Even),
        _ => Err(ParseError::InvalidParity(value.to_string())),
    }
}

fn parse_opponent(value: &str) -> Result<PlayerId, ParseError> {
    let well_formed = value.len() == OPPONENT_LEN
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit());
    if !well_formed {
        return Err(ParseError::MalformedOpponent(value.to_string()));
    }
    Ok(PlayerId::new(value))
}

fn parse_commit(value: &str) -> Result<String, ParseError> {
    if value.len() != COMMIT_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError::MalformedCommit(value.to_string()));
    }
    Ok(value.to_lowercase())
}
