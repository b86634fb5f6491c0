use serde::{Deserialize, Serialize};

const MISSING_NONCE: &str = "None";

/// Trait for commitment schemes
pub trait CommitmentScheme {
    type Secret;
    type Commitment;

    fn commit(secret: &Self::Secret) -> Self::Commitment;
    fn verify(commitment: &Self::Commitment, secret: &Self::Secret) -> bool;
}

/// The secret a player discloses in the reveal phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub action: i64,
    pub nonce: Option<String>,
}

impl Reveal {
    pub fn new(action: i64, nonce: impl Into<String>) -> Self {
        Self {
            action,
            nonce: Some(nonce.into()),
        }
    }

    /// `"<action>-<nonce>"`; a reveal sent without a nonce hashes as `"<action>-None"`.
    pub fn preimage(&self) -> String {
        format!(
            "{}-{}",
            self.action,
            self.nonce.as_deref().unwrap_or(MISSING_NONCE)
        )
    }
}
