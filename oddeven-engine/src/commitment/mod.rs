pub mod scheme;

pub use scheme::{CommitmentScheme, Reveal};

use crate::player::{Parity, PlayerSlot, Seat};
use sha2::{Digest, Sha512_256};

/// SHA-512/256 commitment over the reveal preimage, hex encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct HashCommitment;

impl CommitmentScheme for HashCommitment {
    type Secret = Reveal;
    type Commitment = String;

    fn commit(secret: &Reveal) -> String {
        let mut hasher = Sha512_256::new();
        hasher.update(secret.preimage().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn verify(commitment: &String, secret: &Reveal) -> bool {
        Self::commit(secret) == commitment.to_lowercase()
    }
}

/// Commitment a player must publish before revealing `action` with `nonce`
pub fn compute_commitment(action: i64, nonce: &str) -> String {
    HashCommitment::commit(&Reveal::new(action, nonce))
}

/// Parity that wins for the given pair of revealed actions
pub fn winning_parity(action_a: i64, action_b: i64) -> Parity {
    let sum = i128::from(action_a) + i128::from(action_b);
    if sum.rem_euclid(2) == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

/// Winner of a game where both players revealed; `None` while a reveal is missing
pub fn determine_winner(slots: &[PlayerSlot; 2]) -> Option<Seat> {
    let creator = slots[Seat::Creator.index()].action?;
    let challenger = slots[Seat::Challenger.index()].action?;

    let parity = winning_parity(creator, challenger);
    if slots[Seat::Creator.index()].parity == parity {
        Some(Seat::Creator)
    } else {
        Some(Seat::Challenger)
    }
}
