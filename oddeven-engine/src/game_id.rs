//! Game identifiers derived from the unordered pair of players.
//!
//! Only one game per pair can be open at a time, so either player can address
//! it by naming the other one as opponent.

use sha2::{Digest, Sha224};

use crate::config::DEFAULT_GAME_ID_LEN;

/// Derive the id of the game between `player_a` and `player_b`, keeping `len` hex characters.
pub fn derive_game_id(player_a: &str, player_b: &str, len: usize) -> String {
    let mut players = [player_a.to_lowercase(), player_b.to_lowercase()];
    players.sort();

    let mut hasher = Sha224::new();
    hasher.update(format!("{}-{}", players[0], players[1]).as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(len);
    id
}

/// [`derive_game_id`] with the default id length.
pub fn game_id(player_a: &str, player_b: &str) -> String {
    derive_game_id(player_a, player_b, DEFAULT_GAME_ID_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALICE: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
    const BOB: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";

    #[test]
    fn test_symmetric_and_case_insensitive() {
        let id = game_id(ALICE, BOB);
        assert_eq!(id.len(), 10);
        assert_eq!(id, game_id(BOB, ALICE));
        assert_eq!(id, game_id(&ALICE.to_uppercase(), BOB));
    }

    #[test]
    fn test_distinct_pairs_differ() {
        let carol = "0x90f79bf6eb2c4f870365e785982e1f101e93b906";
        assert_ne!(game_id(ALICE, BOB), game_id(ALICE, carol));
    }

    #[test]
    fn test_length_is_prefix_of_full_digest() {
        let long = derive_game_id(ALICE, BOB, 56);
        assert_eq!(long.len(), 56);
        assert!(long.starts_with(&game_id(ALICE, BOB)));
    }

    proptest! {
        #[test]
        fn prop_id_is_symmetric(a in "0x[0-9a-fA-F]{40}", b in "0x[0-9a-fA-F]{40}") {
            prop_assert_eq!(game_id(&a, &b), game_id(&b, &a));
        }
    }
}
