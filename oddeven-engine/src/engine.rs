use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::game::{GameRecord, Phase, Transition, Victory};
use crate::game_id::derive_game_id;
use crate::payload::{parse_payload, Intent};
use crate::player::PlayerId;
use crate::status::game_status;
use crate::store::GameStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub player: PlayerId,
    pub victory: Victory,
}

/// Result of an accepted move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub game_id: String,
    pub phase: Phase,
    pub winner: Option<Winner>,
    pub message: String,
}

impl Outcome {
    fn new(game: &GameRecord, winner: Option<Winner>) -> Self {
        let status = game_status(game);
        let message = match &winner {
            Some(winner) => format!(
                "WINNER[{}]({}) | {}",
                winner.victory,
                winner.player.display_id(),
                status
            ),
            None => status,
        };

        Self {
            game_id: game.id().to_string(),
            phase: game.phase(),
            winner,
            message,
        }
    }
}

/// Odds-and-evens engine: owns the open games and applies moves to them one at a time.
#[derive(Debug, Default)]
pub struct OddsEvensEngine {
    config: EngineConfig,
    store: GameStore,
}

impl OddsEvensEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: GameStore::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn game_id(&self, player_a: &str, player_b: &str) -> String {
        derive_game_id(player_a, player_b, self.config.game_id_len)
    }

    /// Parse `payload` and apply it as a move from `sender` at `timestamp`.
    pub fn advance(&mut self, sender: &str, timestamp: u64, payload: &str) -> Result<Outcome> {
        let intent = match parse_payload(payload) {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!("Rejected payload from {}: {}", sender, e);
                return Err(e.into());
            }
        };
        self.advance_intent(sender, timestamp, &intent)
    }

    /// Apply an already parsed move. A rejected move leaves every game untouched.
    pub fn advance_intent(
        &mut self,
        sender: &str,
        timestamp: u64,
        intent: &Intent,
    ) -> Result<Outcome> {
        let sender = PlayerId::new(sender);
        tracing::debug!("Processing {:?} from {} at {}", intent, sender, timestamp);

        let result = self.process(&sender, timestamp, intent);
        match &result {
            Ok(outcome) => tracing::info!("Game {}: {}", outcome.game_id, outcome.message),
            Err(e) if e.is_recoverable() => tracing::warn!("Rejected move from {}: {}", sender, e),
            Err(e) => tracing::error!("Unrecoverable failure on move from {}: {}", sender, e),
        }
        result
    }

    fn process(&mut self, sender: &PlayerId, ts: u64, intent: &Intent) -> Result<Outcome> {
        let opponent = intent
            .opponent
            .as_ref()
            .ok_or(EngineError::MissingField("opponent"))?;
        if opponent == sender {
            return Err(EngineError::SelfPlay);
        }

        let game_id = derive_game_id(sender.as_str(), opponent.as_str(), self.config.game_id_len);

        if let Some(game) = self.store.get_mut(&game_id) {
            let seat = match game.seat_of(sender) {
                Some(seat) if game.is_between(sender, opponent) => seat,
                _ => return Err(EngineError::GameIdCollision { game_id }),
            };

            let outcome = match game.apply(seat, ts, intent, self.config.timeout_secs)? {
                Transition::NotApplicable => {
                    return Err(EngineError::InvalidAction {
                        sender: sender.display_id(),
                        game_id,
                        phase: game.phase(),
                    })
                }
                Transition::Advanced => Outcome::new(game, None),
                Transition::Won { seat, victory } => {
                    let winner = Winner {
                        player: game.player(seat).clone(),
                        victory,
                    };
                    Outcome::new(game, Some(winner))
                }
            };

            if outcome.phase.is_terminal() {
                self.store.remove(&game_id);
                tracing::info!("Game {} closed in {} phase", game_id, outcome.phase);
            }
            return Ok(outcome);
        }

        let mut game = GameRecord::create(game_id, sender, ts, intent)?;
        game.open()?;
        tracing::info!(
            "Game {} created by {} against {}",
            game.id(),
            sender,
            opponent
        );

        let outcome = Outcome::new(&game, None);
        self.store.insert(game);
        Ok(outcome)
    }

    /// Status line of every open game.
    pub fn open_games(&self) -> Vec<String> {
        self.store.iter().map(game_status).collect()
    }

    /// Status of a single game, or just its id when it is not open.
    pub fn game_status(&self, game_id: &str) -> String {
        match self.store.get(game_id) {
            Some(game) => game_status(game),
            None => format!("Game({})", game_id),
        }
    }

    /// JSON list of open game statuses.
    pub fn inspect(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.open_games())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::compute_commitment;
    use crate::error::ErrorClass;

    const ALICE: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    const BOB: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

    fn create_payload(opponent: &str, parity: &str, action: i64, nonce: &str) -> String {
        format!(
            "opponent {} parity {} commit {}",
            opponent,
            parity,
            compute_commitment(action, nonce)
        )
    }

    #[test]
    fn test_end_to_end_commit_via_reveal() {
        let mut engine = OddsEvensEngine::default();

        let created = engine
            .advance(ALICE, 1000, &create_payload(BOB, "even", 4, "x1"))
            .unwrap();
        assert_eq!(created.phase, Phase::Commit);
        assert_eq!(created.game_id, engine.game_id(ALICE, BOB));
        assert!(created.message.starts_with(&format!(
            "Game({}) Phase(COMMIT) Last(CREATED",
            created.game_id
        )));

        let revealed = engine
            .advance(BOB, 1010, &format!("opponent {} action 3 nonce y1", ALICE))
            .unwrap();
        assert_eq!(revealed.phase, Phase::Reveal);
        assert!(revealed.winner.is_none());

        let finished = engine
            .advance(ALICE, 1020, &format!("o {} a 4 n x1", BOB))
            .unwrap();
        assert_eq!(finished.phase, Phase::Finish);
        assert_eq!(
            finished.winner,
            Some(Winner {
                player: PlayerId::new(BOB),
                victory: Victory::Normal,
            })
        );
        assert!(finished
            .message
            .starts_with("WINNER[normal victory](0x3c44...93bc) | "));
        assert!(finished.message.contains("Phase(FINISH)"));
        assert!(engine.store().is_empty());
    }

    #[test]
    fn test_reveal_without_nonce_verifies() {
        let mut engine = OddsEvensEngine::default();
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "None"))
            .unwrap();
        engine.advance(BOB, 2, &format!("o {} a 3", ALICE)).unwrap();

        let outcome = engine.advance(ALICE, 3, &format!("o {} a 4", BOB)).unwrap();
        assert_eq!(outcome.phase, Phase::Finish);
        assert_eq!(
            outcome.winner.map(|w| (w.player, w.victory)),
            Some((PlayerId::new(ALICE), Victory::Normal))
        );
        assert!(outcome.message.contains("Last(REVEAL ADDED"));
    }

    #[test]
    fn test_wrong_reveal_loses() {
        let mut engine = OddsEvensEngine::default();
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        engine
            .advance(BOB, 2, &create_payload(ALICE, "even", 3, "y1"))
            .unwrap();

        let outcome = engine
            .advance(ALICE, 3, &format!("o {} a 4 n wrong", BOB))
            .unwrap();
        assert_eq!(outcome.phase, Phase::Finish);
        assert_eq!(
            outcome.winner.map(|w| (w.player, w.victory)),
            Some((PlayerId::new(BOB), Victory::WrongReveal))
        );
        assert!(outcome.message.contains("WRONG REVEAL ADDED"));
        assert!(engine.store().is_empty());
    }

    #[test]
    fn test_finished_pair_starts_fresh_game() {
        let mut engine = OddsEvensEngine::default();
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        let aborted = engine
            .advance(ALICE, 2, &format!("o {} cancel", BOB))
            .unwrap();
        assert_eq!(aborted.phase, Phase::Abort);
        assert!(aborted.message.contains("Last(CANCELED"));
        assert!(engine.store().is_empty());

        // A move that only makes sense in a live game now fails creation.
        let err = engine
            .advance(BOB, 3, &format!("o {} a 1 n z", ALICE))
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingField("commit")));

        let fresh = engine
            .advance(BOB, 4, &create_payload(ALICE, "even", 2, "z"))
            .unwrap();
        assert_eq!(fresh.phase, Phase::Commit);
        assert_eq!(engine.store().len(), 1);
        let game = engine.store().get(&fresh.game_id).unwrap();
        assert_eq!(game.player(crate::player::Seat::Creator), &PlayerId::new(BOB));
    }

    #[test]
    fn test_self_play_creates_nothing() {
        let mut engine = OddsEvensEngine::default();
        let err = engine
            .advance(ALICE, 1, &create_payload(&ALICE.to_lowercase(), "odd", 1, "n"))
            .unwrap_err();
        assert!(matches!(err, EngineError::SelfPlay));
        assert!(engine.store().is_empty());
    }

    #[test]
    fn test_cancel_after_opponent_commit() {
        let mut engine = OddsEvensEngine::default();
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        let id = engine.game_id(ALICE, BOB);

        // The challenger cannot cancel a game it did not create.
        let before = engine.store().get(&id).cloned();
        let err = engine
            .advance(BOB, 2, &format!("o {} x 1", ALICE))
            .unwrap_err();
        assert!(matches!(err, EngineError::CancelNotAllowed(_)));
        assert_eq!(engine.store().get(&id).cloned(), before);
        assert_eq!(engine.store().get(&id).unwrap().phase(), Phase::Commit);

        engine
            .advance(BOB, 3, &create_payload(ALICE, "even", 3, "y1"))
            .unwrap();
        let before = engine.store().get(&id).cloned();
        let err = engine
            .advance(ALICE, 4, &format!("o {} x 1", BOB))
            .unwrap_err();
        assert!(matches!(err, EngineError::CancelNotAllowed(_)));
        assert_eq!(engine.store().get(&id).cloned(), before);
    }

    #[test]
    fn test_timeout_claim() {
        let mut engine = OddsEvensEngine::default();
        engine
            .advance(ALICE, 1000, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        engine
            .advance(BOB, 1100, &create_payload(ALICE, "even", 3, "y1"))
            .unwrap();
        engine
            .advance(ALICE, 1200, &format!("o {} a 4 n x1", BOB))
            .unwrap();

        let err = engine
            .advance(ALICE, 2399, &format!("o {} timeout", BOB))
            .unwrap_err();
        assert!(matches!(err, EngineError::TimeoutNotEligible(_)));
        assert_eq!(err.class(), ErrorClass::Validation);

        let err = engine
            .advance(BOB, 5000, &format!("o {} t", ALICE))
            .unwrap_err();
        assert!(matches!(err, EngineError::TimeoutNotEligible(_)));

        let outcome = engine
            .advance(ALICE, 2400, &format!("o {} t", BOB))
            .unwrap();
        assert_eq!(outcome.phase, Phase::Finish);
        assert!(outcome
            .message
            .starts_with("WINNER[W.O. victory](0x7099...79c8) | "));
        assert!(engine.store().is_empty());
    }

    #[test]
    fn test_invalid_action_reports_context() {
        let mut engine = OddsEvensEngine::default();
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        let err = engine
            .advance(ALICE, 2, &format!("o {} a 4", BOB))
            .unwrap_err();

        match err {
            EngineError::InvalidAction {
                sender,
                game_id,
                phase,
            } => {
                assert_eq!(sender, "0x7099...79c8");
                assert_eq!(game_id, engine.game_id(ALICE, BOB));
                assert_eq!(phase, Phase::Commit);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_opponent_and_parse_errors() {
        let mut engine = OddsEvensEngine::default();
        assert!(matches!(
            engine.advance(ALICE, 1, "action 3"),
            Err(EngineError::MissingField("opponent"))
        ));
        let err = engine.advance(ALICE, 1, "parity sideways").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Parse);
        assert!(engine.store().is_empty());
    }

    #[test]
    fn test_truncated_id_collision_is_rejected() {
        let config = EngineConfig {
            game_id_len: 1,
            ..EngineConfig::default()
        };
        let mut engine = OddsEvensEngine::new(config).unwrap();
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        let taken = engine.game_id(ALICE, BOB);

        let carol = (1u64..5000)
            .map(|i| format!("0x{:040x}", i))
            .find(|c| engine.game_id(ALICE, c) == taken && c != &BOB.to_lowercase())
            .unwrap();

        let before = engine.store().get(&taken).cloned();
        let err = engine
            .advance(&carol, 2, &create_payload(ALICE, "even", 1, "n"))
            .unwrap_err();
        assert!(matches!(err, EngineError::GameIdCollision { .. }));
        assert_eq!(engine.store().get(&taken).cloned(), before);
    }

    #[test]
    fn test_corrupt_record_is_unrecoverable() {
        let mut engine = OddsEvensEngine::default();
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        let id = engine.game_id(ALICE, BOB);
        engine.store.get_mut(&id).unwrap().force_phase(Phase::Abort);

        let err = engine
            .advance(BOB, 2, &format!("o {} a 1", ALICE))
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::CorruptState);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let moves = vec![
            (ALICE, 10, create_payload(BOB, "odd", 4, "x1")),
            (BOB, 20, format!("o {} a 2 n q", ALICE)),
            (BOB, 30, format!("o {} t", ALICE)),
            (ALICE, 40, format!("o {} a 4 n x1", BOB)),
        ];

        let run = || {
            let mut engine = OddsEvensEngine::default();
            moves
                .iter()
                .map(|(sender, ts, payload)| {
                    engine
                        .advance(sender, *ts, payload)
                        .map(|o| o.message)
                        .map_err(|e| e.to_string())
                })
                .collect::<Vec<_>>()
        };

        let first = run();
        assert_eq!(first, run());
        assert!(first[2].is_err());
        assert!(first[3]
            .as_ref()
            .unwrap()
            .starts_with("WINNER[normal victory](0x3c44...93bc)"));
    }

    #[test]
    fn test_inspect_lists_open_games() {
        let mut engine = OddsEvensEngine::default();
        assert_eq!(engine.inspect().unwrap(), "[]");

        let carol = "0x90f79bf6eb2c4f870365e785982e1f101e93b906";
        engine
            .advance(ALICE, 1, &create_payload(BOB, "odd", 4, "x1"))
            .unwrap();
        engine
            .advance(carol, 2, &create_payload(ALICE, "even", 1, "n"))
            .unwrap();

        let open = engine.open_games();
        assert_eq!(open.len(), 2);
        let listed: Vec<String> = serde_json::from_str(&engine.inspect().unwrap()).unwrap();
        assert_eq!(listed, open);

        let id = engine.game_id(ALICE, BOB);
        assert_eq!(
            engine.game_status(&id),
            open.iter().find(|s| s.contains(&id)).unwrap().clone()
        );
        assert_eq!(engine.game_status("nope"), "Game(nope)");
    }
}
