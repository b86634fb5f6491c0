use crate::commitment::{determine_winner, CommitmentScheme, HashCommitment, Reveal};
use crate::error::{EngineError, Result};
use crate::payload::Intent;
use crate::player::{PlayerId, PlayerSlot, Seat};
use crate::status::pretty_timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Uninitialized,
    Commit,
    Reveal,
    Finish,
    Abort,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finish | Phase::Abort)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninitialized => "UNINITIALIZED",
            Phase::Commit => "COMMIT",
            Phase::Reveal => "REVEAL",
            Phase::Finish => "FINISH",
            Phase::Abort => "ABORT",
        };
        f.write_str(name)
    }
}

/// What last happened to a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    Created,
    CommitAdded,
    RevealAdded,
    WrongRevealAdded,
    Timeout,
    Canceled,
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interaction::Created => "CREATED",
            Interaction::CommitAdded => "COMMIT ADDED",
            Interaction::RevealAdded => "REVEAL ADDED",
            Interaction::WrongRevealAdded => "WRONG REVEAL ADDED",
            Interaction::Timeout => "TIMEOUT",
            Interaction::Canceled => "CANCELED",
        };
        f.write_str(name)
    }
}

/// How a finished game was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Victory {
    /// Both reveals matched and parity decided.
    Normal,
    /// The opponent's reveal did not match their commitment.
    WrongReveal,
    /// The opponent never revealed before the timeout.
    Walkover,
}

impl fmt::Display for Victory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Victory::Normal => f.write_str("normal victory"),
            Victory::WrongReveal => f.write_str("wrong reveal victory"),
            Victory::Walkover => f.write_str("W.O. victory"),
        }
    }
}

/// Result of applying an intent to a live game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The game moved on without a winner.
    Advanced,
    /// The game finished with a winner.
    Won { seat: Seat, victory: Victory },
    /// Nothing in the intent applies to this game and sender right now.
    NotApplicable,
}

/// A game between two players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    id: String,
    phase: Phase,
    players: [PlayerId; 2],
    last_ts: u64,
    last_interaction: Interaction,
    slots: [PlayerSlot; 2],
}

impl GameRecord {
    /// Build a record from the first message of a pair; the sender becomes the creator.
    pub fn create(id: String, sender: &PlayerId, ts: u64, intent: &Intent) -> Result<Self> {
        let opponent = intent
            .opponent
            .as_ref()
            .ok_or(EngineError::MissingField("opponent"))?;
        if opponent == sender {
            return Err(EngineError::SelfPlay);
        }
        let commit = intent
            .commit
            .as_ref()
            .ok_or(EngineError::MissingField("commit"))?;
        let parity = intent.parity.ok_or(EngineError::MissingField("parity"))?;

        let mut creator = PlayerSlot::new(parity);
        creator.record_commit(commit.clone(), ts);
        let challenger = PlayerSlot::new(parity.opposite());

        Ok(Self {
            id,
            phase: Phase::Uninitialized,
            players: [sender.clone(), opponent.clone()],
            last_ts: ts,
            last_interaction: Interaction::Created,
            slots: [creator, challenger],
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[PlayerId; 2] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &PlayerId {
        &self.players[seat.index()]
    }

    pub fn slot(&self, seat: Seat) -> &PlayerSlot {
        &self.slots[seat.index()]
    }

    pub fn last_ts(&self) -> u64 {
        self.last_ts
    }

    pub fn last_interaction(&self) -> Interaction {
        self.last_interaction
    }

    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        if &self.players[0] == player {
            Some(Seat::Creator)
        } else if &self.players[1] == player {
            Some(Seat::Challenger)
        } else {
            None
        }
    }

    /// Whether this record belongs to the unordered pair `a`, `b`.
    pub fn is_between(&self, a: &PlayerId, b: &PlayerId) -> bool {
        matches!(
            (self.seat_of(a), self.seat_of(b)),
            (Some(x), Some(y)) if x != y
        )
    }

    /// Uninitialized -> Commit, right after creation.
    pub fn open(&mut self) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            return Err(self.corrupt());
        }
        self.phase = Phase::Commit;
        Ok(())
    }

    /// Apply an intent from the player in `seat` at time `ts`.
    pub fn apply(
        &mut self,
        seat: Seat,
        ts: u64,
        intent: &Intent,
        timeout_secs: u64,
    ) -> Result<Transition> {
        match self.phase {
            Phase::Commit => self.apply_commit_phase(seat, ts, intent),
            Phase::Reveal => self.apply_reveal_phase(seat, ts, intent, timeout_secs),
            Phase::Uninitialized | Phase::Finish | Phase::Abort => Err(self.corrupt()),
        }
    }

    fn apply_commit_phase(&mut self, seat: Seat, ts: u64, intent: &Intent) -> Result<Transition> {
        let slot = &self.slots[seat.index()];
        let fresh = !slot.has_committed() && !slot.has_revealed();

        if fresh && (intent.commit.is_some() || intent.action.is_some()) {
            let slot = &mut self.slots[seat.index()];
            match (&intent.commit, intent.action) {
                (Some(commit), _) => {
                    slot.record_commit(commit.clone(), ts);
                    self.last_interaction = Interaction::CommitAdded;
                }
                // Reveal without a prior commit counts as both.
                (None, Some(action)) => {
                    slot.record_reveal(action, intent.nonce.clone(), ts);
                    self.last_interaction = Interaction::RevealAdded;
                }
                (None, None) => return Ok(Transition::NotApplicable),
            }
            self.last_ts = ts;
            self.phase = Phase::Reveal;
            return Ok(Transition::Advanced);
        }

        if intent.cancel {
            self.check_cancel(seat)?;
            self.phase = Phase::Abort;
            self.last_interaction = Interaction::Canceled;
            return Ok(Transition::Advanced);
        }

        if intent.timeout {
            return Err(EngineError::timeout_not_eligible(format!(
                "game is in {} phase",
                self.phase
            )));
        }

        Ok(Transition::NotApplicable)
    }

    fn apply_reveal_phase(
        &mut self,
        seat: Seat,
        ts: u64,
        intent: &Intent,
        timeout_secs: u64,
    ) -> Result<Transition> {
        if let (false, Some(action)) = (self.slots[seat.index()].has_revealed(), intent.action) {
            let slot = &mut self.slots[seat.index()];
            slot.record_reveal(action, intent.nonce.clone(), ts);
            self.last_ts = ts;

            let reveal = Reveal {
                action,
                nonce: slot.nonce.clone(),
            };
            let matches = slot
                .commit
                .as_ref()
                .is_some_and(|commit| HashCommitment::verify(commit, &reveal));

            if !matches {
                self.phase = Phase::Finish;
                self.last_interaction = Interaction::WrongRevealAdded;
                return Ok(Transition::Won {
                    seat: seat.other(),
                    victory: Victory::WrongReveal,
                });
            }

            self.last_interaction = Interaction::RevealAdded;
            if !self.slots[seat.other().index()].has_revealed() {
                return Ok(Transition::Advanced);
            }

            let winner = determine_winner(&self.slots).ok_or_else(|| self.corrupt())?;
            self.phase = Phase::Finish;
            return Ok(Transition::Won {
                seat: winner,
                victory: Victory::Normal,
            });
        }

        if intent.timeout {
            self.check_timeout(seat, ts, timeout_secs)?;
            self.phase = Phase::Finish;
            self.last_interaction = Interaction::Timeout;
            return Ok(Transition::Won {
                seat,
                victory: Victory::Walkover,
            });
        }

        if intent.cancel {
            return Err(EngineError::cancel_not_allowed(format!(
                "game is in {} phase",
                self.phase
            )));
        }

        Ok(Transition::NotApplicable)
    }

    /// Only the creator may cancel, and only while the opponent has not committed.
    fn check_cancel(&self, seat: Seat) -> Result<()> {
        if !self.slots[seat.index()].has_committed() {
            return Err(EngineError::cancel_not_allowed(
                "only the player who created the game can cancel it",
            ));
        }
        if self.slots[seat.other().index()].has_committed() {
            return Err(EngineError::cancel_not_allowed(
                "opponent already sent a commit",
            ));
        }
        Ok(())
    }

    fn check_timeout(&self, seat: Seat, ts: u64, timeout_secs: u64) -> Result<()> {
        if !self.slots[seat.index()].has_revealed() {
            return Err(EngineError::timeout_not_eligible("didn't send reveal"));
        }
        if self.slots[seat.other().index()].has_revealed() {
            return Err(EngineError::timeout_not_eligible("opponent sent reveal"));
        }
        let deadline = self.last_ts.saturating_add(timeout_secs);
        if ts < deadline {
            return Err(EngineError::timeout_not_eligible(format!(
                "must wait until {}",
                pretty_timestamp(Some(deadline))
            )));
        }
        Ok(())
    }

    fn corrupt(&self) -> EngineError {
        tracing::error!("Game {} found in impossible {} phase", self.id, self.phase);
        EngineError::CorruptState {
            game_id: self.id.clone(),
            phase: self.phase,
        }
    }

    #[cfg(test)]
    pub(crate) fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}
