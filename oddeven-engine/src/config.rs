use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Seconds a player must wait after the last interaction before claiming a timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 1200;

/// Hex characters kept from the SHA-224 digest of a player pair.
pub const DEFAULT_GAME_ID_LEN: usize = 10;

const MAX_GAME_ID_LEN: usize = 56;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timeout_secs: u64,
    pub game_id_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            game_id_len: DEFAULT_GAME_ID_LEN,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(EngineError::config("Timeout must be greater than 0"));
        }

        if self.game_id_len == 0 || self.game_id_len > MAX_GAME_ID_LEN {
            return Err(EngineError::config(format!(
                "Game id length must be between 1 and {}",
                MAX_GAME_ID_LEN
            )));
        }

        Ok(())
    }
}
