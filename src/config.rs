use crate::crypto::keys::MAX_ROUNDS;
use crate::crypto::mixer::MixerKind;
use crate::error::{PermutationError, Result};
use crate::permutation::cycle_walk::DEFAULT_WALK_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Algorithm parameters. Two engines built from the same `(len, seed)` agree
/// only when their configs agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EngineConfig {
    /// Pins the Feistel round count; `None` picks it from the domain width.
    pub rounds: Option<u8>,
    pub mixer: MixerKind,
    /// Cycle-walk step ceiling. Engines raise it to the worst case their
    /// domain can force, so only values above that have any effect.
    pub walk_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rounds: None,
            mixer: MixerKind::default(),
            walk_limit: DEFAULT_WALK_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn with_rounds(mut self, rounds: u8) -> Self {
        self.rounds = Some(rounds);
        self
    }

    pub fn with_mixer(mut self, mixer: MixerKind) -> Self {
        self.mixer = mixer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(rounds) = self.rounds {
            if rounds == 0 || rounds as usize > MAX_ROUNDS {
                return Err(PermutationError::InvalidRounds { rounds });
            }
        }
        if self.walk_limit == 0 {
            return Err(PermutationError::config("walk-limit must be positive"));
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)
            .map_err(|err| PermutationError::config(format!("parse config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            PermutationError::config(format!("read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|err| PermutationError::config(format!("serialize config: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(EngineConfig::from_toml_str(""), Ok(EngineConfig::default()));
    }

    #[test]
    fn parses_all_fields() {
        let config = EngineConfig::from_toml_str(
            "rounds = 6\nmixer = \"blake3\"\nwalk-limit = 1024\n",
        )
        .unwrap();
        assert_eq!(config.rounds, Some(6));
        assert_eq!(config.mixer, MixerKind::Blake3);
        assert_eq!(config.walk_limit, 1024);
    }

    #[test]
    fn rejects_out_of_range_rounds_and_unknown_keys() {
        assert_eq!(
            EngineConfig::from_toml_str("rounds = 0"),
            Err(PermutationError::InvalidRounds { rounds: 0 })
        );
        assert!(matches!(
            EngineConfig::from_toml_str("rounds = 33"),
            Err(PermutationError::InvalidRounds { rounds: 33 })
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("walk-limit = 0"),
            Err(PermutationError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("seed = 3"),
            Err(PermutationError::Config(_))
        ));
    }

    #[test]
    fn toml_round_trip_keeps_pinned_rounds() {
        let config = EngineConfig::default()
            .with_rounds(12)
            .with_mixer(MixerKind::Sha3);
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text), Ok(config));
    }
}
