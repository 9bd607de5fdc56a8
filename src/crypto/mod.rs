pub mod keys;
pub mod mixer;

pub use keys::{default_round_count, derive_round_keys, RoundKeys, MAX_ROUNDS};
pub use mixer::{
	Blake3Mixer,
	DigestMixer,
	Mixer,
	MixerKind,
	MultiplyXorMixer,
	RoundMixer,
	Sha3Mixer,
};
