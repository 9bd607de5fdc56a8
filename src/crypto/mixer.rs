use blake3::Hasher as Blake3Hasher;
use digest::Digest;
use serde::{Deserialize, Serialize};
use sha3::Sha3_256;
use std::fmt;
use std::marker::PhantomData;

/// Keyed round function used inside each Feistel round.
///
/// Implementations must be deterministic and return a value below
/// `2^out_bits`. Invertibility of the network never depends on the mixer;
/// only the statistical quality of the permutation does.
pub trait RoundMixer: Send + Sync {
    fn mix(&self, round_key: u64, round: u8, out_bits: u32, input: u64) -> u64;
}

#[inline]
pub fn width_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Multiply-xor-shift integer hash (murmur3 finalizer) over `input ^ key`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiplyXorMixer;

impl RoundMixer for MultiplyXorMixer {
    #[inline]
    fn mix(&self, round_key: u64, _round: u8, out_bits: u32, input: u64) -> u64 {
        let mut h = input ^ round_key;
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
        h ^= h >> 33;
        h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        h ^= h >> 33;
        h & width_mask(out_bits)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Mixer;

impl RoundMixer for Blake3Mixer {
    fn mix(&self, round_key: u64, round: u8, out_bits: u32, input: u64) -> u64 {
        let mut hasher = Blake3Hasher::new();
        hasher.update(&round_key.to_le_bytes());
        hasher.update(&[round]);
        hasher.update(&input.to_le_bytes());
        let digest = hasher.finalize();
        leading_u64(digest.as_bytes()) & width_mask(out_bits)
    }
}

/// Round function over any RustCrypto digest with at least eight output bytes.
pub struct DigestMixer<D> {
    _digest: PhantomData<fn() -> D>,
}

pub type Sha3Mixer = DigestMixer<Sha3_256>;

impl<D> DigestMixer<D> {
    pub fn new() -> Self {
        DigestMixer {
            _digest: PhantomData,
        }
    }
}

impl<D> Default for DigestMixer<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for DigestMixer<D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<D> Copy for DigestMixer<D> {}

impl<D> fmt::Debug for DigestMixer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestMixer").finish()
    }
}

impl<D: Digest> RoundMixer for DigestMixer<D> {
    fn mix(&self, round_key: u64, round: u8, out_bits: u32, input: u64) -> u64 {
        let output = D::new()
            .chain_update(round_key.to_le_bytes())
            .chain_update([round])
            .chain_update(input.to_le_bytes())
            .finalize();
        leading_u64(&output) & width_mask(out_bits)
    }
}

fn leading_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    let take = bytes.len().min(8);
    word[..take].copy_from_slice(&bytes[..take]);
    u64::from_le_bytes(word)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixerKind {
    #[default]
    MultiplyXor,
    Blake3,
    Sha3,
}

impl fmt::Display for MixerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerKind::MultiplyXor => write!(f, "multiply-xor"),
            MixerKind::Blake3 => write!(f, "blake3"),
            MixerKind::Sha3 => write!(f, "sha3"),
        }
    }
}

impl std::str::FromStr for MixerKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "multiply-xor" | "multiplyxor" | "mx" => Ok(MixerKind::MultiplyXor),
            "blake3" => Ok(MixerKind::Blake3),
            "sha3" | "sha3-256" => Ok(MixerKind::Sha3),
            other => Err(format!("unknown mixer '{other}'")),
        }
    }
}

/// Runtime-selected mixer, dispatched by match rather than through a vtable.
#[derive(Debug, Clone, Copy)]
pub enum Mixer {
    MultiplyXor(MultiplyXorMixer),
    Blake3(Blake3Mixer),
    Sha3(Sha3Mixer),
}

impl Mixer {
    pub fn kind(&self) -> MixerKind {
        match self {
            Mixer::MultiplyXor(_) => MixerKind::MultiplyXor,
            Mixer::Blake3(_) => MixerKind::Blake3,
            Mixer::Sha3(_) => MixerKind::Sha3,
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Mixer::MultiplyXor(MultiplyXorMixer)
    }
}

impl From<MixerKind> for Mixer {
    fn from(kind: MixerKind) -> Self {
        match kind {
            MixerKind::MultiplyXor => Mixer::MultiplyXor(MultiplyXorMixer),
            MixerKind::Blake3 => Mixer::Blake3(Blake3Mixer),
            MixerKind::Sha3 => Mixer::Sha3(Sha3Mixer::new()),
        }
    }
}

impl RoundMixer for Mixer {
    #[inline]
    fn mix(&self, round_key: u64, round: u8, out_bits: u32, input: u64) -> u64 {
        match self {
            Mixer::MultiplyXor(mixer) => mixer.mix(round_key, round, out_bits, input),
            Mixer::Blake3(mixer) => mixer.mix(round_key, round, out_bits, input),
            Mixer::Sha3(mixer) => mixer.mix(round_key, round, out_bits, input),
        }
    }
}
