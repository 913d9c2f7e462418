//! Seed handling. A user seed is keyed through HMAC-SHA256 with a domain tag
//! so independent streams never share state.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Domain tag for the single stream a game draws from.
pub const GAME_STREAM: &[u8] = b"salem-game";

/// 32 bytes of key material for `domain_tag`.
#[must_use]
pub fn derive_seed_bytes(user_seed: u64, domain_tag: &[u8]) -> [u8; 32] {
    let mut bytes = [0_u8; 32];
    // HMAC accepts keys of any length, so this never fails in practice.
    let Ok(mut mac) = HmacSha256::new_from_slice(&user_seed.to_le_bytes()) else {
        bytes[..8].copy_from_slice(&user_seed.to_le_bytes());
        return bytes;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    for (slot, byte) in bytes.iter_mut().zip(digest.iter()) {
        *slot = *byte;
    }
    bytes
}

/// Derive a new 64-bit seed, e.g. for a retried simulation.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let bytes = derive_seed_bytes(user_seed, domain_tag);
    let mut head = [0_u8; 8];
    head.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(head)
}

/// The game RNG for `user_seed`.
#[must_use]
pub fn game_rng(user_seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::from_seed(derive_seed_bytes(user_seed, GAME_STREAM))
}

/// Fresh seed from OS entropy.
#[must_use]
pub fn entropy_seed() -> u64 {
    rand::random::<u64>()
}
