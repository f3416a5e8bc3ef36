//! Room codes.

use crate::core::GameRng;

/// Characters a room code may use: no `0`/`O` or `1`/`I`.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a room code of `len` characters.
pub fn generate(rng: &mut GameRng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(CODE_ALPHABET[rng.gen_index(CODE_ALPHABET.len())]))
        .collect()
}
