//! Event code generation.
//!
//! Codes are 6 characters from an alphabet without look-alikes (no I, O, 0, 1)
//! so they survive being read off a projector.

use rand::Rng;

pub const EVENT_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const EVENT_CODE_LEN: usize = 6;

/// Generate a random event code. Uniqueness is enforced by the database.
pub fn generate_event_code() -> String {
    let mut rng = rand::rng();
    (0..EVENT_CODE_LEN)
        .map(|_| EVENT_CODE_ALPHABET[rng.random_range(0..EVENT_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a code typed by a participant.
pub fn normalize_event_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
