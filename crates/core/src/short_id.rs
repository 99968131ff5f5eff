//! Short identifier generation.
//!
//! Each generated README gets a small random token unique within its
//! repository path, so several generations for the same repo can coexist
//! under distinct URLs. Collision checking lives in the storage layer;
//! this module only produces candidates.

use rand::Rng;

/// Candidate alphabet. Lowercase so ids survive case-insensitive URL
/// handling.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Default id length.
pub const SHORT_ID_LENGTH: usize = 4;

/// Length used after [`MAX_SHORT_ID_ATTEMPTS`] collisions at the default
/// length.
pub const FALLBACK_SHORT_ID_LENGTH: usize = 6;

/// Collision-check attempts before escalating to the fallback length.
pub const MAX_SHORT_ID_ATTEMPTS: usize = 10;

/// Generate a random lowercase-alphanumeric id of the given length.
pub fn generate_short_id(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
