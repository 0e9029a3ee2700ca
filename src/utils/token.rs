//! Session token generation.

use base64::Engine as _;

/// Entropy of a session token before base64 encoding.
const TOKEN_LENGTH_BYTES: usize = 32;

/// Generates an unguessable opaque session token.
///
/// 256 bits from the system RNG, URL-safe base64 without padding (43
/// characters). The token has no internal structure; it is only ever
/// compared against the unique `user_sessions.token` column.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_session_token() -> String {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
