use rand::Rng;

/// Generates a random 32-character hex string (128 bits of entropy).
///
/// Used for session ids, issued login tokens and timed-action tokens.
/// Guessing a live one is computationally infeasible.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
