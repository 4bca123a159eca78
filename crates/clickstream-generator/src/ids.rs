//! Record identifiers.

use rand::Rng;
use uuid::Uuid;

/// Draw a random UUID v4 from the provided RNG.
///
/// Ids come from the run's seeded streams rather than the OS, so a fixed
/// seed reproduces the same ids.
pub fn new_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);

    // Set version (4) and variant (RFC 4122) bits
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}
