//! Learning id generation.
//!
//! Ids are 16 bytes of OS entropy rendered as lowercase hex, so they are
//! 32 characters long and infeasible to guess or enumerate. Uniqueness
//! against existing records is NOT guaranteed here; the database UNIQUE
//! constraint on `learning_id` is the authority, and a collision surfaces
//! as a duplicate error on insert.

use rand::rngs::OsRng;
use rand::RngCore;

const LEARNING_ID_BYTES: usize = 16;

/// Generates a fresh learning id. Panics only if the OS entropy source
/// fails, which is unrecoverable for issuance.
pub fn generate_learning_id() -> String {
    let mut buf = [0u8; LEARNING_ID_BYTES];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_is_32_lowercase_hex_chars() {
        let id = generate_learning_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn ten_thousand_ids_are_distinct() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_learning_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
