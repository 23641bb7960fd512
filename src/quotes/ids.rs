//! Identifiers for quotes and CMS array items.

use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

pub const QUOTE_ID_LENGTH: usize = 7;

/// Short human-readable quote reference, e.g. `K7Q2XMA`.
pub fn generate_quote_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(QUOTE_ID_LENGTH)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

/// `_key` for an entry of a CMS array field.
pub fn generate_key() -> String {
    let mut key = Uuid::new_v4().simple().to_string();
    key.truncate(12);
    key
}
