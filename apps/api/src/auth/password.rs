use rand::distributions::{Alphanumeric, DistString};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Salted SHA-256 digest of a password, as stored on the user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStore {
    pub salt: String,
    pub hashed: String,
}

pub fn secure_password(password: &str) -> PasswordStore {
    let salt = Alphanumeric.sample_string(&mut rand::thread_rng(), SALT_LEN);
    let hashed = digest(password, &salt);
    PasswordStore { salt, hashed }
}

pub fn match_password(password: &str, store: &PasswordStore) -> bool {
    constant_time_eq(digest(password, &store.salt).as_bytes(), store.hashed.as_bytes())
}

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compares digests without an early exit on the first differing byte, so
/// response timing does not reveal how much of a guessed hash matched.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
