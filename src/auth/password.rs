use base64::{engine::general_purpose, Engine as _};
use constant_time_eq::constant_time_eq;
use pbkdf2::pbkdf2_hmac;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use tracing::warn;

const ALGORITHM: &str = "pbkdf2_sha256";
const SALT_LENGTH: usize = 22;

/// PBKDF2-SHA256 password hashing
///
/// Hashes use the `pbkdf2_sha256$<iterations>$<salt>$<base64 hash>` layout,
/// so the iteration count can be raised without invalidating stored hashes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

fn derive(password: &str, salt: &str, iterations: u32) -> String {
    // SHA256 produces 32 bytes
    let mut output = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut output);
    general_purpose::STANDARD.encode(output)
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self { iterations: iterations.max(1) }
    }

    pub fn hash(&self, password: &str) -> String {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LENGTH)
            .map(char::from)
            .collect();

        format!(
            "{}${}${}${}",
            ALGORITHM,
            self.iterations,
            salt,
            derive(password, &salt, self.iterations)
        )
    }

    /// Check a password against a stored hash, in constant time
    pub fn verify(&self, password: &str, hash_string: &str) -> bool {
        let parts: Vec<&str> = hash_string.split('$').collect();
        if parts.len() != 4 || parts[0] != ALGORITHM {
            warn!("Unknown password hash format");
            return false;
        }

        let iterations: u32 = match parts[1].parse() {
            Ok(i) if i > 0 => i,
            _ => return false,
        };
        let salt = parts[2];
        let expected_hash = parts[3];

        let computed_hash = derive(password, salt, iterations);
        constant_time_eq(computed_hash.as_bytes(), expected_hash.as_bytes())
    }
}
