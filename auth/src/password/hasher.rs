use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Cost parameters for password hashing.
///
/// `iterations` is the Argon2 time cost, `memory_kib` its memory cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub salt_length: usize,
    pub hash_length: usize,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
            salt_length: argon2::RECOMMENDED_SALT_LEN,
            hash_length: Params::DEFAULT_OUTPUT_LEN,
        }
    }
}

/// Freshly derived hash together with the salt it was derived from.
#[derive(Clone, PartialEq, Eq)]
pub struct SaltedHash {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

impl fmt::Debug for SaltedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaltedHash")
            .field("hash", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// Salted password hashing.
///
/// Derives fixed-length keys with Argon2id from a password and an explicit
/// per-credential salt. The salt is stored next to the hash by the caller.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    salt_length: usize,
    hash_length: usize,
}

impl PasswordHasher {
    /// Create a password hasher with the algorithm's recommended defaults.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            salt_length: argon2::RECOMMENDED_SALT_LEN,
            hash_length: Params::DEFAULT_OUTPUT_LEN,
        }
    }

    /// Create a password hasher with explicit cost parameters.
    ///
    /// # Arguments
    /// * `params` - Memory cost, iteration count, parallelism, salt and hash lengths
    ///
    /// # Errors
    /// * `InvalidParameters` - The parameters are rejected by the algorithm
    pub fn with_params(params: HashingParams) -> Result<Self, PasswordError> {
        if params.salt_length < argon2::MIN_SALT_LEN {
            return Err(PasswordError::InvalidParameters(format!(
                "salt length must be at least {} bytes, got {}",
                argon2::MIN_SALT_LEN,
                params.salt_length
            )));
        }

        let argon2_params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            Some(params.hash_length),
        )
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params),
            salt_length: params.salt_length,
            hash_length: params.hash_length,
        })
    }

    /// Generate a random salt from the operating system CSPRNG.
    pub fn generate_salt(&self) -> Vec<u8> {
        let mut salt = vec![0u8; self.salt_length];
        OsRng.fill_bytes(&mut salt);
        salt
    }

    /// Derive the hash of a password under the given salt.
    ///
    /// Deterministic for equal inputs. The output length is fixed by the
    /// hasher's parameters, independent of the password length.
    ///
    /// # Errors
    /// * `HashingFailed` - The salt or password is outside the algorithm limits
    pub fn hash(&self, password: &str, salt: &[u8]) -> Result<Vec<u8>, PasswordError> {
        let mut output = vec![0u8; self.hash_length];

        self.argon2
            .hash_password_into(password.as_bytes(), salt, &mut output)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(output)
    }

    /// Hash a password under a newly generated salt.
    pub fn hash_with_new_salt(&self, password: &str) -> Result<SaltedHash, PasswordError> {
        let salt = self.generate_salt();
        let hash = self.hash(password, &salt)?;
        Ok(SaltedHash { hash, salt })
    }

    /// Verify a password against a stored hash and salt.
    ///
    /// # Returns
    /// True if the recomputed hash equals the stored one
    ///
    /// # Errors
    /// * `HashingFailed` - The hash could not be recomputed
    pub fn verify(
        &self,
        password: &str,
        salt: &[u8],
        stored_hash: &[u8],
    ) -> Result<bool, PasswordError> {
        let candidate = self.hash(password, salt)?;
        Ok(constant_time_eq(&candidate, stored_hash))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte comparison whose running time does not depend on where the inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
