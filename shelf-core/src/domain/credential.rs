//! Password digest domain model
//!
//! Passwords are stored as Argon2id PHC strings
//! (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`). The salt and cost
//! parameters travel inside the string, so raising the cost for new
//! accounts leaves existing ones verifiable.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Version};

use super::result::{Error, Result};

/// Default Argon2id parameters for login passwords
pub const DEFAULT_TIME_COST: u32 = 2;
pub const DEFAULT_MEMORY_COST: u32 = 19456; // 19 MiB
pub const DEFAULT_PARALLELISM: u32 = 1;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Argon2id cost parameters used for new digests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

impl Argon2Params {
    /// Minimal parameters accepted by argon2, for fast tests
    pub fn minimal() -> Self {
        Self {
            time_cost: 1,
            memory_cost: 8,
            parallelism: 1,
            hash_len: DEFAULT_HASH_LEN,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = argon2::Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.hash_len as usize),
        )
        .map_err(|e| Error::Config(format!("Failed to create argon2 params: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Salted password digest as stored in the users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    phc: String,
}

impl PasswordDigest {
    /// Hash a password with a fresh random salt
    pub fn create(password: &str, params: Argon2Params) -> Result<Self> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        let hash = params
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Config(format!("Failed to hash password: {}", e)))?;

        Ok(Self {
            phc: hash.to_string(),
        })
    }

    /// Wrap a PHC string read back from storage
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self { phc: phc.into() }
    }

    pub fn as_phc(&self) -> &str {
        &self.phc
    }

    /// Check a submitted password against this digest
    ///
    /// Cost parameters come from the stored string, not from the defaults.
    pub fn verify(&self, password: &str) -> Result<bool> {
        let parsed = PasswordHash::new(&self.phc)
            .map_err(|e| Error::database(format!("Invalid stored password hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::database(format!("Failed to verify password: {}", e))),
        }
    }
}
