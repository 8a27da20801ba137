//! Password policy and hashing.
//!
//! # Policy
//!
//! At least 8 characters, drawn only from ASCII letters and digits, with at
//! least one uppercase letter, one lowercase letter and one digit.
//!
//! # Hash format
//!
//! PBKDF2-HMAC-SHA256, 100 000 iterations, 32-byte salt from the OS RNG,
//! 32-byte digest. Stored as lowercase `hex(salt || digest)` (128 chars).

use crate::error::Result;
use crate::prompt::Prompter;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const PBKDF2_ITERATIONS: u32 = 100_000;
pub const SALT_LEN: usize = 32;
pub const DIGEST_LEN: usize = 32;

pub const POLICY_MESSAGE: &str = "Password must contain at least eight characters, one uppercase letter, one lowercase letter, and one number.";

/// Why a password was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordWeakness {
    TooShort,
    NoUppercase,
    NoLowercase,
    NoDigit,
    /// Characters other than ASCII letters and digits
    InvalidCharacter,
}

impl fmt::Display for PasswordWeakness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::TooShort => "shorter than eight characters",
            Self::NoUppercase => "no uppercase letter",
            Self::NoLowercase => "no lowercase letter",
            Self::NoDigit => "no digit",
            Self::InvalidCharacter => "only letters and digits are allowed",
        };
        f.write_str(msg)
    }
}

/// Check a password against the policy, reporting the first violation.
pub fn validate_password(password: &str) -> std::result::Result<(), PasswordWeakness> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordWeakness::TooShort);
    }
    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PasswordWeakness::InvalidCharacter);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordWeakness::NoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordWeakness::NoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordWeakness::NoDigit);
    }
    Ok(())
}

pub fn check_password_strength(password: &str) -> bool {
    validate_password(password).is_ok()
}

/// Derive the stored hash for `password` with an explicit salt.
pub fn hash_password_with_salt(password: &str, salt: &[u8; SALT_LEN]) -> String {
    let mut digest = Zeroizing::new([0u8; DIGEST_LEN]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *digest);

    let mut encoded = Vec::with_capacity(SALT_LEN + DIGEST_LEN);
    encoded.extend_from_slice(salt);
    encoded.extend_from_slice(&*digest);
    hex::encode(encoded)
}

/// Derive the stored hash for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    hash_password_with_salt(password, &salt)
}

/// Recompute `encoded`'s digest from its embedded salt and compare.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Ok(bytes) = hex::decode(encoded) else {
        return false;
    };
    if bytes.len() != SALT_LEN + DIGEST_LEN {
        return false;
    }
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&bytes[..SALT_LEN]);
    hash_password_with_salt(password, &salt) == encoded
}

/// An account name paired with its derived password hash.
///
/// The plaintext is dropped (and zeroized) as soon as the hash exists.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    hash: String,
}

impl Credential {
    pub fn from_password(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            hash: hash_password(password),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("hash", &"[redacted]")
            .finish()
    }
}

/// Prompt (masked) until the entered password satisfies the policy.
pub fn get_secure_password(prompter: &mut dyn Prompter, user: &str) -> Result<Zeroizing<String>> {
    loop {
        let password = prompter.read_secret(&format!("Please enter the password for {}: ", user))?;
        match validate_password(&password) {
            Ok(()) => return Ok(password),
            Err(weakness) => {
                log::debug!("Rejected password for {}: {}", user, weakness);
                println!("{}", POLICY_MESSAGE);
            }
        }
    }
}

/// Prompt for a password and return the derived credential.
pub fn collect_credential(prompter: &mut dyn Prompter, user: &str) -> Result<Credential> {
    let password = get_secure_password(prompter, user)?;
    Ok(Credential::from_password(user, &password))
}
