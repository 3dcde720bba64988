//! Account creation and login verification.
//!
//! Passwords are hashed with Argon2id and a fresh random salt per account,
//! and stored as PHC strings (`$argon2id$v=19$...`). Verification parses the
//! stored string and lets the verifier do the constant-time comparison.
//!
//! Session state is not kept here; a successful [`AuthService::verify_login`]
//! is all the caller gets.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::Utc;
use dashboard_core::{DEFAULT_ROLE, User, ValidationError};
use tracing::{debug, info, warn};

use crate::connection::ConnectionProvider;
use crate::crud::Crud;
use crate::error::{Result, StoreError};

/// Username of the test account provisioned on first run.
pub const DEFAULT_USERNAME: &str = "test";

/// Password of the test account. Test-only; never rely on it in a real
/// deployment.
pub const DEFAULT_PASSWORD: &str = "123456";

/// Hashes `password` with a new random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Hash(e.to_string()))
}

/// Checks `password` against a stored PHC hash string.
///
/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

/// User accounts over the `users` table.
pub struct AuthService<'p> {
    users: Crud<'p, User>,
}

impl<'p> AuthService<'p> {
    pub fn new(provider: &'p ConnectionProvider) -> Self {
        Self {
            users: Crud::new(provider),
        }
    }

    /// Creates an account with the default role.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] for an empty username or password.
    /// - [`StoreError::DuplicateKey`] if the username is taken.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User> {
        self.create_user_with_role(username, password, DEFAULT_ROLE)
    }

    /// Creates an account with an explicit role.
    pub fn create_user_with_role(&self, username: &str, password: &str, role: &str) -> Result<User> {
        let username = username.trim();
        if password.is_empty() {
            return Err(ValidationError::MissingField {
                table: "users".to_string(),
                field: "password".to_string(),
            }
            .into());
        }

        let user = User {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: role.trim().to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.users.insert(&user)?;
        info!(username = %user.username, role = %user.role, "user created");
        Ok(user)
    }

    /// Returns whether `password` is correct for `username`.
    ///
    /// An unknown username yields `false`, exactly like a wrong password.
    /// Only storage failures are reported as errors.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<bool> {
        let verified = match self.users.fetch_by_id(username.trim())? {
            Some(user) => verify_password(password, &user.password_hash),
            None => false,
        };
        debug!(verified, "login attempt");
        Ok(verified)
    }

    /// Looks up an account.
    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        self.users.fetch_by_id(username.trim())
    }

    /// Provisions the `test` / `123456` account if it does not exist.
    ///
    /// Returns `true` if the account was created by this call.
    pub fn ensure_default_user(&self) -> Result<bool> {
        match self.create_user(DEFAULT_USERNAME, DEFAULT_PASSWORD) {
            Ok(_) => Ok(true),
            Err(e) if e.is_duplicate_key() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
