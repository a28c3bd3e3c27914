//! services/console/src/console/auth.rs
//!
//! Login and logout, plus the password helpers used when accounts are created
//! or changed through the console.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use recordkeep_core::domain::SessionUser;
use tracing::{error, info, warn};

use super::state::ConsoleContext;
use crate::error::{ConsoleError, ConsoleResult};

impl ConsoleContext {
    /// Checks the credentials against the user table. On success the sanitized
    /// user becomes the active session and is written to the slot. On failure
    /// the current session is left untouched.
    pub async fn login(&mut self, username: &str, password: &str) -> ConsoleResult<SessionUser> {
        let user = self
            .store
            .find_user_by_username(username)
            .filter(|user| verify_password(&user.password, password))
            .map(SessionUser::from);

        let Some(user) = user else {
            warn!(username = %username, "Login rejected");
            return Err(ConsoleError::AuthenticationFailure);
        };

        let blob = serde_json::to_string(&user)?;
        self.slot
            .write(&self.session_key, &blob)
            .await
            .inspect_err(|e| error!("Failed to persist session: {:?}", e))?;

        info!(username = %user.username, role = %user.role, "Logged in");
        self.session = Some(user.clone());
        Ok(user)
    }

    /// Clears the active session and empties the slot.
    pub async fn logout(&mut self) -> ConsoleResult<()> {
        self.slot
            .remove(&self.session_key)
            .await
            .inspect_err(|e| error!("Failed to clear session slot: {:?}", e))?;

        if let Some(user) = self.session.take() {
            info!(username = %user.username, "Logged out");
        }
        Ok(())
    }
}

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(plain: &str) -> ConsoleResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ConsoleError::PasswordHash(e.to_string())
        })
}

/// Verifies `candidate` against a stored password. PHC strings are checked with
/// Argon2; anything else (plain-text seed passwords) must match exactly.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    if stored.starts_with("$argon2") {
        if let Ok(parsed) = PasswordHash::new(stored) {
            return Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok();
        }
    }
    stored == candidate
}
