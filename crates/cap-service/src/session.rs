//! Per-connection admin session.

use crate::{Result, ServiceError};

/// Authentication state for one client session.
///
/// Starts locked. Only [`Session::authenticate`] unlocks it; the flag is
/// never persisted.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Compare `secret` against the configured admin secret.
    ///
    /// An empty configured secret never matches, so a deployment without
    /// one has no write access at all. A failed attempt locks the session.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::AuthFailure`] on mismatch
    pub fn authenticate(&mut self, secret: &str, expected: &str) -> Result<()> {
        if expected.is_empty() || !secrets_match(secret.as_bytes(), expected.as_bytes()) {
            self.authenticated = false;
            tracing::warn!("admin authentication failed");
            return Err(ServiceError::AuthFailure);
        }
        self.authenticated = true;
        tracing::info!("admin session unlocked");
        Ok(())
    }

    pub fn lock(&mut self) {
        if self.authenticated {
            tracing::info!("admin session locked");
        }
        self.authenticated = false;
    }

    /// Gate for every write path.
    pub fn require_admin(&self) -> Result<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(ServiceError::AuthFailure)
        }
    }
}

/// Verbatim comparison whose running time does not depend on where the
/// inputs first differ.
fn secrets_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
