//! Credential gate contract.
//!
//! Storage and registration live outside the engine. The engine only needs
//! a verified, stable [`Identity`] to seat a player.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::player::PlayerId;

/// A verified player identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Stable player id.
    pub id: PlayerId,
    /// Display name shown to other players.
    pub name: String,
}

impl Identity {
    /// Creates an identity.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Validates login/credential pairs against a persisted store.
pub trait Authenticator: Send + Sync {
    /// Returns the identity behind `login` if `credential` matches.
    fn authenticate(&self, login: &str, credential: &str) -> Option<Identity>;
}

/// Runs the gate and turns a rejection into an error.
///
/// # Errors
///
/// Returns [`AuthError::InvalidCredentials`] if the pair is rejected.
pub fn authenticate(
    gate: &dyn Authenticator,
    login: &str,
    credential: &str,
) -> Result<Identity, AuthError> {
    if let Some(identity) = gate.authenticate(login, credential) {
        debug!(player = %identity.id, "credentials accepted");
        Ok(identity)
    } else {
        warn!(login, "credentials rejected");
        Err(AuthError::InvalidCredentials)
    }
}
