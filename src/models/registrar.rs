use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FabricError;
use crate::log::mask_string;

/// Enrollment credentials for a registrar.
///
/// The secret is consumed once by the peer during enrollment. `Debug` output
/// masks it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    enroll_id: String,
    enroll_secret: String,
}

impl Credential {
    pub fn new(enroll_id: impl Into<String>, enroll_secret: impl Into<String>) -> Self {
        Self {
            enroll_id: enroll_id.into(),
            enroll_secret: enroll_secret.into(),
        }
    }

    pub fn enroll_id(&self) -> &str {
        &self.enroll_id
    }

    pub fn enroll_secret(&self) -> &str {
        &self.enroll_secret
    }

    /// Structural check only; whether the secret is correct is up to the peer.
    pub fn validate(&self) -> Result<(), FabricError> {
        if self.enroll_id.trim().is_empty() {
            return Err(FabricError::validation("enroll id is required"));
        }
        if self.enroll_secret.is_empty() {
            return Err(FabricError::validation("enroll secret is required"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("enroll_id", &self.enroll_id)
            .field("enroll_secret", &mask_string(&self.enroll_secret))
            .finish()
    }
}
