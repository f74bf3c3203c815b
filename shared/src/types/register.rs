use std::fmt;

use serde::{Deserialize, Serialize};

/// POST /register body.
#[derive(Clone, Deserialize, Serialize)]
pub struct RegistrationData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for RegistrationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationData")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
