use serde::{Deserialize, Serialize};

/// Standard error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Field-level validation body: `{"validationErrors": {"field": ["..."]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(rename = "validationErrors")]
    pub validation_errors: ValidationErrors,
}

/// Per-field messages collected while validating credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub username: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub password: Vec<String>,
}

impl ValidationErrors {
    pub fn any(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }

    pub fn username_taken() -> Self {
        Self {
            username: vec!["Username is already taken.".to_string()],
            password: Vec::new(),
        }
    }
}
