use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix timestamp in seconds.
pub fn get_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Fresh identifier for a team, board, column, task or subtask.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Column order after a move: `listed` first, then the column's `current`
/// tasks that were not listed, in their existing order.
pub fn arrange_column(listed: &[String], current: &[String]) -> Vec<String> {
    let moved: HashSet<&str> = listed.iter().map(String::as_str).collect();
    listed
        .iter()
        .cloned()
        .chain(
            current
                .iter()
                .filter(|id| !moved.contains(id.as_str()))
                .cloned(),
        )
        .collect()
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString},
    };
    use rand::rngs::OsRng;

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))
}

/// Verify a password against its stored hash.
pub fn verify_password(hash: &str, password: &str) -> anyhow::Result<bool> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
