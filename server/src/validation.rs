use shared::types::ValidationErrors;

pub const BOARD_NAME_MAX: usize = 35;
pub const TITLE_MAX: usize = 50;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Collect every username and password problem at once.
pub fn validate_credentials(username: &str, password: &str) -> ValidationErrors {
    ValidationErrors {
        username: validate_username(username),
        password: validate_password(password),
    }
}

pub fn validate_username(username: &str) -> Vec<String> {
    if username.is_empty() {
        return vec!["Username cannot be empty.".to_string()];
    }

    let mut errs = Vec::new();
    let len = username.chars().count();
    if !(5..=15).contains(&len) {
        errs.push("Username must be between 5 and 15 characters long.".to_string());
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        errs.push("Username can contain only letters (a-z/A-Z) and digits (0-9).".to_string());
    }
    if !username.starts_with(|c: char| c.is_ascii_alphabetic()) {
        errs.push("Username can start only with a letter (a-z/A-Z).".to_string());
    }
    errs
}

pub fn validate_password(password: &str) -> Vec<String> {
    if password.is_empty() {
        return vec!["Password cannot be empty.".to_string()];
    }

    let mut errs = Vec::new();
    let len = password.chars().count();
    if !(8..=64).contains(&len) {
        errs.push("Password must be between 8 and 64 characters long.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errs.push("Password must contain a lowercase letter (a-z).".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errs.push("Password must contain an uppercase letter (A-Z).".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errs.push("Password must contain a digit (0-9).".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        errs.push("Password must contain a symbol.".to_string());
    }
    if password.contains(' ') {
        errs.push("Password cannot contain spaces.".to_string());
    }
    if !password.is_ascii() {
        errs.push(
            "Password can contain only letters (a-z/A-Z), digits (0-9), and symbols.".to_string(),
        );
    }
    errs
}

// ---------------------------------------------------------------------------
// Board / task text
// ---------------------------------------------------------------------------

pub fn validate_board_name(name: &str) -> Result<(), String> {
    bounded_text("Board name", name, BOARD_NAME_MAX)
}

pub fn validate_task_title(title: &str) -> Result<(), String> {
    bounded_text("Task title", title, TITLE_MAX)
}

pub fn validate_subtask_title(title: &str) -> Result<(), String> {
    bounded_text("Subtask title", title, TITLE_MAX)
}

fn bounded_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty.", field));
    }
    if value.chars().count() > max {
        return Err(format!(
            "{} cannot be longer than {} characters.",
            field, max
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_credentials_pass() {
        assert!(!validate_credentials("alice01", "Str0ng!pass").any());
    }

    #[test]
    fn empty_username_reports_only_emptiness() {
        assert_eq!(validate_username(""), vec!["Username cannot be empty."]);
    }

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("bob").len(), 1);
        assert!(
            validate_username("1alice")
                .iter()
                .any(|m| m.contains("start only with a letter"))
        );
        assert!(
            validate_username("ali_ce")
                .iter()
                .any(|m| m.contains("only letters"))
        );
        assert_eq!(validate_username("a234567890123456").len(), 1);
    }

    #[test]
    fn password_rules() {
        assert_eq!(validate_password(""), vec!["Password cannot be empty."]);
        assert_eq!(validate_password("alllowercase1!").len(), 1);
        assert!(
            validate_password("No Spaces1!")
                .iter()
                .any(|m| m.contains("spaces"))
        );
        assert!(
            validate_password("Ünicode1!x")
                .iter()
                .any(|m| m.contains("only letters"))
        );
        assert_eq!(validate_password("Sh0rt!").len(), 1);
    }

    #[test]
    fn board_name_bounds() {
        assert_eq!(
            validate_board_name("").unwrap_err(),
            "Board name cannot be empty."
        );
        assert_eq!(
            validate_board_name("A Board Whose Name Is Just Too Long!").unwrap_err(),
            "Board name cannot be longer than 35 characters."
        );
        assert!(validate_board_name("Roadmap").is_ok());
    }

    #[test]
    fn title_bounds() {
        assert_eq!(
            validate_task_title("   ").unwrap_err(),
            "Task title cannot be empty."
        );
        assert_eq!(
            validate_subtask_title(&"x".repeat(51)).unwrap_err(),
            "Subtask title cannot be longer than 50 characters."
        );
        assert!(validate_task_title(&"x".repeat(50)).is_ok());
    }
}
