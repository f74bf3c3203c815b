/// Wire-format and configuration tests for the `shared` crate.
///
/// Field names here are a contract with the browser client, so most tests
/// assert on the raw JSON keys rather than on round-trips.
// ---------------------------------------------------------------------------
// Token payloads
// ---------------------------------------------------------------------------
#[cfg(test)]
mod token_tests {
    use shared::types::*;

    fn sample_state() -> State {
        State::new(vec![BoardView {
            id: "b1".to_string(),
            columns: vec![
                ColumnView {
                    id: "c1".to_string(),
                    tasks: vec![
                        TaskView {
                            id: "t1".to_string(),
                        },
                        TaskView {
                            id: "t2".to_string(),
                        },
                    ],
                },
                ColumnView {
                    id: "c2".to_string(),
                    tasks: vec![],
                },
            ],
        }])
    }

    #[test]
    fn auth_uses_camel_case_keys() {
        let json = serde_json::to_value(Auth::new("alice", true, "team-1")).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["teamID"], "team-1");
        assert!(json.get("is_admin").is_none());
    }

    #[test]
    fn auth_parses_from_client_shape() {
        let auth: Auth =
            serde_json::from_str(r#"{"username":"bob","isAdmin":false,"teamID":"t"}"#).unwrap();
        assert_eq!(auth, Auth::new("bob", false, "t"));
    }

    #[test]
    fn state_keeps_nesting_and_order() {
        let json = serde_json::to_value(sample_state()).unwrap();
        assert_eq!(json["boards"][0]["id"], "b1");
        assert_eq!(json["boards"][0]["columns"][1]["id"], "c2");
        assert_eq!(json["boards"][0]["columns"][0]["tasks"][1]["id"], "t2");
    }

    #[test]
    fn task_count_sums_every_column() {
        assert_eq!(sample_state().task_count(), 2);
        assert_eq!(State::default().task_count(), 0);
    }

    #[test]
    fn invite_serializes_team_id() {
        let json = serde_json::to_value(Invite::new("team-9")).unwrap();
        assert_eq!(json, serde_json::json!({ "teamID": "team-9" }));
    }
}

// ---------------------------------------------------------------------------
// Error bodies
// ---------------------------------------------------------------------------
#[cfg(test)]
mod json_error_tests {
    use shared::types::*;

    #[test]
    fn error_response_shape() {
        let json = serde_json::to_value(ErrorResponse::new("Invalid task ID.")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid task ID." }));
    }

    #[test]
    fn validation_response_skips_empty_fields() {
        let body = ValidationResponse {
            validation_errors: ValidationErrors::username_taken(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "validationErrors": { "username": ["Username is already taken."] }
            })
        );
    }

    #[test]
    fn any_reports_non_empty() {
        assert!(!ValidationErrors::default().any());
        let errs = ValidationErrors {
            username: vec![],
            password: vec!["Password cannot be empty.".to_string()],
        };
        assert!(errs.any());
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------
#[cfg(test)]
mod credential_tests {
    use shared::types::*;

    #[test]
    fn login_debug_redacts_password() {
        let data = LoginData {
            username: "alice".to_string(),
            password: "Sup3r$ecret".to_string(),
        };
        let dbg = format!("{:?}", data);
        assert!(dbg.contains("alice"));
        assert!(!dbg.contains("Sup3r$ecret"));
    }

    #[test]
    fn registration_debug_redacts_password() {
        let data = RegistrationData {
            username: "alice".to_string(),
            password: "Sup3r$ecret".to_string(),
        };
        assert!(!format!("{:?}", data).contains("Sup3r$ecret"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let data: RegistrationData = serde_json::from_str("{}").unwrap();
        assert!(data.username.is_empty());
        assert!(data.password.is_empty());
    }

    #[test]
    fn session_response_keys() {
        let json = serde_json::to_value(SessionResponse {
            username: "alice".to_string(),
            is_admin: true,
            team_id: "t1".to_string(),
        })
        .unwrap();
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["teamID"], "t1");
    }
}

// ---------------------------------------------------------------------------
// Board / task bodies
// ---------------------------------------------------------------------------
#[cfg(test)]
mod board_tests {
    use shared::types::*;

    #[test]
    fn create_task_reads_column_id_key() {
        let data: CreateTaskData = serde_json::from_str(
            r#"{"columnID":"c1","title":"Write docs","subtasks":["draft","review"]}"#,
        )
        .unwrap();
        assert_eq!(data.column_id, "c1");
        assert_eq!(data.description, "");
        assert_eq!(data.subtasks, vec!["draft", "review"]);
    }

    #[test]
    fn column_body_is_a_list_of_positions() {
        let body: Vec<TaskPosition> =
            serde_json::from_str(r#"[{"id":"t1","order":2},{"id":"t2","order":0}]"#).unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body[1].order, 0);
    }

    #[test]
    fn boards_response_uses_active_board_key() {
        let resp = BoardsResponse {
            boards: vec![BoardSummary {
                id: "b1".to_string(),
                name: "Roadmap".to_string(),
            }],
            active_board: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["activeBoard"].is_null());
        assert_eq!(json["boards"][0]["name"], "Roadmap");
    }

    #[test]
    fn invite_response_key() {
        let json = serde_json::to_value(InviteResponse {
            invite_token: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(json["inviteToken"], "abc");
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------
#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use shared::config::{load_config, parse_config};
    use shared::types::server_config::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn full_toml(secret: &str) -> String {
        format!(
            r#"
[server]
bind = "0.0.0.0"
port = 9000
max_connections = 50
allowed_origin = "https://boards.example.com"

[database]
url = "sqlite::memory:"
max_connections = 1

[auth]
token_expiry_minutes = 30
invite_expiry_minutes = 120
max_boards_per_team = 5
jwt_secret = "{}"
"#,
            secret
        )
    }

    #[test]
    fn parses_every_section() {
        let cfg = parse_config(&full_toml(SECRET)).unwrap();
        assert_eq!(cfg.server.addr(), "0.0.0.0:9000");
        assert_eq!(cfg.server.allowed_origin, "https://boards.example.com");
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.database.acquire_timeout_secs, 5);
        assert_eq!(cfg.auth.token_expiry_secs(), Some(30 * 60));
        assert_eq!(cfg.auth.invite_expiry_secs(), Some(120 * 60));
        assert_eq!(cfg.auth.max_boards_per_team, 5);
    }

    #[test]
    fn server_and_database_sections_are_optional() {
        let cfg = parse_config(&format!("[auth]\njwt_secret = \"{}\"\n", SECRET)).unwrap();
        assert_eq!(cfg.server.port, default_port());
        assert_eq!(cfg.database.url, default_database_url());
        assert_eq!(cfg.auth.max_boards_per_team, 3);
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            parse_config("   \n"),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_expiry_is_rejected() {
        let text = full_toml(SECRET).replace("token_expiry_minutes = 30", "token_expiry_minutes = 0");
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn oversized_expiry_is_rejected() {
        let text = full_toml(SECRET).replace(
            "token_expiry_minutes = 30",
            "token_expiry_minutes = 200000000000",
        );
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::InvalidConfig(_))
        ));

        let text = full_toml(SECRET).replace(
            "invite_expiry_minutes = 120",
            &format!("invite_expiry_minutes = {}", MAX_EXPIRY_MINUTES + 1),
        );
        assert!(matches!(
            parse_config(&text),
            Err(ConfigError::InvalidConfig(_))
        ));

        let text = full_toml(SECRET).replace(
            "invite_expiry_minutes = 120",
            &format!("invite_expiry_minutes = {}", MAX_EXPIRY_MINUTES),
        );
        assert!(parse_config(&text).is_ok());
    }

    #[test]
    fn expiry_seconds_do_not_wrap() {
        let auth = AuthConfig {
            token_expiry_minutes: u64::MAX,
            invite_expiry_minutes: u64::MAX / 60,
            max_boards_per_team: 1,
            jwt_secret: None,
        };
        assert_eq!(auth.token_expiry_secs(), None);
        assert_eq!(auth.invite_expiry_secs(), None);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            parse_config("[auth\n"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn env_secret_takes_priority() {
        let auth = AuthConfig {
            token_expiry_minutes: 1,
            invite_expiry_minutes: 1,
            max_boards_per_team: 1,
            jwt_secret: Some("from-file".to_string()),
        };
        assert_eq!(
            auth.resolve_secret(Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            auth.resolve_secret(Some(String::new())).as_deref(),
            Some("from-file")
        );
        assert_eq!(auth.resolve_secret(None).as_deref(), Some("from-file"));
    }

    #[test]
    fn load_config_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(full_toml(SECRET).as_bytes()).unwrap();
        let cfg = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.max_connections, 50);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            load_config(path.to_str().unwrap()),
            Err(ConfigError::Io(_))
        ));
    }
}
