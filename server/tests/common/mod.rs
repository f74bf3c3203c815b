#![allow(dead_code)]

use serde::Serialize;
use serde_json::json;

use shared::types::{ActiveBoard, DatabaseConfig, State};
use taskboard::coordinator::{Coordinator, Outcome, Policy};
use taskboard::database::{self, SqliteStore, Store};
use taskboard::token::{Credentials, TokenCodec, TokenKind};

pub const SECRET: &[u8] = b"integration-secret-0123456789abcdef";
pub const PASSWORD: &str = "Passw0rd!";

pub type TestCoordinator = Coordinator<SqliteStore>;

/// A fresh coordinator over its own in-memory database. One pooled
/// connection, so every query sees the same database.
pub async fn coordinator() -> TestCoordinator {
    Coordinator::new(sqlite_store().await, TokenCodec::new(SECRET), Policy::default())
}

/// A store over its own in-memory database.
pub async fn sqlite_store() -> SqliteStore {
    let pool = database::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        acquire_timeout_secs: 5,
    })
    .await
    .expect("in-memory database");
    SqliteStore::new(pool)
}

pub fn body<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("serializable body")
}

pub fn credentials_body(username: &str, password: &str) -> Vec<u8> {
    body(&json!({ "username": username, "password": password }))
}

/// What a browser would send after applying the outcome's `Set-Cookie`s on
/// top of `previous`.
pub fn apply_cookies<T>(previous: &Credentials, outcome: &Outcome<T>) -> Credentials {
    let mut next = previous.clone();
    for cookie in &outcome.cookies {
        let value = (!cookie.is_clear()).then(|| cookie.value.clone());
        match cookie.name {
            n if n == TokenKind::Auth.cookie_name() => next.auth = value,
            n if n == TokenKind::State.cookie_name() => next.state = value,
            n if n == TokenKind::Invite.cookie_name() => next.invite = value,
            _ => {}
        }
    }
    next
}

pub fn decode_state<S: Store>(coord: &Coordinator<S>, creds: &Credentials) -> State {
    let raw = creds.state.as_deref().expect("state cookie present");
    coord.codec().decode(raw).expect("state token decodes")
}

/// Register `username`, optionally through an invite token.
pub async fn register<S: Store>(
    coord: &Coordinator<S>,
    username: &str,
    invite: Option<String>,
) -> Credentials {
    let creds = Credentials {
        invite,
        ..Credentials::default()
    };
    let outcome = coord
        .register(&creds, &credentials_body(username, PASSWORD))
        .await
        .expect("registration succeeds");
    apply_cookies(&creds, &outcome)
}

/// Fetch the board view and pick up the fresh State cookie.
pub async fn fetch_boards<S: Store>(
    coord: &Coordinator<S>,
    creds: &Credentials,
    id: Option<&str>,
) -> (Credentials, Option<ActiveBoard>) {
    let outcome = coord.boards(creds, id).await.expect("board fetch succeeds");
    let creds = apply_cookies(creds, &outcome);
    (creds, outcome.body.active_board)
}

/// A new admin whose team owns the default board.
pub async fn admin_with_board<S: Store>(coord: &Coordinator<S>, username: &str) -> (Credentials, ActiveBoard) {
    let creds = register(coord, username, None).await;
    let (creds, board) = fetch_boards(coord, &creds, None).await;
    (creds, board.expect("default board created"))
}

/// A member invited into the team of `admin`.
pub async fn invited_member<S: Store>(
    coord: &Coordinator<S>,
    admin: &Credentials,
    username: &str,
) -> Credentials {
    let invite = coord.invite(admin).expect("admin may invite").body.invite_token;
    let joined = coord.join(Some(invite.as_str())).expect("invite accepted");
    let creds = apply_cookies(&Credentials::default(), &joined);
    let outcome = coord
        .register(&creds, &credentials_body(username, PASSWORD))
        .await
        .expect("invited registration succeeds");
    apply_cookies(&creds, &outcome)
}

/// Create a task and return its id plus the credentials carrying the
/// re-issued State.
pub async fn create_task<S: Store>(
    coord: &Coordinator<S>,
    creds: &Credentials,
    column_id: &str,
    title: &str,
    subtasks: &[&str],
) -> (Credentials, String) {
    let outcome = coord
        .create_task(
            creds,
            &body(&json!({
                "columnID": column_id,
                "title": title,
                "description": "",
                "subtasks": subtasks,
            })),
        )
        .await
        .expect("task created");
    (apply_cookies(creds, &outcome), outcome.body.id)
}
