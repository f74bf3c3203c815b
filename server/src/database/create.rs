use sqlx::SqlitePool;
use tracing::info;

/// Current schema version, stamped into `PRAGMA user_version`.
const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS team (
        id TEXT PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS app_user (
        username      TEXT    PRIMARY KEY,
        password_hash TEXT    NOT NULL,
        team_id       TEXT    NOT NULL REFERENCES team(id),
        is_admin      INTEGER NOT NULL DEFAULT 0,
        created_at    INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS board (
        id      TEXT PRIMARY KEY,
        name    TEXT NOT NULL,
        team_id TEXT NOT NULL REFERENCES team(id)
    )",
    "CREATE TABLE IF NOT EXISTS board_column (
        id       TEXT    PRIMARY KEY,
        board_id TEXT    NOT NULL REFERENCES board(id),
        position INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS task (
        id          TEXT    PRIMARY KEY,
        column_id   TEXT    NOT NULL REFERENCES board_column(id),
        title       TEXT    NOT NULL,
        description TEXT    NOT NULL DEFAULT '',
        position    INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS subtask (
        id       TEXT    PRIMARY KEY,
        task_id  TEXT    NOT NULL REFERENCES task(id),
        title    TEXT    NOT NULL,
        position INTEGER NOT NULL,
        done     INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_app_user_team ON app_user(team_id)",
    "CREATE INDEX IF NOT EXISTS idx_board_team ON board(team_id)",
    "CREATE INDEX IF NOT EXISTS idx_column_board ON board_column(board_id)",
    "CREATE INDEX IF NOT EXISTS idx_task_column ON task(column_id)",
    "CREATE INDEX IF NOT EXISTS idx_subtask_task ON subtask(task_id)",
];

/// Create every table if missing and stamp the schema version.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    if version > SCHEMA_VERSION {
        info!(
            "Database schema v{} is newer than this build (v{})",
            version, SCHEMA_VERSION
        );
    }

    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    if version < SCHEMA_VERSION {
        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .execute(&mut *tx)
            .await?;
        info!("Database schema initialised at v{}", SCHEMA_VERSION);
    }
    tx.commit().await?;

    Ok(())
}
