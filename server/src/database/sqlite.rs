use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::database::records::{BoardRecord, ColumnRecord, SubtaskRecord, TaskRecord, UserRecord};
use crate::database::store::{Store, StoreError};
use crate::database::utils::{arrange_column, get_timestamp};

/// [`Store`] over a pooled SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn expect_one(rows: u64) -> Result<(), StoreError> {
    if rows == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

async fn insert_subtasks(
    tx: &mut Transaction<'_, Sqlite>,
    subtasks: &[SubtaskRecord],
) -> Result<(), StoreError> {
    for subtask in subtasks {
        sqlx::query(
            "INSERT INTO subtask (id, task_id, title, position, done) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&subtask.id)
        .bind(&subtask.task_id)
        .bind(&subtask.title)
        .bind(subtask.position)
        .bind(subtask.done)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn column_task_ids(
    tx: &mut Transaction<'_, Sqlite>,
    column_id: &str,
) -> Result<Vec<String>, StoreError> {
    let ids = sqlx::query_scalar("SELECT id FROM task WHERE column_id = ? ORDER BY position, rowid")
        .bind(column_id)
        .fetch_all(&mut **tx)
        .await?;
    Ok(ids)
}

async fn place_tasks(
    tx: &mut Transaction<'_, Sqlite>,
    column_id: &str,
    task_ids: &[String],
) -> Result<(), StoreError> {
    for (position, task_id) in task_ids.iter().enumerate() {
        sqlx::query("UPDATE task SET column_id = ?, position = ? WHERE id = ?")
            .bind(column_id)
            .bind(position as i64)
            .bind(task_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    // ── Users and teams ────────────────────────────────────────────────────

    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT OR IGNORE INTO team (id) VALUES (?)")
            .bind(&user.team_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO app_user (username, password_hash, team_id, is_admin, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.team_id)
        .bind(user.is_admin)
        .bind(get_timestamp())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Inserted user {} into team {}", user.username, user.team_id);
        Ok(())
    }

    async fn select_user(&self, username: &str) -> Result<UserRecord, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT username, password_hash, team_id, is_admin FROM app_user WHERE username = ?",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn retrieve_users_by_team(&self, team_id: &str) -> Result<Vec<UserRecord>, StoreError> {
        let users = sqlx::query_as::<_, UserRecord>(
            "SELECT username, password_hash, team_id, is_admin FROM app_user
             WHERE team_id = ? ORDER BY created_at, rowid",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn delete_user(&self, username: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM app_user WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected())?;
        debug!("Deleted user {}", username);
        Ok(())
    }

    // ── Boards ─────────────────────────────────────────────────────────────

    async fn insert_board(
        &self,
        board: &BoardRecord,
        columns: &[ColumnRecord],
        max_boards: usize,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Count and insert in one statement so concurrent creates cannot
        // both slip under the cap.
        let result = sqlx::query(
            "INSERT INTO board (id, name, team_id)
             SELECT ?, ?, ?
             WHERE (SELECT COUNT(*) FROM board WHERE team_id = ?) < ?",
        )
        .bind(&board.id)
        .bind(&board.name)
        .bind(&board.team_id)
        .bind(&board.team_id)
        .bind(i64::try_from(max_boards).unwrap_or(i64::MAX))
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::LimitReached);
        }

        for column in columns {
            sqlx::query("INSERT INTO board_column (id, board_id, position) VALUES (?, ?, ?)")
                .bind(&column.id)
                .bind(&column.board_id)
                .bind(column.position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn select_board(&self, id: &str) -> Result<BoardRecord, StoreError> {
        let board =
            sqlx::query_as::<_, BoardRecord>("SELECT id, name, team_id FROM board WHERE id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(board)
    }

    async fn update_board(&self, board: &BoardRecord) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE board SET name = ? WHERE id = ?")
            .bind(&board.name)
            .bind(&board.id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected())
    }

    async fn delete_board(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM subtask WHERE task_id IN (
                SELECT task.id FROM task
                JOIN board_column ON board_column.id = task.column_id
                WHERE board_column.board_id = ?
            )",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM task WHERE column_id IN (
                SELECT id FROM board_column WHERE board_id = ?
            )",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM board_column WHERE board_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM board WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        expect_one(result.rows_affected())?;

        tx.commit().await?;
        debug!("Deleted board {} with its columns, tasks and subtasks", id);
        Ok(())
    }

    async fn retrieve_boards_by_team(
        &self,
        team_id: &str,
    ) -> Result<Vec<BoardRecord>, StoreError> {
        let boards = sqlx::query_as::<_, BoardRecord>(
            "SELECT id, name, team_id FROM board WHERE team_id = ? ORDER BY rowid",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(boards)
    }

    // ── Columns ────────────────────────────────────────────────────────────

    async fn select_column(&self, id: &str) -> Result<ColumnRecord, StoreError> {
        let column = sqlx::query_as::<_, ColumnRecord>(
            "SELECT id, board_id, position FROM board_column WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(column)
    }

    async fn retrieve_columns_by_board(
        &self,
        board_id: &str,
    ) -> Result<Vec<ColumnRecord>, StoreError> {
        let columns = sqlx::query_as::<_, ColumnRecord>(
            "SELECT id, board_id, position FROM board_column
             WHERE board_id = ? ORDER BY position, rowid",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(columns)
    }

    async fn reorder_columns(
        &self,
        board_id: &str,
        column_ids: &[String],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for (position, column_id) in column_ids.iter().enumerate() {
            let result =
                sqlx::query("UPDATE board_column SET position = ? WHERE id = ? AND board_id = ?")
                    .bind(position as i64)
                    .bind(column_id)
                    .bind(board_id)
                    .execute(&mut *tx)
                    .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::Conflict(format!(
                    "column {} is not on board {}",
                    column_id, board_id
                )));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    // ── Tasks ──────────────────────────────────────────────────────────────

    async fn insert_task(
        &self,
        task: &TaskRecord,
        subtasks: &[SubtaskRecord],
    ) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM task WHERE column_id = ?",
        )
        .bind(&task.column_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO task (id, column_id, title, description, position)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&task.id)
        .bind(&task.column_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        insert_subtasks(&mut tx, subtasks).await?;

        tx.commit().await?;
        Ok(position)
    }

    async fn select_task(&self, id: &str) -> Result<TaskRecord, StoreError> {
        let task = sqlx::query_as::<_, TaskRecord>(
            "SELECT id, column_id, title, description, position FROM task WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        task: &TaskRecord,
        subtasks: &[SubtaskRecord],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE task SET title = ?, description = ? WHERE id = ?")
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.id)
            .execute(&mut *tx)
            .await?;
        expect_one(result.rows_affected())?;

        sqlx::query("DELETE FROM subtask WHERE task_id = ?")
            .bind(&task.id)
            .execute(&mut *tx)
            .await?;

        insert_subtasks(&mut tx, subtasks).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let task = sqlx::query_as::<_, TaskRecord>(
            "SELECT id, column_id, title, description, position FROM task WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM subtask WHERE task_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM task WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let remaining: Vec<String> =
            sqlx::query_scalar("SELECT id FROM task WHERE column_id = ? ORDER BY position, rowid")
                .bind(&task.column_id)
                .fetch_all(&mut *tx)
                .await?;

        for (position, task_id) in remaining.iter().enumerate() {
            sqlx::query("UPDATE task SET position = ? WHERE id = ?")
                .bind(position as i64)
                .bind(task_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn retrieve_tasks_by_column(
        &self,
        column_id: &str,
    ) -> Result<Vec<TaskRecord>, StoreError> {
        let tasks = sqlx::query_as::<_, TaskRecord>(
            "SELECT id, column_id, title, description, position FROM task
             WHERE column_id = ? ORDER BY position, rowid",
        )
        .bind(column_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn move_tasks(&self, column_id: &str, task_ids: &[String]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Take the write lock before reading positions; a concurrent insert
        // into any of these columns then lands before or after the whole move.
        let result = sqlx::query("UPDATE board_column SET position = position WHERE id = ?")
            .bind(column_id)
            .execute(&mut *tx)
            .await?;
        expect_one(result.rows_affected())?;

        let mut sources: Vec<String> = Vec::new();
        for task_id in task_ids {
            let source: String = sqlx::query_scalar("SELECT column_id FROM task WHERE id = ?")
                .bind(task_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| StoreError::Conflict(format!("task {} vanished", task_id)))?;
            if source != column_id && !sources.contains(&source) {
                sources.push(source);
            }
        }

        let current = column_task_ids(&mut tx, column_id).await?;
        place_tasks(&mut tx, column_id, &arrange_column(task_ids, &current)).await?;

        for source in &sources {
            let remaining = column_task_ids(&mut tx, source).await?;
            place_tasks(&mut tx, source, &remaining).await?;
        }

        tx.commit().await?;
        debug!(
            "Moved {} task(s) into column {}, renumbered {} source column(s)",
            task_ids.len(),
            column_id,
            sources.len()
        );
        Ok(())
    }

    // ── Subtasks ───────────────────────────────────────────────────────────

    async fn select_subtask(&self, id: &str) -> Result<SubtaskRecord, StoreError> {
        let subtask = sqlx::query_as::<_, SubtaskRecord>(
            "SELECT id, task_id, title, position, done FROM subtask WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(subtask)
    }

    async fn update_subtask(&self, subtask: &SubtaskRecord) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE subtask SET title = ?, position = ?, done = ? WHERE id = ?")
            .bind(&subtask.title)
            .bind(subtask.position)
            .bind(subtask.done)
            .bind(&subtask.id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected())
    }

    async fn retrieve_subtasks_by_task(
        &self,
        task_id: &str,
    ) -> Result<Vec<SubtaskRecord>, StoreError> {
        let subtasks = sqlx::query_as::<_, SubtaskRecord>(
            "SELECT id, task_id, title, position, done FROM subtask
             WHERE task_id = ? ORDER BY position, rowid",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(subtasks)
    }
}
