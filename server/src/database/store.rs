use async_trait::async_trait;
use thiserror::Error;

use crate::database::records::{BoardRecord, ColumnRecord, SubtaskRecord, TaskRecord, UserRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate key")]
    DuplicateKey,

    /// A capped insert found the cap already reached.
    #[error("limit reached")]
    LimitReached,

    /// A multi-row write found the rows in a different shape than it was
    /// given; the whole write was rolled back.
    #[error("conflicting write: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateKey,
            other => StoreError::Database(other),
        }
    }
}

/// Persistence seam for the coordinators.
///
/// Every method that touches more than one row is atomic: it either applies
/// completely or leaves no trace. Sequences come back in store order
/// (`position` ascending, creation order for boards and users).
#[async_trait]
pub trait Store: Send + Sync {
    // ── Users and teams ────────────────────────────────────────────────────

    /// Creates the user's team row when it does not exist yet.
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError>;
    async fn select_user(&self, username: &str) -> Result<UserRecord, StoreError>;
    async fn retrieve_users_by_team(&self, team_id: &str) -> Result<Vec<UserRecord>, StoreError>;
    async fn delete_user(&self, username: &str) -> Result<(), StoreError>;

    // ── Boards ─────────────────────────────────────────────────────────────

    /// Inserts the board together with its columns, unless the team already
    /// has `max_boards` boards (`LimitReached`). Count and insert are one
    /// atomic step.
    async fn insert_board(
        &self,
        board: &BoardRecord,
        columns: &[ColumnRecord],
        max_boards: usize,
    ) -> Result<(), StoreError>;
    async fn select_board(&self, id: &str) -> Result<BoardRecord, StoreError>;
    async fn update_board(&self, board: &BoardRecord) -> Result<(), StoreError>;
    /// Removes the board, its columns, their tasks and those tasks' subtasks.
    async fn delete_board(&self, id: &str) -> Result<(), StoreError>;
    async fn retrieve_boards_by_team(&self, team_id: &str)
    -> Result<Vec<BoardRecord>, StoreError>;

    // ── Columns ────────────────────────────────────────────────────────────

    async fn select_column(&self, id: &str) -> Result<ColumnRecord, StoreError>;
    async fn retrieve_columns_by_board(
        &self,
        board_id: &str,
    ) -> Result<Vec<ColumnRecord>, StoreError>;
    /// Sets column positions to the index of each ID in `column_ids`.
    async fn reorder_columns(&self, board_id: &str, column_ids: &[String])
    -> Result<(), StoreError>;

    // ── Tasks ──────────────────────────────────────────────────────────────

    /// Appends the task at the end of its column; `task.position` is ignored
    /// and the assigned position is returned.
    async fn insert_task(
        &self,
        task: &TaskRecord,
        subtasks: &[SubtaskRecord],
    ) -> Result<i64, StoreError>;
    async fn select_task(&self, id: &str) -> Result<TaskRecord, StoreError>;
    /// Rewrites title and description and replaces the subtask list.
    async fn update_task(
        &self,
        task: &TaskRecord,
        subtasks: &[SubtaskRecord],
    ) -> Result<(), StoreError>;
    /// Removes the task with its subtasks and closes the gap it leaves in
    /// its column.
    async fn delete_task(&self, id: &str) -> Result<(), StoreError>;
    async fn retrieve_tasks_by_column(
        &self,
        column_id: &str,
    ) -> Result<Vec<TaskRecord>, StoreError>;
    /// Puts `task_ids` at the head of the column in the given order, followed
    /// by the column's other tasks in their current order, and closes the
    /// gaps in every column the listed tasks left. Current positions are read
    /// inside the same transaction as the writes.
    async fn move_tasks(&self, column_id: &str, task_ids: &[String]) -> Result<(), StoreError>;

    // ── Subtasks ───────────────────────────────────────────────────────────

    async fn select_subtask(&self, id: &str) -> Result<SubtaskRecord, StoreError>;
    async fn update_subtask(&self, subtask: &SubtaskRecord) -> Result<(), StoreError>;
    async fn retrieve_subtasks_by_task(
        &self,
        task_id: &str,
    ) -> Result<Vec<SubtaskRecord>, StoreError>;
}
