use tracing::info;

use shared::types::{CreateTaskData, CreatedResponse, State, UpdateTaskData};

use crate::authz::{require_admin, require_board_access};
use crate::coordinator::stage::{Stage, Trace};
use crate::coordinator::{Coordinator, OrNotFound, Outcome, Rejection, parse_body, require_id};
use crate::database::utils::new_id;
use crate::database::{Store, SubtaskRecord, TaskRecord};
use crate::snapshot::{locate_column, locate_task};
use crate::token::Credentials;
use crate::validation::{validate_subtask_title, validate_task_title};

impl<S: Store> Coordinator<S> {
    /// POST /task. Appends a task with its subtasks to a column.
    pub async fn create_task(
        &self,
        creds: &Credentials,
        body: &[u8],
    ) -> Result<Outcome<CreatedResponse>, Rejection> {
        let trace = Trace::new("task.create");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can create tasks.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::AwaitBody);
        let data: CreateTaskData = parse_body(body)?;
        validate_task_title(&data.title).map_err(Rejection::BadRequest)?;
        for title in &data.subtasks {
            validate_subtask_title(title).map_err(Rejection::BadRequest)?;
        }

        trace.enter(Stage::Resolving);
        let column_id = require_id(Some(data.column_id.as_str()), "Column")?;
        locate_column(&state, column_id)
            .ok_or_else(|| Rejection::bad_request("Invalid column ID."))?;
        let column = self
            .store
            .select_column(column_id)
            .await
            .or_not_found("Column not found.")?;
        let board = self.store.select_board(&column.board_id).await?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &board.team_id)?;

        trace.enter(Stage::Mutating);
        let task = TaskRecord {
            id: new_id(),
            column_id: column.id.clone(),
            title: data.title.trim().to_string(),
            description: data.description,
            position: 0,
        };
        let subtasks: Vec<SubtaskRecord> = data
            .subtasks
            .iter()
            .enumerate()
            .map(|(i, title)| SubtaskRecord {
                id: new_id(),
                task_id: task.id.clone(),
                title: title.trim().to_string(),
                position: i as i64,
                done: false,
            })
            .collect();
        let position = self.store.insert_task(&task, &subtasks).await?;
        info!(
            "{} created task {} at position {} of column {}",
            auth.username, task.id, position, column.id
        );

        let state_cookie = self.reissue_state(&auth.team_id, trace).await;

        trace.enter(Stage::Done);
        Ok(Outcome::new(CreatedResponse { id: task.id }).with_optional_cookie(state_cookie))
    }

    /// PATCH /task. Rewrites the task text and replaces its subtasks.
    pub async fn update_task(
        &self,
        creds: &Credentials,
        id: Option<&str>,
        body: &[u8],
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("task.update");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can edit tasks.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::AwaitBody);
        let data: UpdateTaskData = parse_body(body)?;
        validate_task_title(&data.title).map_err(Rejection::BadRequest)?;
        for subtask in &data.subtasks {
            validate_subtask_title(&subtask.title).map_err(Rejection::BadRequest)?;
        }

        trace.enter(Stage::Resolving);
        let (task, team_id) = self.resolve_task(&state, id).await?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &team_id)?;

        trace.enter(Stage::Mutating);
        let updated = TaskRecord {
            title: data.title.trim().to_string(),
            description: data.description,
            ..task
        };
        let mut subtasks = data.subtasks;
        subtasks.sort_by_key(|s| s.order);
        let subtasks: Vec<SubtaskRecord> = subtasks
            .into_iter()
            .enumerate()
            .map(|(i, s)| SubtaskRecord {
                id: new_id(),
                task_id: updated.id.clone(),
                title: s.title.trim().to_string(),
                position: i as i64,
                done: s.done,
            })
            .collect();
        self.store
            .update_task(&updated, &subtasks)
            .await
            .or_not_found("Task not found.")?;
        info!("{} edited task {}", auth.username, updated.id);

        trace.enter(Stage::Done);
        Ok(Outcome::new(()))
    }

    /// DELETE /task. Removes the task and closes the gap in its column.
    pub async fn delete_task(
        &self,
        creds: &Credentials,
        id: Option<&str>,
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("task.delete");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can delete tasks.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::Resolving);
        let (task, team_id) = self.resolve_task(&state, id).await?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &team_id)?;

        trace.enter(Stage::Mutating);
        self.store
            .delete_task(&task.id)
            .await
            .or_not_found("Task not found.")?;
        info!("{} deleted task {}", auth.username, task.id);

        let state_cookie = self.reissue_state(&auth.team_id, trace).await;

        trace.enter(Stage::Done);
        Ok(Outcome::new(()).with_optional_cookie(state_cookie))
    }

    /// Snapshot check, then the task row and the team owning its board. A
    /// missing task is the caller's problem; a missing column or board under
    /// an existing task is a fault.
    async fn resolve_task(
        &self,
        state: &State,
        id: Option<&str>,
    ) -> Result<(TaskRecord, String), Rejection> {
        let id = require_id(id, "Task")?;
        locate_task(state, id).ok_or_else(|| Rejection::bad_request("Invalid task ID."))?;

        let task = self
            .store
            .select_task(id)
            .await
            .or_not_found("Task not found.")?;
        let column = self.store.select_column(&task.column_id).await?;
        let board = self.store.select_board(&column.board_id).await?;

        Ok((task, board.team_id))
    }
}
