use tracing::info;

use shared::types::SubtaskDoneData;

use crate::authz::{require_admin, require_board_access};
use crate::coordinator::stage::{Stage, Trace};
use crate::coordinator::{Coordinator, OrNotFound, Outcome, Rejection, parse_body, require_id};
use crate::database::Store;
use crate::snapshot::locate_task;
use crate::token::Credentials;

impl<S: Store> Coordinator<S> {
    /// PATCH /subtask. Subtasks are not part of the snapshot, so the row is
    /// read first and its parent task is what must be visible.
    pub async fn update_subtask(
        &self,
        creds: &Credentials,
        id: Option<&str>,
        body: &[u8],
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("subtask.update");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can edit subtasks.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::AwaitBody);
        let data: SubtaskDoneData = parse_body(body)?;

        trace.enter(Stage::Resolving);
        let id = require_id(id, "Subtask")?;
        let mut subtask = self
            .store
            .select_subtask(id)
            .await
            .or_not_found("Subtask not found.")?;
        locate_task(&state, &subtask.task_id)
            .ok_or_else(|| Rejection::bad_request("Invalid subtask ID."))?;
        let task = self.store.select_task(&subtask.task_id).await?;
        let column = self.store.select_column(&task.column_id).await?;
        let board = self.store.select_board(&column.board_id).await?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &board.team_id)?;

        trace.enter(Stage::Mutating);
        subtask.done = data.done;
        self.store
            .update_subtask(&subtask)
            .await
            .or_not_found("Subtask not found.")?;
        info!(
            "{} marked subtask {} done={}",
            auth.username, subtask.id, subtask.done
        );

        trace.enter(Stage::Done);
        Ok(Outcome::new(()))
    }
}
