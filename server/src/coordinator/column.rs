use std::collections::HashSet;

use tracing::info;

use shared::types::TaskPosition;

use crate::authz::{require_admin, require_board_access};
use crate::coordinator::stage::{Stage, Trace};
use crate::coordinator::{Coordinator, OrNotFound, Outcome, Rejection, parse_body, require_id};
use crate::database::Store;
use crate::snapshot::{locate_board, locate_column, locate_task};
use crate::token::Credentials;

pub const COLUMN_LIST_MISMATCH: &str =
    "Column list must contain every column of the board exactly once.";

/// Listed task IDs by ascending `order`; ties keep request order.
pub fn requested_order(listed: &[TaskPosition]) -> Vec<String> {
    let mut sorted: Vec<&TaskPosition> = listed.iter().collect();
    sorted.sort_by_key(|p| p.order);
    sorted.into_iter().map(|p| p.id.clone()).collect()
}

fn is_permutation(requested: &[String], actual: &[String]) -> bool {
    let requested_set: HashSet<&String> = requested.iter().collect();
    let actual_set: HashSet<&String> = actual.iter().collect();
    requested.len() == actual.len()
        && requested_set.len() == requested.len()
        && requested_set == actual_set
}

impl<S: Store> Coordinator<S> {
    /// PATCH /column. Places the listed tasks into the column and renumbers
    /// every column they touched.
    pub async fn move_tasks(
        &self,
        creds: &Credentials,
        column_id: Option<&str>,
        body: &[u8],
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("column.move_tasks");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can move tasks.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::AwaitBody);
        let positions: Vec<TaskPosition> = parse_body(body)?;

        trace.enter(Stage::Resolving);
        let column_id = require_id(column_id, "Column")?;
        let target = locate_column(&state, column_id)
            .ok_or_else(|| Rejection::bad_request("Invalid column ID."))?;

        let mut seen = HashSet::new();
        for position in &positions {
            let on_board = locate_task(&state, &position.id)
                .is_some_and(|loc| loc.board_id == target.board_id);
            if !on_board || !seen.insert(position.id.as_str()) {
                return Err(Rejection::bad_request("Invalid task ID."));
            }
        }

        let column = self
            .store
            .select_column(column_id)
            .await
            .or_not_found("Column not found.")?;
        let board = self.store.select_board(&column.board_id).await?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &board.team_id)?;

        // Every listed task must still sit on the target's board.
        let mut checked: Vec<String> = Vec::new();
        for position in &positions {
            let task = self
                .store
                .select_task(&position.id)
                .await
                .or_not_found("Task not found.")?;
            if task.column_id == column.id || checked.contains(&task.column_id) {
                continue;
            }
            let source = self.store.select_column(&task.column_id).await?;
            if source.board_id != column.board_id {
                return Err(Rejection::bad_request("Invalid task ID."));
            }
            checked.push(task.column_id);
        }

        trace.enter(Stage::Mutating);
        self.store
            .move_tasks(&column.id, &requested_order(&positions))
            .await?;
        info!(
            "{} moved {} task(s) into column {}",
            auth.username,
            positions.len(),
            column.id
        );

        let state_cookie = self.reissue_state(&auth.team_id, trace).await;

        trace.enter(Stage::Done);
        Ok(Outcome::new(()).with_optional_cookie(state_cookie))
    }

    /// PATCH /board/columns. `order` must list every column of the board once.
    pub async fn reorder_columns(
        &self,
        creds: &Credentials,
        board_id: Option<&str>,
        body: &[u8],
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("column.reorder");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can move columns.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::AwaitBody);
        let order: Vec<String> = parse_body(body)?;

        trace.enter(Stage::Resolving);
        let board_id = require_id(board_id, "Board")?;
        locate_board(&state, board_id).ok_or_else(|| Rejection::bad_request("Invalid board ID."))?;
        let board = self
            .store
            .select_board(board_id)
            .await
            .or_not_found("Board not found.")?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &board.team_id)?;

        let actual: Vec<String> = self
            .store
            .retrieve_columns_by_board(&board.id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        if !is_permutation(&order, &actual) {
            return Err(Rejection::bad_request(COLUMN_LIST_MISMATCH));
        }

        trace.enter(Stage::Mutating);
        self.store.reorder_columns(&board.id, &order).await?;
        info!("{} reordered columns of board {}", auth.username, board.id);

        let state_cookie = self.reissue_state(&auth.team_id, trace).await;

        trace.enter(Stage::Done);
        Ok(Outcome::new(()).with_optional_cookie(state_cookie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(id: &str, order: i64) -> TaskPosition {
        TaskPosition {
            id: id.into(),
            order,
        }
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn listed_tasks_sorted_by_order() {
        assert_eq!(requested_order(&[pos("x", 1), pos("y", 0)]), ids(&["y", "x"]));
    }

    #[test]
    fn order_ties_keep_request_order() {
        let ordered = requested_order(&[pos("p", 0), pos("q", 0), pos("r", 0)]);
        assert_eq!(ordered, ids(&["p", "q", "r"]));
    }

    #[test]
    fn permutation_check() {
        let actual = ids(&["c0", "c1", "c2"]);
        assert!(is_permutation(&ids(&["c2", "c0", "c1"]), &actual));
        assert!(!is_permutation(&ids(&["c0", "c1"]), &actual));
        assert!(!is_permutation(&ids(&["c0", "c0", "c1"]), &actual));
        assert!(!is_permutation(&ids(&["c0", "c1", "zz"]), &actual));
    }
}
