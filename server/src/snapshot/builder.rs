use shared::types::{BoardView, ColumnView, State, TaskView};

use crate::database::{Store, StoreError};

/// Rebuild a team's State snapshot from the store, in store order.
///
/// Always reads fresh rows, so an unchanged hierarchy yields an equal
/// snapshot and a stale client snapshot is repaired on the next issue.
pub async fn build_state<S: Store + ?Sized>(store: &S, team_id: &str) -> Result<State, StoreError> {
    let mut boards = Vec::new();

    for board in store.retrieve_boards_by_team(team_id).await? {
        let mut columns = Vec::new();
        for column in store.retrieve_columns_by_board(&board.id).await? {
            let tasks = store
                .retrieve_tasks_by_column(&column.id)
                .await?
                .into_iter()
                .map(|task| TaskView { id: task.id })
                .collect();
            columns.push(ColumnView {
                id: column.id,
                tasks,
            });
        }
        boards.push(BoardView {
            id: board.id,
            columns,
        });
    }

    Ok(State::new(boards))
}
