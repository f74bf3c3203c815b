//! Locating a resource inside a decoded State snapshot.
//!
//! Every lookup is a linear depth-first walk over the snapshot: boards in
//! order, each board's columns in order, each column's tasks in order. A
//! State token only ever holds one team's boards, so the walk stays small and
//! an index would cost more to build than it saves. The first node whose ID
//! matches wins, which keeps results deterministic even if an ID were ever
//! duplicated.

use shared::types::{BoardView, ColumnView, State, TaskView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Board,
    Column,
    Task,
}

/// Where a resource sits in the snapshot, with the IDs of its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub level: Level,
    pub id: &'a str,
    pub board_id: &'a str,
    pub board_index: usize,
    pub column_id: Option<&'a str>,
    pub column_index: Option<usize>,
    pub task_index: Option<usize>,
}

impl<'a> Location<'a> {
    fn board(board: &'a BoardView, bi: usize) -> Self {
        Self {
            level: Level::Board,
            id: &board.id,
            board_id: &board.id,
            board_index: bi,
            column_id: None,
            column_index: None,
            task_index: None,
        }
    }

    fn column(board: &'a BoardView, bi: usize, column: &'a ColumnView, ci: usize) -> Self {
        Self {
            level: Level::Column,
            id: &column.id,
            board_id: &board.id,
            board_index: bi,
            column_id: Some(&column.id),
            column_index: Some(ci),
            task_index: None,
        }
    }

    fn task(
        board: &'a BoardView,
        bi: usize,
        column: &'a ColumnView,
        ci: usize,
        task: &'a TaskView,
        ti: usize,
    ) -> Self {
        Self {
            level: Level::Task,
            id: &task.id,
            board_id: &board.id,
            board_index: bi,
            column_id: Some(&column.id),
            column_index: Some(ci),
            task_index: Some(ti),
        }
    }
}

/// Every node of the snapshot in depth-first order. Lazy, so a `find` on it
/// stops at the first hit.
fn walk(state: &State) -> impl Iterator<Item = Location<'_>> {
    state.boards.iter().enumerate().flat_map(|(bi, board)| {
        let columns = board.columns.iter().enumerate().flat_map(move |(ci, column)| {
            let tasks = column
                .tasks
                .iter()
                .enumerate()
                .map(move |(ti, task)| Location::task(board, bi, column, ci, task, ti));
            std::iter::once(Location::column(board, bi, column, ci)).chain(tasks)
        });
        std::iter::once(Location::board(board, bi)).chain(columns)
    })
}

/// Find `id` at any level.
pub fn locate<'a>(state: &'a State, id: &str) -> Option<Location<'a>> {
    walk(state).find(|loc| loc.id == id)
}

/// Find `id` only among nodes of `level`.
pub fn locate_at<'a>(state: &'a State, id: &str, level: Level) -> Option<Location<'a>> {
    walk(state).find(|loc| loc.level == level && loc.id == id)
}

pub fn locate_board<'a>(state: &'a State, id: &str) -> Option<Location<'a>> {
    locate_at(state, id, Level::Board)
}

pub fn locate_column<'a>(state: &'a State, id: &str) -> Option<Location<'a>> {
    locate_at(state, id, Level::Column)
}

pub fn locate_task<'a>(state: &'a State, id: &str) -> Option<Location<'a>> {
    locate_at(state, id, Level::Task)
}
