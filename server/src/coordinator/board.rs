use tracing::info;

use shared::types::{
    ActiveBoard, BoardNameData, BoardSummary, BoardsResponse, ColumnDetail, CreatedResponse,
    SubtaskDetail, TaskDetail,
};

use crate::authz::{is_admin, require_admin, require_board_access};
use crate::coordinator::stage::{Stage, Trace};
use crate::coordinator::{Coordinator, OrNotFound, Outcome, Rejection, parse_body, require_id};
use crate::database::utils::new_id;
use crate::database::{BoardRecord, ColumnRecord, Store, StoreError};
use crate::snapshot::locate_board;
use crate::token::Credentials;
use crate::validation::validate_board_name;

/// Columns every board is created with.
pub const COLUMNS_PER_BOARD: usize = 4;
pub const DEFAULT_BOARD_NAME: &str = "New Board";

pub const MAX_BOARDS_REACHED: &str = "You have already created the maximum amount of boards \
     allowed per team. Please delete one of your boards to create a new one.";

impl<S: Store> Coordinator<S> {
    /// GET /board. Lists the team's boards, expands the requested (or first)
    /// one and hands out a fresh State token.
    pub async fn boards(
        &self,
        creds: &Credentials,
        id: Option<&str>,
    ) -> Result<Outcome<BoardsResponse>, Rejection> {
        let trace = Trace::new("board.get");
        let auth = self.authenticate(creds, trace)?;

        trace.enter(Stage::Resolving);
        let mut boards = self.store.retrieve_boards_by_team(&auth.team_id).await?;

        if boards.is_empty() && is_admin(&auth) {
            trace.enter(Stage::Mutating);
            let board = self
                .insert_board_with_columns(&auth.team_id, DEFAULT_BOARD_NAME)
                .await?;
            info!("Created default board {} for team {}", board.id, auth.team_id);
            boards.push(board);
        }

        let active = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                let board = self
                    .store
                    .select_board(id)
                    .await
                    .or_not_found("Board not found.")?;
                trace.enter(Stage::Authorizing);
                require_board_access(&auth, &board.team_id)?;
                Some(board)
            }
            None => boards.first().cloned(),
        };

        let active_board = match active {
            Some(board) => Some(self.expand_board(board).await?),
            None => None,
        };

        trace.enter(Stage::ReIssuing);
        let state_cookie = self.state_cookie(&auth.team_id).await?;

        trace.enter(Stage::Done);
        Ok(Outcome::new(BoardsResponse {
            boards: boards
                .into_iter()
                .map(|b| BoardSummary {
                    id: b.id,
                    name: b.name,
                })
                .collect(),
            active_board,
        })
        .with_cookie(state_cookie))
    }

    pub async fn create_board(
        &self,
        creds: &Credentials,
        body: &[u8],
    ) -> Result<Outcome<CreatedResponse>, Rejection> {
        let trace = Trace::new("board.create");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can create boards.")?;

        trace.enter(Stage::AwaitBody);
        let data: BoardNameData = parse_body(body)?;
        validate_board_name(&data.name).map_err(Rejection::BadRequest)?;

        trace.enter(Stage::Mutating);
        let board = self
            .insert_board_with_columns(&auth.team_id, data.name.trim())
            .await?;
        info!("{} created board {}", auth.username, board.id);

        let state_cookie = self.reissue_state(&auth.team_id, trace).await;

        trace.enter(Stage::Done);
        Ok(Outcome::new(CreatedResponse { id: board.id }).with_optional_cookie(state_cookie))
    }

    pub async fn rename_board(
        &self,
        creds: &Credentials,
        id: Option<&str>,
        body: &[u8],
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("board.rename");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can edit boards.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::AwaitBody);
        let data: BoardNameData = parse_body(body)?;
        validate_board_name(&data.name).map_err(Rejection::BadRequest)?;

        trace.enter(Stage::Resolving);
        let id = require_id(id, "Board")?;
        locate_board(&state, id).ok_or_else(|| Rejection::bad_request("Invalid board ID."))?;
        let mut board = self
            .store
            .select_board(id)
            .await
            .or_not_found("Board not found.")?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &board.team_id)?;

        trace.enter(Stage::Mutating);
        board.name = data.name.trim().to_string();
        self.store
            .update_board(&board)
            .await
            .or_not_found("Board not found.")?;
        info!("{} renamed board {}", auth.username, board.id);

        trace.enter(Stage::Done);
        Ok(Outcome::new(()))
    }

    pub async fn delete_board(
        &self,
        creds: &Credentials,
        id: Option<&str>,
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("board.delete");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can delete boards.")?;
        let state = self.snapshot(creds, trace)?;

        trace.enter(Stage::Resolving);
        let id = require_id(id, "Board")?;
        locate_board(&state, id).ok_or_else(|| Rejection::bad_request("Invalid board ID."))?;
        let board = self
            .store
            .select_board(id)
            .await
            .or_not_found("Board not found.")?;

        trace.enter(Stage::Authorizing);
        require_board_access(&auth, &board.team_id)?;

        trace.enter(Stage::Mutating);
        self.store.delete_board(&board.id).await?;
        info!("{} deleted board {}", auth.username, board.id);

        let state_cookie = self.reissue_state(&auth.team_id, trace).await;

        trace.enter(Stage::Done);
        Ok(Outcome::new(()).with_optional_cookie(state_cookie))
    }

    async fn insert_board_with_columns(
        &self,
        team_id: &str,
        name: &str,
    ) -> Result<BoardRecord, Rejection> {
        let board = BoardRecord {
            id: new_id(),
            name: name.to_string(),
            team_id: team_id.to_string(),
        };
        let columns: Vec<ColumnRecord> = (0..COLUMNS_PER_BOARD)
            .map(|position| ColumnRecord {
                id: new_id(),
                board_id: board.id.clone(),
                position: position as i64,
            })
            .collect();

        self.store
            .insert_board(&board, &columns, self.policy.max_boards_per_team)
            .await
            .map_err(|e| match e {
                StoreError::LimitReached => Rejection::bad_request(MAX_BOARDS_REACHED),
                other => Rejection::StoreFault(other),
            })?;
        Ok(board)
    }

    async fn expand_board(&self, board: BoardRecord) -> Result<ActiveBoard, Rejection> {
        let mut columns = Vec::new();
        for column in self.store.retrieve_columns_by_board(&board.id).await? {
            let mut tasks = Vec::new();
            for task in self.store.retrieve_tasks_by_column(&column.id).await? {
                let subtasks = self
                    .store
                    .retrieve_subtasks_by_task(&task.id)
                    .await?
                    .into_iter()
                    .map(|s| SubtaskDetail {
                        id: s.id,
                        title: s.title,
                        order: s.position,
                        done: s.done,
                    })
                    .collect();
                tasks.push(TaskDetail {
                    id: task.id,
                    title: task.title,
                    description: task.description,
                    order: task.position,
                    subtasks,
                });
            }
            columns.push(ColumnDetail {
                id: column.id,
                order: column.position,
                tasks,
            });
        }

        Ok(ActiveBoard {
            id: board.id,
            name: board.name,
            columns,
        })
    }
}
