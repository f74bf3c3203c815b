use serde::{Deserialize, Serialize};

/// Payload of the `auth` cookie.
///
/// Issued at login and registration. The server never edits it in place; a
/// role or team change only takes effect once the caller logs in again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub username: String,

    #[serde(rename = "isAdmin")]
    pub is_admin: bool,

    #[serde(rename = "teamID")]
    pub team_id: String,
}

impl Auth {
    pub fn new(username: impl Into<String>, is_admin: bool, team_id: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin,
            team_id: team_id.into(),
        }
    }
}

/// Payload of the `state` cookie: every board, column and task the caller can
/// currently see, in store order.
///
/// Position inside the vectors is meaningful. Columns appear in board order
/// and tasks in column order exactly as the store held them when the token
/// was signed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub boards: Vec<BoardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub id: String,
    pub columns: Vec<ColumnView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub id: String,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
}

impl State {
    pub fn new(boards: Vec<BoardView>) -> Self {
        Self { boards }
    }

    /// Total number of tasks across every board and column.
    pub fn task_count(&self) -> usize {
        self.boards
            .iter()
            .flat_map(|b| b.columns.iter())
            .map(|c| c.tasks.len())
            .sum()
    }
}

/// Payload of the `invite` cookie. Grants registration into `team_id` as a
/// regular member until the token expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    #[serde(rename = "teamID")]
    pub team_id: String,
}

impl Invite {
    pub fn new(team_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
        }
    }
}
