use serde::{Deserialize, Serialize};

use crate::types::task::TaskDetail;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of POST /board and PATCH /board.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BoardNameData {
    #[serde(default)]
    pub name: String,
}

/// One entry of the PATCH /column body: where a task should land inside the
/// target column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskPosition {
    pub id: String,
    pub order: i64,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDetail {
    pub id: String,
    pub order: i64,
    pub tasks: Vec<TaskDetail>,
}

/// The board currently open on the client, fully expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBoard {
    pub id: String,
    pub name: String,
    pub columns: Vec<ColumnDetail>,
}

/// GET /board response.
///
/// `activeBoard` is `null` only when the team has no boards and the caller is
/// not allowed to create the default one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardsResponse {
    pub boards: Vec<BoardSummary>,
    #[serde(rename = "activeBoard")]
    pub active_board: Option<ActiveBoard>,
}

/// Returned by create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}
