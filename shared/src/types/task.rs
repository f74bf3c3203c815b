use serde::{Deserialize, Serialize};

/// POST /task body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateTaskData {
    #[serde(rename = "columnID", default)]
    pub column_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subtasks: Vec<String>,
}

/// PATCH /task body. Replaces the task's text and its whole subtask list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateTaskData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subtasks: Vec<SubtaskData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubtaskData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub done: bool,
}

/// PATCH /subtask body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubtaskDoneData {
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskDetail {
    pub id: String,
    pub title: String,
    pub order: i64,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub order: i64,
    pub subtasks: Vec<SubtaskDetail>,
}
