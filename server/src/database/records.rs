use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub team_id: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BoardRecord {
    pub id: String,
    pub name: String,
    pub team_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ColumnRecord {
    pub id: String,
    pub board_id: String,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TaskRecord {
    pub id: String,
    pub column_id: String,
    pub title: String,
    pub description: String,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SubtaskRecord {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub position: i64,
    pub done: bool,
}
