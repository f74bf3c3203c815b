pub mod board;
pub mod json_error;
pub mod login;
pub mod register;
pub mod server_config;
pub mod task;
pub mod team;
pub mod token;

pub use self::board::{
    ActiveBoard, BoardNameData, BoardSummary, BoardsResponse, ColumnDetail, CreatedResponse,
    TaskPosition,
};
pub use self::json_error::{ErrorResponse, ValidationErrors, ValidationResponse};
pub use self::login::{LoginData, SessionResponse};
pub use self::register::RegistrationData;
pub use self::server_config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig};
pub use self::task::{
    CreateTaskData, SubtaskData, SubtaskDetail, SubtaskDoneData, TaskDetail, UpdateTaskData,
};
pub use self::team::{InviteResponse, MemberView, TeamResponse};
pub use self::token::{Auth, BoardView, ColumnView, Invite, State, TaskView};
