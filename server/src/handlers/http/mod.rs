pub mod boards;
pub mod routes;
pub mod session;
pub mod tasks;
pub mod team;
pub mod utils;

pub use routes::{Router, build_api_router};
