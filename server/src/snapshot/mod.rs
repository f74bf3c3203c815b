pub mod builder;
pub mod resolver;

pub use self::builder::build_state;
pub use self::resolver::{Level, Location, locate, locate_at, locate_board, locate_column, locate_task};
