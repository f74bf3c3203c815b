//! Authorization decisions over a decoded Auth payload.
//!
//! Visibility comes from the State token; ownership always comes from the
//! store, because a board can change hands after a snapshot was signed.

use shared::types::Auth;

use crate::coordinator::Rejection;

pub const NO_BOARD_ACCESS: &str = "You do not have access to this board.";

pub fn is_admin(auth: &Auth) -> bool {
    auth.is_admin
}

pub fn owns_board(auth: &Auth, board_team_id: &str) -> bool {
    auth.team_id == board_team_id
}

/// Admin gate. `denial` is the message shown to non-admins, e.g.
/// "Only team admins can edit tasks."
pub fn require_admin(auth: &Auth, denial: &str) -> Result<(), Rejection> {
    if is_admin(auth) {
        Ok(())
    } else {
        Err(Rejection::forbidden(denial))
    }
}

pub fn require_board_access(auth: &Auth, board_team_id: &str) -> Result<(), Rejection> {
    if owns_board(auth, board_team_id) {
        Ok(())
    } else {
        Err(Rejection::forbidden(NO_BOARD_ACCESS))
    }
}
