use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// GET /team response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: String,
    pub members: Vec<MemberView>,
}

/// POST /team/invite response. The token is handed to the invitee out of
/// band and redeemed through GET /join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteResponse {
    #[serde(rename = "inviteToken")]
    pub invite_token: String,
}
