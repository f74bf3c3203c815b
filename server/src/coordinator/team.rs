use tracing::info;

use shared::types::{Invite, InviteResponse, MemberView, TeamResponse};

use crate::authz::require_admin;
use crate::coordinator::stage::{Stage, Trace};
use crate::coordinator::{Coordinator, OrNotFound, Outcome, Rejection, expiry_after};
use crate::database::{Store, StoreError};
use crate::token::{Credentials, SetCookie, TokenKind};

pub const NO_MEMBER_ACCESS: &str = "You do not have access to this user.";
pub const ADMIN_NOT_REMOVABLE: &str = "Admins cannot be deleted from their teams.";

impl<S: Store> Coordinator<S> {
    pub async fn team(&self, creds: &Credentials) -> Result<Outcome<TeamResponse>, Rejection> {
        let trace = Trace::new("team.get");
        let auth = self.authenticate(creds, trace)?;

        trace.enter(Stage::Resolving);
        let members = self
            .store
            .retrieve_users_by_team(&auth.team_id)
            .await?
            .into_iter()
            .map(|u| MemberView {
                username: u.username,
                is_admin: u.is_admin,
            })
            .collect();

        trace.enter(Stage::Done);
        Ok(Outcome::new(TeamResponse {
            id: auth.team_id,
            members,
        }))
    }

    /// Sign an invite into the caller's team.
    pub fn invite(&self, creds: &Credentials) -> Result<Outcome<InviteResponse>, Rejection> {
        let trace = Trace::new("team.invite");
        let auth = self.authenticate(creds, trace)?;

        trace.enter(Stage::Authorizing);
        require_admin(&auth, "Only team admins can invite members.")?;

        trace.enter(Stage::ReIssuing);
        let invite_token = expiry_after(self.policy.invite_ttl)
            .and_then(|expires| self.codec.encode(&Invite::new(&auth.team_id), expires))
            .map_err(Rejection::EncodeFault)?;

        info!("{} invited a member into team {}", auth.username, auth.team_id);
        trace.enter(Stage::Done);
        Ok(Outcome::new(InviteResponse { invite_token }))
    }

    /// Validate an invite link and park it in the `invite` cookie for the
    /// registration that follows.
    pub fn join(&self, token: Option<&str>) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("team.join");
        trace.enter(Stage::AwaitAuth);

        let raw = token
            .filter(|t| !t.is_empty())
            .ok_or(Rejection::InvalidToken(TokenKind::Invite))?;
        let invite = self
            .codec
            .decode::<Invite>(raw)
            .map_err(|_| Rejection::InvalidToken(TokenKind::Invite))?;

        info!("Invite into team {} accepted", invite.team_id);
        let expires = expiry_after(self.policy.invite_ttl).map_err(Rejection::EncodeFault)?;
        trace.enter(Stage::Done);
        Ok(Outcome::new(()).with_cookie(SetCookie::token(
            TokenKind::Invite,
            raw.to_string(),
            expires,
        )))
    }

    /// DELETE /users?username=. Removes a non-admin member from the caller's
    /// team. Tokens already issued to the member stay valid until expiry.
    pub async fn remove_member(
        &self,
        creds: &Credentials,
        username: Option<&str>,
    ) -> Result<Outcome<()>, Rejection> {
        let trace = Trace::new("team.remove_member");
        let auth = self.authenticate(creds, trace)?;
        require_admin(&auth, "Only team admins can remove members.")?;

        trace.enter(Stage::Resolving);
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Rejection::bad_request("Username cannot be empty."))?;
        let member = self
            .store
            .select_user(username)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => Rejection::bad_request("User does not exist."),
                other => Rejection::StoreFault(other),
            })?;

        trace.enter(Stage::Authorizing);
        if member.team_id != auth.team_id {
            return Err(Rejection::forbidden(NO_MEMBER_ACCESS));
        }
        if member.is_admin {
            return Err(Rejection::forbidden(ADMIN_NOT_REMOVABLE));
        }

        trace.enter(Stage::Mutating);
        self.store
            .delete_user(&member.username)
            .await
            .or_not_found("User does not exist.")?;
        info!(
            "{} removed {} from team {}",
            auth.username, member.username, auth.team_id
        );

        trace.enter(Stage::Done);
        Ok(Outcome::new(()))
    }
}
