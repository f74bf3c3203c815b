use tracing::{error, info, warn};

use shared::types::{
    Auth, Invite, RegistrationData, SessionResponse, ValidationErrors,
};

use crate::coordinator::stage::{Stage, Trace};
use crate::coordinator::{Coordinator, Outcome, Rejection, parse_body};
use crate::database::utils::{hash_password, new_id};
use crate::database::{Store, StoreError, UserRecord};
use crate::token::{Credentials, SetCookie, TokenKind};
use crate::validation::validate_credentials;

pub const REGISTERED_BUT_NO_SESSION: &str = "You have been registered successfully but something \
     went wrong. Please log in using the credentials you registered with.";

impl<S: Store> Coordinator<S> {
    /// Create an account.
    ///
    /// Without an `invite` cookie the registrant founds a new team and is its
    /// admin. With a valid one they join the invite's team as a member.
    pub async fn register(
        &self,
        creds: &Credentials,
        body: &[u8],
    ) -> Result<Outcome<SessionResponse>, Rejection> {
        let trace = Trace::new("register");

        trace.enter(Stage::AwaitBody);
        let data: RegistrationData = parse_body(body)?;
        let errs = validate_credentials(&data.username, &data.password);
        if errs.any() {
            return Err(Rejection::Validation(errs));
        }

        trace.enter(Stage::Resolving);
        let (team_id, is_admin) = match creds.get(TokenKind::Invite) {
            None => (new_id(), true),
            Some(raw) => match self.codec.decode::<Invite>(raw) {
                Ok(invite) => (invite.team_id, false),
                Err(_) => {
                    warn!("Registration for {} carried a bad invite", data.username);
                    return Err(Rejection::InvalidToken(TokenKind::Invite));
                }
            },
        };

        trace.enter(Stage::Mutating);
        let password_hash = hash_password(&data.password).map_err(|e| {
            error!("Password hashing failed: {:#}", e);
            Rejection::Internal("Something went wrong. Please try again later.")
        })?;

        let user = UserRecord {
            username: data.username.clone(),
            password_hash,
            team_id: team_id.clone(),
            is_admin,
        };
        match self.store.insert_user(&user).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey) => {
                return Err(Rejection::Validation(ValidationErrors::username_taken()));
            }
            Err(e) => return Err(e.into()),
        }
        info!(
            "Registered {} into team {} (admin: {})",
            user.username, team_id, is_admin
        );

        trace.enter(Stage::ReIssuing);
        let auth = Auth::new(&user.username, is_admin, &team_id);
        let auth_cookie = self.issue_session(&auth).map_err(|e| {
            error!("Auth token for new user {} not issued: {}", user.username, e);
            Rejection::Internal(REGISTERED_BUT_NO_SESSION)
        })?;
        let state_cookie = self.reissue_state(&team_id, trace).await;

        trace.enter(Stage::Done);
        Ok(Outcome::new(SessionResponse {
            username: auth.username,
            is_admin,
            team_id,
        })
        .with_cookie(auth_cookie)
        .with_optional_cookie(state_cookie)
        .with_cookie(SetCookie::clear(TokenKind::Invite)))
    }
}
