use tracing::{error, info, warn};

use shared::types::{Auth, LoginData, SessionResponse};

use crate::coordinator::stage::{Stage, Trace};
use crate::coordinator::{Coordinator, Outcome, Rejection, parse_body};
use crate::database::utils::verify_password;
use crate::database::{Store, StoreError};
use crate::token::{SetCookie, TokenKind};

pub const CREDENTIALS_REQUIRED: &str = "Username and password are required.";
pub const BAD_CREDENTIALS: &str = "Invalid username or password.";

impl<S: Store> Coordinator<S> {
    /// Exchange credentials for fresh `auth` and `state` cookies.
    pub async fn login(&self, body: &[u8]) -> Result<Outcome<SessionResponse>, Rejection> {
        let trace = Trace::new("login");

        trace.enter(Stage::AwaitBody);
        let data: LoginData = parse_body(body)?;
        if data.username.is_empty() || data.password.is_empty() {
            return Err(Rejection::bad_request(CREDENTIALS_REQUIRED));
        }

        trace.enter(Stage::Resolving);
        let user = match self.store.select_user(&data.username).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                warn!("Login for unknown user {}", data.username);
                return Err(Rejection::bad_request(BAD_CREDENTIALS));
            }
            Err(e) => return Err(e.into()),
        };

        trace.enter(Stage::Authorizing);
        let matches = verify_password(&user.password_hash, &data.password).map_err(|e| {
            error!("Stored hash for {} is unreadable: {:#}", user.username, e);
            Rejection::Internal("Something went wrong. Please try again later.")
        })?;
        if !matches {
            warn!("Wrong password for {}", user.username);
            return Err(Rejection::bad_request(BAD_CREDENTIALS));
        }

        trace.enter(Stage::ReIssuing);
        let auth = Auth::new(&user.username, user.is_admin, &user.team_id);
        let auth_cookie = self.issue_session(&auth).map_err(Rejection::EncodeFault)?;
        let state_cookie = self.state_cookie(&user.team_id).await?;

        info!("{} logged in", user.username);
        trace.enter(Stage::Done);
        Ok(Outcome::new(SessionResponse {
            username: user.username,
            is_admin: user.is_admin,
            team_id: user.team_id,
        })
        .with_cookie(auth_cookie)
        .with_cookie(state_cookie))
    }

    /// Drop the session. Tokens are stateless, so this only clears cookies.
    pub fn logout(&self) -> Outcome<()> {
        Outcome::new(())
            .with_cookie(SetCookie::clear(TokenKind::Auth))
            .with_cookie(SetCookie::clear(TokenKind::State))
    }
}
