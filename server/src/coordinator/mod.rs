//! Per-resource orchestration of the token protocol.
//!
//! Every operation decodes the caller's cookies, resolves its target against
//! the State snapshot, applies the authorization rules, mutates the store and,
//! when the hierarchy changed, signs a fresh State token. See [`Stage`] for the
//! order. Nothing here knows about HTTP; handlers feed in raw cookie values
//! and body bytes and render the [`Outcome`] or [`Rejection`].

pub mod board;
pub mod column;
pub mod login;
pub mod register;
pub mod rejection;
pub mod stage;
pub mod subtask;
pub mod task;
pub mod team;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use shared::types::{Auth, AuthConfig, State};

use crate::database::Store;
use crate::snapshot::build_state;
use crate::token::{Credentials, SetCookie, TokenCodec, TokenError, TokenPayload};

pub use self::rejection::{OrNotFound, Rejection};
pub use self::stage::Stage;
use self::stage::Trace;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Tunables the coordinators apply, taken from `[auth]` at startup.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Lifetime of `auth` and `state` tokens.
    pub session_ttl: Duration,
    pub invite_ttl: Duration,
    pub max_boards_per_team: usize,
}

impl Policy {
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self {
            session_ttl: ttl(auth.token_expiry_secs()),
            invite_ttl: ttl(auth.invite_expiry_secs()),
            max_boards_per_team: auth.max_boards_per_team as usize,
        }
    }
}

/// Out-of-range lifetimes saturate; the expiry check in [`expiry_after`]
/// turns them into an encode fault instead of a panic.
fn ttl(secs: Option<i64>) -> Duration {
    secs.and_then(Duration::try_seconds).unwrap_or(Duration::MAX)
}

/// `now + ttl`, or `ExpiryOverflow` when that leaves the representable range.
pub(crate) fn expiry_after(ttl: Duration) -> Result<DateTime<Utc>, TokenError> {
    Utc::now()
        .checked_add_signed(ttl)
        .ok_or(TokenError::ExpiryOverflow)
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            session_ttl: Duration::minutes(60),
            invite_ttl: Duration::hours(24),
            max_boards_per_team: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A successful call: the response body plus the cookies to set or clear.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub body: T,
    pub cookies: Vec<SetCookie>,
}

impl<T> Outcome<T> {
    pub fn new(body: T) -> Self {
        Self {
            body,
            cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: SetCookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn with_optional_cookie(mut self, cookie: Option<SetCookie>) -> Self {
        self.cookies.extend(cookie);
        self
    }

    /// The cookie set under `name`, if any.
    pub fn cookie(&self, name: &str) -> Option<&SetCookie> {
        self.cookies.iter().find(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Coordinator<S> {
    store: S,
    codec: TokenCodec,
    policy: Policy,
}

impl<S: Store> Coordinator<S> {
    pub fn new(store: S, codec: TokenCodec, policy: Policy) -> Self {
        Self {
            store,
            codec,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    fn session_expiry(&self) -> Result<DateTime<Utc>, TokenError> {
        expiry_after(self.policy.session_ttl)
    }

    fn decode_cookie<T: TokenPayload>(&self, creds: &Credentials) -> Result<T, Rejection> {
        let raw = creds
            .get(T::KIND)
            .ok_or(Rejection::MissingToken(T::KIND))?;
        self.codec
            .decode::<T>(raw)
            .map_err(|_| Rejection::InvalidToken(T::KIND))
    }

    /// AwaitAuth.
    fn authenticate(&self, creds: &Credentials, trace: Trace) -> Result<Auth, Rejection> {
        trace.enter(Stage::AwaitAuth);
        self.decode_cookie::<Auth>(creds)
    }

    /// AwaitState.
    fn snapshot(&self, creds: &Credentials, trace: Trace) -> Result<State, Rejection> {
        trace.enter(Stage::AwaitState);
        self.decode_cookie::<State>(creds)
    }

    fn issue<T: TokenPayload>(
        &self,
        payload: &T,
        expires: DateTime<Utc>,
    ) -> Result<SetCookie, TokenError> {
        let token = self.codec.encode(payload, expires)?;
        Ok(SetCookie::token(T::KIND, token, expires))
    }

    fn issue_session(&self, auth: &Auth) -> Result<SetCookie, TokenError> {
        self.issue(auth, self.session_expiry()?)
    }

    /// Build and sign a State token, failing loudly. Used where issuing the
    /// snapshot is the point of the call.
    async fn state_cookie(&self, team_id: &str) -> Result<SetCookie, Rejection> {
        let state = build_state(&self.store, team_id).await?;
        self.session_expiry()
            .and_then(|expires| self.issue(&state, expires))
            .map_err(Rejection::EncodeFault)
    }

    /// ReIssuing after a committed mutation. The change already happened, so
    /// a failure here is logged and the call still succeeds; the client keeps
    /// its stale snapshot until the next successful issue.
    async fn reissue_state(&self, team_id: &str, trace: Trace) -> Option<SetCookie> {
        trace.enter(Stage::ReIssuing);
        match self.state_cookie(team_id).await {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                error!("State re-issue for team {} failed: {}", team_id, e);
                None
            }
        }
    }
}

/// AwaitBody: structural decode of the JSON body.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Rejection> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Request body rejected: {}", e);
        Rejection::bad_request("Invalid request body.")
    })
}

/// The `id` query value every targeted operation needs.
pub(crate) fn require_id<'a>(id: Option<&'a str>, resource: &str) -> Result<&'a str, Rejection> {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(Rejection::bad_request(format!(
            "{} ID cannot be empty.",
            resource
        ))),
    }
}
