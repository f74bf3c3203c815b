use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::token::codec::TokenKind;

pub const AUTH_COOKIE: &str = "auth";
pub const STATE_COOKIE: &str = "state";
pub const INVITE_COOKIE: &str = "invite";

impl TokenKind {
    pub fn cookie_name(self) -> &'static str {
        match self {
            TokenKind::Auth => AUTH_COOKIE,
            TokenKind::State => STATE_COOKIE,
            TokenKind::Invite => INVITE_COOKIE,
        }
    }
}

/// Raw token strings lifted off an incoming request, before any decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub auth: Option<String>,
    pub state: Option<String>,
    pub invite: Option<String>,
}

impl Credentials {
    pub fn get(&self, kind: TokenKind) -> Option<&str> {
        match kind {
            TokenKind::Auth => self.auth.as_deref(),
            TokenKind::State => self.state.as_deref(),
            TokenKind::Invite => self.invite.as_deref(),
        }
        .filter(|v| !v.is_empty())
    }
}

/// A cookie the response must set (or clear).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: &'static str,
    pub value: String,
    pub expires: DateTime<Utc>,
}

impl SetCookie {
    pub fn token(kind: TokenKind, value: String, expires: DateTime<Utc>) -> Self {
        Self {
            name: kind.cookie_name(),
            value,
            expires,
        }
    }

    pub fn clear(kind: TokenKind) -> Self {
        Self {
            name: kind.cookie_name(),
            value: String::new(),
            expires: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.value.is_empty()
    }

    /// `Set-Cookie` header text. Sent cross-site, so `SameSite=None` with
    /// `Secure`.
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let max_age = (self.expires - now).num_seconds().max(0);
        format!(
            "{}={}; Path=/; Expires={}; Max-Age={}; HttpOnly; Secure; SameSite=None",
            self.name,
            self.value,
            httpdate::fmt_http_date(SystemTime::from(self.expires)),
            max_age
        )
    }
}
