use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use shared::types::{Auth, Invite, State};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token expiry out of range")]
    ExpiryOverflow,

    /// Bad signature, malformed token, wrong kind or expired. The cause is
    /// deliberately not carried.
    #[error("invalid token")]
    Invalid,
}

// ---------------------------------------------------------------------------
// Payload kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Auth,
    State,
    Invite,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Auth => "auth",
            TokenKind::State => "state",
            TokenKind::Invite => "invite",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload the codec knows how to sign. `KIND` is written into the token so
/// a state token can never be replayed as an auth token.
pub trait TokenPayload: Serialize + DeserializeOwned {
    const KIND: TokenKind;
}

impl TokenPayload for Auth {
    const KIND: TokenKind = TokenKind::Auth;
}

impl TokenPayload for State {
    const KIND: TokenKind = TokenKind::State;
}

impl TokenPayload for Invite {
    const KIND: TokenKind = TokenKind::Invite;
}

#[derive(Serialize)]
struct OutgoingClaims<'a, T> {
    kind: &'static str,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    payload: &'a T,
}

#[derive(Deserialize)]
struct IncomingClaims<T> {
    kind: String,
    exp: i64,
    #[serde(flatten)]
    payload: T,
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// HS256 signer/verifier for every cookie token.
///
/// Holds the process-wide secret. Cloning shares nothing mutable, so one codec
/// can serve any number of concurrent requests.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign `payload` so that it stops decoding at `expires_at` (second
    /// precision). An expiry in the past is accepted and yields a token that
    /// never decodes.
    pub fn encode<T: TokenPayload>(
        &self,
        payload: &T,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = OutgoingClaims {
            kind: T::KIND.as_str(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
            payload,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    pub fn decode<T: TokenPayload>(&self, token: &str) -> Result<T, TokenError> {
        let data = decode::<IncomingClaims<T>>(token, &self.decoding, &self.validation).map_err(
            |e| {
                debug!("{} token rejected: {}", T::KIND, e);
                TokenError::Invalid
            },
        )?;

        let claims = data.claims;

        // The library accepts `exp == now`; a token is dead at its expiry instant.
        if claims.exp <= Utc::now().timestamp() {
            debug!("{} token rejected: expired", T::KIND);
            return Err(TokenError::Invalid);
        }

        if claims.kind != T::KIND.as_str() {
            debug!("{} token rejected: carries kind {}", T::KIND, claims.kind);
            return Err(TokenError::Invalid);
        }

        Ok(claims.payload)
    }
}
