use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use hyper::{Response, StatusCode, header};
use serde::Serialize;
use tracing::{debug, error, warn};

use shared::types::{ErrorResponse, ValidationResponse};

use crate::coordinator::{Outcome, Rejection};
use crate::handlers::http::utils::body::{ResponseBody, empty, full};
use crate::handlers::http::utils::headers::set_cookie;
use crate::token::TokenKind;

/// Serialize any `Serialize` type and deliver it as a JSON response.
pub fn deliver_serialized_json<T: Serialize>(
    data: &T,
    status: StatusCode,
) -> Result<Response<ResponseBody>> {
    let json = serde_json::to_string(data).context("Failed to serialize response")?;

    debug!("Delivering serialized JSON response, size: {} bytes", json.len());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))
}

/// `{"error": message}` with the given status.
pub fn deliver_error_json(message: &str, status: StatusCode) -> Result<Response<ResponseBody>> {
    deliver_serialized_json(&ErrorResponse::new(message), status)
}

/// HTTP status for each rejection. A missing or bad Auth token means the
/// caller is not logged in; a bad State or Invite token is a malformed
/// request from a logged-in caller.
pub fn rejection_status(rejection: &Rejection) -> StatusCode {
    match rejection {
        Rejection::MissingToken(TokenKind::Auth) | Rejection::InvalidToken(TokenKind::Auth) => {
            StatusCode::UNAUTHORIZED
        }
        Rejection::MissingToken(_)
        | Rejection::InvalidToken(_)
        | Rejection::BadRequest(_)
        | Rejection::Validation(_) => StatusCode::BAD_REQUEST,
        Rejection::Forbidden(_) => StatusCode::FORBIDDEN,
        Rejection::NotFound(_) => StatusCode::NOT_FOUND,
        Rejection::StoreFault(_) | Rejection::EncodeFault(_) | Rejection::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn deliver_rejection(rejection: &Rejection) -> Result<Response<ResponseBody>> {
    let status = rejection_status(rejection);
    if rejection.is_fault() {
        error!("Request failed: {}", rejection);
    } else {
        warn!("Request rejected ({}): {}", status.as_u16(), rejection);
    }

    match rejection {
        Rejection::Validation(errors) => deliver_serialized_json(
            &ValidationResponse {
                validation_errors: errors.clone(),
            },
            status,
        ),
        other => deliver_error_json(&other.public_message(), status),
    }
}

/// Render a coordinator result: 200 with the JSON body and every cookie of
/// the outcome, or the rejection.
pub fn respond<T: Serialize>(result: Result<Outcome<T>, Rejection>) -> Result<Response<ResponseBody>> {
    match result {
        Ok(outcome) => {
            let response = deliver_serialized_json(&outcome.body, StatusCode::OK)?;
            attach_cookies(response, &outcome)
        }
        Err(rejection) => deliver_rejection(&rejection),
    }
}

/// Like [`respond`] for operations with nothing to return: 200, empty body.
pub fn respond_empty(result: Result<Outcome<()>, Rejection>) -> Result<Response<ResponseBody>> {
    match result {
        Ok(outcome) => {
            let response = Response::builder()
                .status(StatusCode::OK)
                .body(empty())
                .map_err(|e| anyhow!("Failed to build empty response: {}", e))?;
            attach_cookies(response, &outcome)
        }
        Err(rejection) => deliver_rejection(&rejection),
    }
}

fn attach_cookies<T>(
    mut response: Response<ResponseBody>,
    outcome: &Outcome<T>,
) -> Result<Response<ResponseBody>> {
    let now = Utc::now();
    for cookie in &outcome.cookies {
        response
            .headers_mut()
            .append(header::SET_COOKIE, set_cookie(cookie, now)?);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use http_body_util::BodyExt;
    use shared::types::ValidationErrors;

    use crate::database::StoreError;
    use crate::token::SetCookie;

    async fn body_json(response: Response<ResponseBody>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn token_rejections_split_by_kind() {
        assert_eq!(
            rejection_status(&Rejection::MissingToken(TokenKind::Auth)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            rejection_status(&Rejection::InvalidToken(TokenKind::Auth)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            rejection_status(&Rejection::MissingToken(TokenKind::State)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejection_status(&Rejection::InvalidToken(TokenKind::Invite)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn other_rejections() {
        assert_eq!(
            rejection_status(&Rejection::forbidden("no")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            rejection_status(&Rejection::not_found("gone")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            rejection_status(&Rejection::StoreFault(StoreError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn fault_body_hides_detail() {
        let rejection = Rejection::StoreFault(StoreError::Conflict("column c1 vanished".into()));
        let response = deliver_rejection(&rejection).unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Something went wrong. Please try again later.");
    }

    #[tokio::test]
    async fn validation_body_shape() {
        let rejection = Rejection::Validation(ValidationErrors::username_taken());
        let response = deliver_rejection(&rejection).unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["validationErrors"]["username"][0], "Username is already taken.");
        assert!(json["validationErrors"].get("password").is_none());
    }

    #[tokio::test]
    async fn outcome_cookies_become_headers() {
        let outcome = Outcome::new(())
            .with_cookie(SetCookie::token(
                TokenKind::State,
                "tok".into(),
                Utc::now() + Duration::minutes(5),
            ))
            .with_cookie(SetCookie::clear(TokenKind::Invite));
        let response = respond_empty(Ok(outcome)).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<&str> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("state=tok;"));
        assert!(cookies[1].starts_with("invite=;"));
    }
}
