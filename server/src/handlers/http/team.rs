use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response};

use crate::AppState;
use crate::handlers::http::utils::{
    ResponseBody, credentials, query_param, respond, respond_empty,
};

/// GET /team
pub async fn handle_get_team(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    respond(state.coordinator.team(&creds).await)
}

/// POST /team/invite
pub async fn handle_invite(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    respond(state.coordinator.invite(&creds))
}

/// GET /join?token=
pub async fn handle_join(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let token = query_param(req.uri(), "token");
    respond_empty(state.coordinator.join(token.as_deref()))
}

/// DELETE /users?username=
pub async fn handle_remove_member(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let username = query_param(req.uri(), "username");
    respond_empty(
        state
            .coordinator
            .remove_member(&creds, username.as_deref())
            .await,
    )
}
