use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response};

use crate::AppState;
use crate::handlers::http::utils::{ResponseBody, credentials, respond, respond_empty};

/// POST /register. The invite cookie, if any, decides which team is joined.
pub async fn handle_register(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    respond(state.coordinator.register(&creds, req.body()).await)
}

/// POST /login
pub async fn handle_login(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    respond(state.coordinator.login(req.body()).await)
}

/// POST /logout
pub async fn handle_logout(_req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    respond_empty(Ok(state.coordinator.logout()))
}
