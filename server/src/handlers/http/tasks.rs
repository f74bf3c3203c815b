use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response};

use crate::AppState;
use crate::handlers::http::utils::{
    ResponseBody, credentials, query_param, respond, respond_empty,
};

/// POST /task. The column comes from the body, not the query.
pub async fn handle_create_task(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    respond(state.coordinator.create_task(&creds, req.body()).await)
}

pub async fn handle_update_task(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond_empty(
        state
            .coordinator
            .update_task(&creds, id.as_deref(), req.body())
            .await,
    )
}

pub async fn handle_delete_task(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond_empty(state.coordinator.delete_task(&creds, id.as_deref()).await)
}

pub async fn handle_update_subtask(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond_empty(
        state
            .coordinator
            .update_subtask(&creds, id.as_deref(), req.body())
            .await,
    )
}
