//! Board and column endpoints. Targets travel as `?id=`.

use anyhow::Result;
use bytes::Bytes;
use hyper::{Request, Response};

use crate::AppState;
use crate::handlers::http::utils::{
    ResponseBody, credentials, query_param, respond, respond_empty,
};

pub async fn handle_get_boards(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond(state.coordinator.boards(&creds, id.as_deref()).await)
}

pub async fn handle_create_board(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    respond(state.coordinator.create_board(&creds, req.body()).await)
}

pub async fn handle_rename_board(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond_empty(
        state
            .coordinator
            .rename_board(&creds, id.as_deref(), req.body())
            .await,
    )
}

pub async fn handle_delete_board(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond_empty(state.coordinator.delete_board(&creds, id.as_deref()).await)
}

/// PATCH /board/columns?id=<boardID>
pub async fn handle_reorder_columns(
    req: Request<Bytes>,
    state: AppState,
) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond_empty(
        state
            .coordinator
            .reorder_columns(&creds, id.as_deref(), req.body())
            .await,
    )
}

/// PATCH /column?id=<columnID>
pub async fn handle_move_tasks(req: Request<Bytes>, state: AppState) -> Result<Response<ResponseBody>> {
    let creds = credentials(req.headers());
    let id = query_param(req.uri(), "id");
    respond_empty(
        state
            .coordinator
            .move_tasks(&creds, id.as_deref(), req.body())
            .await,
    )
}
