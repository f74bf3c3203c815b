use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Body;
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use tracing::{debug, warn};

use crate::AppState;
use crate::handlers::http::utils::*;
use crate::handlers::http::{boards, session, tasks, team};

/// Request bodies above this size are refused before any handler runs.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Handler type
// ---------------------------------------------------------------------------
//
// The router collects the body before dispatch, so every handler sees the
// whole request as `Request<Bytes>`. Token checks are not done here; each
// coordinator call decodes the cookies it needs in its own order.

type RouteHandler = Box<
    dyn Fn(
            Request<Bytes>,
            AppState,
        ) -> Pin<Box<dyn Future<Output = Result<Response<ResponseBody>>> + Send>>
        + Send
        + Sync,
>;

struct Route {
    method: Method,
    path: String,
    handler: RouteHandler,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn on<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(move |req, state| Box::pin(handler(req, state))),
        });
        self
    }

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>>> + Send + 'static,
    {
        self.on(Method::GET, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>>> + Send + 'static,
    {
        self.on(Method::POST, path, handler)
    }

    pub fn patch<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>>> + Send + 'static,
    {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<ResponseBody>>> + Send + 'static,
    {
        self.on(Method::DELETE, path, handler)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Match, collect the body, run the handler and stamp CORS headers on
    /// whatever comes back.
    pub async fn route<B>(&self, req: Request<B>, state: AppState) -> Result<Response<ResponseBody>>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let origin = state.config.server.allowed_origin.clone();
        let mut response = self.dispatch(req, state).await?;
        apply_cors(&mut response, &origin);
        Ok(response)
    }

    async fn dispatch<B>(&self, req: Request<B>, state: AppState) -> Result<Response<ResponseBody>>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        debug!("{} {}", method, path);

        let allowed = self.allowed_methods(&path);
        if allowed.is_empty() {
            return deliver_error_json("Endpoint not found.", StatusCode::NOT_FOUND)
                .context("Failed to deliver 404 response");
        }

        if method == Method::OPTIONS {
            return preflight(&allowed);
        }

        let Some(route) = self
            .routes
            .iter()
            .find(|r| r.method == method && Self::path_matches(&r.path, &path))
        else {
            warn!("{} not allowed on {}", method, path);
            return method_not_allowed(&allowed);
        };

        let (parts, body) = req.into_parts();
        let bytes = match Limited::new(body, MAX_BODY_BYTES).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!("Failed to read body of {} {}: {}", method, path, e);
                return deliver_error_json("Invalid request body.", StatusCode::BAD_REQUEST)
                    .context("Failed to deliver 400 response");
            }
        };

        (route.handler)(Request::from_parts(parts, bytes), state).await
    }

    /// Methods registered for `path`, in registration order.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for route in &self.routes {
            if Self::path_matches(&route.path, path) && !methods.contains(&route.method) {
                methods.push(route.method.clone());
            }
        }
        methods
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    /// Exact match on the path; the query string is ignored.
    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        let clean = request_path.split('?').next().unwrap_or(request_path);
        route_path == clean
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn allow_header(methods: &[Method]) -> Result<HeaderValue> {
    let list = methods
        .iter()
        .map(Method::as_str)
        .chain(std::iter::once("OPTIONS"))
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&list).map_err(|e| anyhow!("Invalid Allow header: {}", e))
}

fn method_not_allowed(methods: &[Method]) -> Result<Response<ResponseBody>> {
    let mut response = deliver_error_json("Method not allowed.", StatusCode::METHOD_NOT_ALLOWED)
        .context("Failed to deliver 405 response")?;
    response
        .headers_mut()
        .insert(header::ALLOW, allow_header(methods)?);
    Ok(response)
}

fn preflight(methods: &[Method]) -> Result<Response<ResponseBody>> {
    let allow = allow_header(methods)?;
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, allow.clone())
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, allow)
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
        .body(empty())
        .map_err(|e| anyhow!("Failed to build preflight response: {}", e))
}

fn apply_cors(response: &mut Response<ResponseBody>, origin: &str) {
    let headers = response.headers_mut();
    match HeaderValue::from_str(origin) {
        Ok(value) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        Err(e) => warn!("Configured origin {:?} is not a valid header: {}", origin, e),
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

// ---------------------------------------------------------------------------
// API router
//
// Handlers lift cookies, query and body off the request and hand them to the
// coordinator; every protocol decision happens there.
// ---------------------------------------------------------------------------

pub fn build_api_router() -> Router {
    Router::new()
        .get("/health", |_req, _state| async move {
            deliver_serialized_json(&serde_json::json!({ "status": "ok" }), StatusCode::OK)
                .context("Failed to deliver health response")
        })
        // ── Session ──────────────────────────────────────────────────────────
        .post("/register", |req, state| async move {
            session::handle_register(req, state)
                .await
                .context("Register failed")
        })
        .post("/login", |req, state| async move {
            session::handle_login(req, state)
                .await
                .context("Login failed")
        })
        .post("/logout", |req, state| async move {
            session::handle_logout(req, state)
                .await
                .context("Logout failed")
        })
        // ── Team ─────────────────────────────────────────────────────────────
        .get("/team", |req, state| async move {
            team::handle_get_team(req, state)
                .await
                .context("Team fetch failed")
        })
        .post("/team/invite", |req, state| async move {
            team::handle_invite(req, state)
                .await
                .context("Invite failed")
        })
        .get("/join", |req, state| async move {
            team::handle_join(req, state).await.context("Join failed")
        })
        .delete("/users", |req, state| async move {
            team::handle_remove_member(req, state)
                .await
                .context("Member removal failed")
        })
        // ── Boards and columns ───────────────────────────────────────────────
        .get("/board", |req, state| async move {
            boards::handle_get_boards(req, state)
                .await
                .context("Board fetch failed")
        })
        .post("/board", |req, state| async move {
            boards::handle_create_board(req, state)
                .await
                .context("Board create failed")
        })
        .patch("/board", |req, state| async move {
            boards::handle_rename_board(req, state)
                .await
                .context("Board rename failed")
        })
        .delete("/board", |req, state| async move {
            boards::handle_delete_board(req, state)
                .await
                .context("Board delete failed")
        })
        .patch("/board/columns", |req, state| async move {
            boards::handle_reorder_columns(req, state)
                .await
                .context("Column reorder failed")
        })
        .patch("/column", |req, state| async move {
            boards::handle_move_tasks(req, state)
                .await
                .context("Task move failed")
        })
        // ── Tasks ────────────────────────────────────────────────────────────
        .post("/task", |req, state| async move {
            tasks::handle_create_task(req, state)
                .await
                .context("Task create failed")
        })
        .patch("/task", |req, state| async move {
            tasks::handle_update_task(req, state)
                .await
                .context("Task update failed")
        })
        .delete("/task", |req, state| async move {
            tasks::handle_delete_task(req, state)
                .await
                .context("Task delete failed")
        })
        .patch("/subtask", |req, state| async move {
            tasks::handle_update_subtask(req, state)
                .await
                .context("Subtask update failed")
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
