//! Accept loop: one Tokio task per connection, HTTP/1 via hyper, bounded by a
//! semaphore, stopped by a shutdown future.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::AppState;
use crate::handlers::http::Router;
use crate::handlers::http::utils::{ResponseBody, deliver_error_json, empty};

/// Serve `router` on `listener` until `shutdown` resolves. Connections already
/// accepted are left to finish on their own tasks.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    state: AppState,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let router = Arc::new(router);
    let permits = Arc::new(Semaphore::new(state.config.server.max_connections));
    let local = listener.local_addr().context("Listener has no local address")?;
    info!("Listening on http://{}", local);

    tokio::pin!(shutdown);

    loop {
        let permit = tokio::select! {
            _ = &mut shutdown => break,
            permit = permits.clone().acquire_owned() => {
                permit.context("Connection semaphore closed")?
            }
        };

        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    continue;
                }
            },
        };

        let io = TokioIo::new(stream);
        let router = router.clone();
        let state = state.clone();

        tokio::task::spawn(async move {
            let _permit = permit;
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let router = router.clone();
                let state = state.clone();
                async move {
                    let response = match router.route(req, state).await {
                        Ok(response) => response,
                        Err(e) => {
                            error!("Handler error: {:#}", e);
                            internal_error()
                        }
                    };
                    Ok::<_, Infallible>(response)
                }
            });

            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                warn!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }

    info!("Shutdown signal received, no longer accepting connections");
    Ok(())
}

fn internal_error() -> hyper::Response<ResponseBody> {
    match deliver_error_json(
        "Something went wrong. Please try again later.",
        StatusCode::INTERNAL_SERVER_ERROR,
    ) {
        Ok(response) => response,
        Err(_) => {
            let mut response = hyper::Response::new(empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
