use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::{FilesState, UsersState};
use crate::{files, users};

pub fn build_viewer_app(state: FilesState) -> Router {
    let app = Router::new()
        .merge(files::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state);
    with_http_layers(app)
}

pub fn build_users_app(state: UsersState) -> Router {
    let app = Router::new()
        .merge(users::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state);
    with_http_layers(app)
}

fn with_http_layers(app: Router) -> Router {
    app.layer(CorsLayer::permissive()).layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
            })
            .on_response(
                |res: &axum::http::Response<_>,
                 _latency: std::time::Duration,
                 span: &tracing::Span| {
                    let status = res.status();
                    span.record("status", tracing::field::display(status));
                    if status.is_server_error() {
                        tracing::error!(%status, "response");
                    } else {
                        tracing::info!(%status, "response");
                    }
                },
            ),
    )
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
