pub mod assets;
pub mod error;
pub mod reqlog;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;

use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::set_header::SetResponseHeaderLayer;

pub use state::AppState;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
///
/// Middleware, innermost first: session gate, request log, cache headers.
/// The log sits outside the gate so login renders are logged too.
pub fn build_router(state: AppState) -> Router {
    let login_path = state.config.login_path.clone();

    Router::new()
        .route("/", get(routes::pages::index))
        .route(
            &login_path,
            get(session::login_form).post(session::login_submit),
        )
        // Estimation
        .route(
            "/estimation",
            get(routes::estimation::board).post(routes::estimation::update),
        )
        .route(
            "/tshirt",
            get(routes::estimation::board).post(routes::estimation::update),
        )
        .route("/sizing", get(routes::sizing::sizing_board))
        .route("/cfd", get(routes::pages::cfd))
        .route("/flow", get(routes::pages::flow))
        // Assets
        .route("/favicon.ico", get(assets::favicon))
        .route("/static/{*path}", get(assets::static_asset))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_gate,
        ))
        .layer(middleware::from_fn(reqlog::log_requests))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found\n")
}

/// Start the web UI on `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(state, listener).await
}

/// Like [`serve`], on a listener that is already bound.
pub async fn serve_on(state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let local = listener.local_addr()?;
    tracing::info!(
        addr = %local,
        jira = %state.config.jira_base,
        "wallie listening on http://{local}"
    );

    let app = build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
