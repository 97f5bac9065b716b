use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
struct StaticAssets;

/// GET /favicon.ico
pub async fn favicon() -> Response {
    serve("favicon.ico")
}

/// GET /static/{*path}
pub async fn static_asset(Path(path): Path<String>) -> Response {
    serve(path.trim_start_matches('/'))
}

fn serve(path: &str) -> Response {
    match <StaticAssets as Embed>::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found\n").into_response(),
    }
}
