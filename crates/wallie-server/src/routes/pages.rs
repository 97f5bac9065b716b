use axum::extract::{Query, State};
use axum::response::Html;
use wallie_core::ids::ProjectId;

use super::ProjectQuery;
use crate::error::AppError;
use crate::state::AppState;

/// GET /
pub async fn index() -> &'static str {
    "projects\n"
}

/// GET /cfd?project=ID: placeholder until the flow diagram exists.
pub async fn cfd(Query(query): Query<ProjectQuery>) -> Result<String, AppError> {
    let project = ProjectId::parse(&query.project)?;
    Ok(format!("cfd {project}\n"))
}

/// GET /flow
pub async fn flow(State(app): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(app.templates.current()?.flow()?))
}
