use axum::extract::{Query, State};
use axum::response::Html;
use wallie_core::ids::ProjectId;

use super::ProjectQuery;
use crate::error::AppError;
use crate::session::BrowserCookies;
use crate::state::AppState;

/// GET /sizing?project=ID: read-only board with one column per size.
pub async fn sizing_board(
    State(app): State<AppState>,
    BrowserCookies(cookies): BrowserCookies,
    Query(query): Query<ProjectQuery>,
) -> Result<Html<String>, AppError> {
    let project = ProjectId::parse(&query.project)?;
    let backlog = app.jira.backlog(&project, &cookies).await?;
    let page = app.templates.current()?.sizing_board(&backlog)?;
    Ok(Html(page))
}
