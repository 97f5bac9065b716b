//! Backlog estimation board.
//!
//! `GET` renders the board with the edit dialogue. `POST` first writes the
//! submitted story back to the tracker, then renders the board so the card
//! shows up in its new column.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use wallie_core::cookies::Cookies;
use wallie_core::ids::ProjectId;
use wallie_core::size::Size;

use super::ProjectQuery;
use crate::error::AppError;
use crate::session::BrowserCookies;
use crate::state::AppState;

/// Fields posted by the estimate dialogue.
#[derive(Debug, Deserialize)]
pub struct StoryForm {
    #[serde(alias = "key")]
    pub id: String,
    #[serde(default, alias = "summary")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Size label; empty keeps the current estimate.
    #[serde(default)]
    pub size: String,
}

impl StoryForm {
    /// `None` leaves the tracker's points as they are. `Unsized` is the same
    /// as no choice.
    pub fn estimate(&self) -> Option<Size> {
        Size::from_label(&self.size).filter(|size| *size != Size::Unsized)
    }
}

/// GET /estimation, GET /tshirt
pub async fn board(
    State(app): State<AppState>,
    BrowserCookies(cookies): BrowserCookies,
    Query(query): Query<ProjectQuery>,
) -> Result<Html<String>, AppError> {
    let project = ProjectId::parse(&query.project)?;
    render(&app, &project, &cookies).await
}

/// POST /estimation, POST /tshirt
pub async fn update(
    State(app): State<AppState>,
    BrowserCookies(cookies): BrowserCookies,
    Query(query): Query<ProjectQuery>,
    Form(form): Form<StoryForm>,
) -> Result<Html<String>, AppError> {
    let project = ProjectId::parse(&query.project)?;
    app.jira
        .update_issue(
            &form.id,
            &form.title,
            &form.description,
            form.estimate(),
            &cookies,
        )
        .await?;
    render(&app, &project, &cookies).await
}

async fn render(
    app: &AppState,
    project: &ProjectId,
    cookies: &Cookies,
) -> Result<Html<String>, AppError> {
    let backlog = app.jira.backlog(project, cookies).await?;
    let page = app.templates.current()?.story_estimation_page(&backlog)?;
    Ok(Html(page))
}
