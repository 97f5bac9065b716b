//! Jira REST client.
//!
//! Every call is made on behalf of the browser: the caller passes the
//! browser's cookies and they are relayed verbatim, so the tracker decides
//! what the user may see and change.

use crate::backlog::{Backlog, Story};
use crate::cookies::{parse_set_cookie, Cookies};
use crate::error::{Result, WallieError};
use crate::ids::{IssueKey, ProjectId};
use crate::size::{PointScheme, Size};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: usize = 100;

/// Upper bound on search pages per listing (100 000 issues).
pub const MAX_PAGES: usize = 1000;

const STORY_POINTS_FIELD: &str = "customfield_10006";

const SEARCH_FIELDS: &[&str] = &["summary", STORY_POINTS_FIELD, "description", "reporter"];

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    jql: String,
    start_at: usize,
    max_results: usize,
    fields: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct Issue {
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "customfield_10006", default)]
    story_points: Option<f64>,
    #[serde(default)]
    reporter: Option<Reporter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reporter {
    #[serde(default)]
    display_name: String,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    fields: UpdateFields<'a>,
}

#[derive(Serialize)]
struct UpdateFields<'a> {
    summary: &'a str,
    description: &'a str,
    #[serde(rename = "customfield_10006", skip_serializing_if = "Option::is_none")]
    story_points: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorCollection {
    #[serde(default)]
    error_messages: Vec<String>,
}

impl Issue {
    fn into_story(self) -> Story {
        Story {
            id: self.key,
            title: self.fields.summary,
            description: self.fields.description.unwrap_or_default(),
            author: self
                .fields
                .reporter
                .map(|r| r.display_name)
                .unwrap_or_default(),
            size: self
                .fields
                .story_points
                .map(Size::from_points)
                .unwrap_or(Size::Unsized),
        }
    }
}

fn backlog_jql(project: &ProjectId) -> String {
    format!(
        r#"type = Story AND project = "{project}" AND status not in (Done, Closed) ORDER BY rank"#
    )
}

/// Prefer Jira's `errorMessages` over the raw body when present.
fn tracker_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorCollection>(body) {
        Ok(errors) if !errors.error_messages.is_empty() => errors.error_messages.join("; "),
        _ => body.trim().to_string(),
    }
}

/// Detail of a failed response. A body that cannot be read says so.
async fn response_detail(resp: reqwest::Response) -> String {
    match resp.text().await {
        Ok(body) => tracker_detail(&body),
        Err(e) => format!("response body unreadable: {e}"),
    }
}

fn with_cookies(builder: RequestBuilder, cookies: &Cookies) -> RequestBuilder {
    match cookies.header_value() {
        Some(value) => builder.header(COOKIE, value),
        None => builder,
    }
}

// ---------------------------------------------------------------------------
// JiraClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    base: String,
    scheme: PointScheme,
}

impl JiraClient {
    pub fn new(base: impl Into<String>, scheme: PointScheme) -> Self {
        Self::with_http(reqwest::Client::new(), base, scheme)
    }

    pub fn with_http(http: reqwest::Client, base: impl Into<String>, scheme: PointScheme) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            scheme,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn browse_url(&self) -> String {
        format!("{}/browse/", self.base)
    }

    /// Exchange credentials for tracker session cookies.
    ///
    /// Transport failures and non-2xx answers are both `Auth` errors: the
    /// user has to try again either way.
    pub async fn create_session(&self, username: &str, password: &str) -> Result<Cookies> {
        let url = format!("{}/rest/auth/1/session", self.base);
        let resp = self
            .http
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| WallieError::Auth(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WallieError::Auth(format!(
                "{} => {}",
                status.as_u16(),
                response_detail(resp).await
            )));
        }

        let mut cookies = Cookies::new();
        for value in resp.headers().get_all(SET_COOKIE) {
            if let Some((name, value)) = value.to_str().ok().and_then(parse_set_cookie) {
                cookies.push(name, value);
            }
        }
        tracing::debug!(count = cookies.len(), "tracker session created");
        Ok(cookies)
    }

    /// All open stories of `project` in rank order, fetched a page at a time.
    ///
    /// Stops once the tracker-reported total is reached. A failed page fails
    /// the whole listing; an empty page before the total is reached is a
    /// stall and also fails.
    pub async fn list_issues(&self, project: &ProjectId, cookies: &Cookies) -> Result<Vec<Story>> {
        let mut stories = Vec::new();

        for page in 0..MAX_PAGES {
            let start_at = page * PAGE_SIZE;
            let resp = self.search_page(project, cookies, start_at).await?;
            let fetched = resp.issues.len();
            stories.extend(resp.issues.into_iter().map(Issue::into_story));

            let is_last = stories.len() >= resp.total;
            tracing::debug!(
                project = %project,
                fetched,
                start_at,
                total = resp.total,
                is_last,
                "read issue page"
            );
            if is_last {
                return Ok(stories);
            }
            if fetched == 0 {
                return Err(WallieError::FetchStalled {
                    start_at,
                    total: resp.total,
                    received: stories.len(),
                });
            }
        }

        Err(WallieError::TooManyPages(MAX_PAGES))
    }

    pub async fn backlog(&self, project: &ProjectId, cookies: &Cookies) -> Result<Backlog> {
        let stories = self.list_issues(project, cookies).await?;
        Ok(Backlog {
            project: project.to_string(),
            stories,
            base_url: self.browse_url(),
        })
    }

    async fn search_page(
        &self,
        project: &ProjectId,
        cookies: &Cookies,
        start_at: usize,
    ) -> Result<SearchResponse> {
        let fetch_err = |reason: String| WallieError::Fetch { start_at, reason };

        let request = SearchRequest {
            jql: backlog_jql(project),
            start_at,
            max_results: PAGE_SIZE,
            fields: SEARCH_FIELDS,
        };
        let url = format!("{}/rest/api/2/search", self.base);
        let resp = with_cookies(self.http.post(url).json(&request), cookies)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(fetch_err(format!("unexpected status code {}", status.as_u16())));
        }

        let body = resp.text().await.map_err(|e| fetch_err(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(body = %body, "unparseable search response");
            fetch_err(e.to_string())
        })
    }

    /// Partial update of summary, description and, when given, the estimate.
    ///
    /// `estimate: None` leaves the tracker's story points untouched. The key
    /// is validated before anything is sent.
    pub async fn update_issue(
        &self,
        key: &str,
        summary: &str,
        description: &str,
        estimate: Option<Size>,
        cookies: &Cookies,
    ) -> Result<()> {
        let key = IssueKey::parse(key)?;
        let request = UpdateRequest {
            fields: UpdateFields {
                summary,
                description,
                story_points: estimate.map(|size| size.to_points(self.scheme)),
            },
        };

        tracing::info!(key = %key, size = ?estimate, "update story");

        let url = format!("{}/rest/api/2/issue/{}", self.base, key);
        let resp = with_cookies(self.http.put(url).json(&request), cookies)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::NO_CONTENT {
            return Err(WallieError::Update {
                status: status.as_u16(),
                body: response_detail(resp).await,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
