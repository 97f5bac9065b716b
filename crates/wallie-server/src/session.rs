//! Session gate and login flow.
//!
//! The tracker owns the session: a request is authenticated when the browser
//! carries the tracker's session cookie, nothing more. Without it the gate
//! remembers where the user was heading in a short-lived cookie and shows
//! the login form. Submitting the form exchanges the credentials with the
//! tracker, hands the tracker's cookies to the browser and sends the user
//! back where they started.
//!
//! Per request exactly one of these happens:
//! 1. public path (login page, favicon, `/static/`) → passthrough
//! 2. session cookie present → passthrough
//! 3. otherwise → login form, capturing the requested path+query

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use wallie_core::cookies::Cookies;
use wallie_core::error::WallieError;

use crate::error::AppError;
use crate::state::AppState;

pub const REDIRECT_COOKIE: &str = "wallieRedirect";

/// Lifetime of the pending-redirect cookie.
pub const REDIRECT_MAX_AGE_SECS: u64 = 5 * 60;

/// Cap on tracker session cookies, whatever the tracker asked for.
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60;

const FAVICON_PATH: &str = "/favicon.ico";
const STATIC_PREFIX: &str = "/static/";

// ---------------------------------------------------------------------------
// Browser cookies extractor
// ---------------------------------------------------------------------------

/// All cookies sent by the browser, in header order.
#[derive(Debug, Clone, Default)]
pub struct BrowserCookies(pub Cookies);

impl<S> FromRequestParts<S> for BrowserCookies
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(cookies_from_headers(&parts.headers)))
    }
}

pub fn cookies_from_headers(headers: &HeaderMap) -> Cookies {
    let mut cookies = Cookies::new();
    for value in headers.get_all(COOKIE) {
        if let Ok(raw) = value.to_str() {
            cookies.extend_from_header(raw);
        }
    }
    cookies
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Axum middleware guarding every route except the public ones.
pub async fn session_gate(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();
    if is_public_path(path, &app.config.login_path) {
        return next.run(req).await;
    }

    let cookies = cookies_from_headers(req.headers());
    if cookies.has(&app.config.session_name) {
        return next.run(req).await;
    }

    let requested = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    tracing::debug!(requested = %requested, method = %req.method(), "no session, showing login");

    // Any method gets the form.
    login_page(&app, &cookies, &requested).unwrap_or_else(IntoResponse::into_response)
}

fn is_public_path(path: &str, login_path: &str) -> bool {
    path == login_path || path == FAVICON_PATH || path.starts_with(STATIC_PREFIX)
}

// ---------------------------------------------------------------------------
// Login handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default, alias = "username")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET {login_path}
///
/// Visiting the login page directly makes `/` the destination, unless a
/// redirect is already pending.
pub async fn login_form(
    State(app): State<AppState>,
    BrowserCookies(cookies): BrowserCookies,
) -> Result<Response, AppError> {
    login_page(&app, &cookies, "/")
}

/// POST {login_path}
pub async fn login_submit(
    State(app): State<AppState>,
    BrowserCookies(cookies): BrowserCookies,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(pending) = pending_redirect(&cookies) else {
        return Err(WallieError::LoginFlow.into());
    };
    let target = local_target(pending).to_string();

    let session = app.jira.create_session(&form.email, &form.password).await?;
    tracing::info!(user = %form.email, cookies = session.len(), "login succeeded");

    let page = app.templates.current()?.login_redirect(&target)?;
    let mut resp = Html(page).into_response();
    let secure = !app.config.is_insecure;
    for (name, value) in session.iter() {
        append_cookie(
            resp.headers_mut(),
            &set_cookie(name, value, SESSION_MAX_AGE_SECS, secure),
        )?;
    }
    append_cookie(resp.headers_mut(), &clear_cookie(REDIRECT_COOKIE, secure))?;
    Ok(resp)
}

fn login_page(app: &AppState, cookies: &Cookies, requested: &str) -> Result<Response, AppError> {
    let page = app.templates.current()?.login(&app.config.login_path)?;
    let mut resp = Html(page).into_response();
    if pending_redirect(cookies).is_none() {
        let secure = !app.config.is_insecure;
        append_cookie(
            resp.headers_mut(),
            &set_cookie(
                REDIRECT_COOKIE,
                &cookie_safe(requested),
                REDIRECT_MAX_AGE_SECS,
                secure,
            ),
        )?;
    }
    Ok(resp)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The captured destination, if any. An empty cookie counts as none.
fn pending_redirect(cookies: &Cookies) -> Option<&str> {
    cookies.get(REDIRECT_COOKIE).filter(|v| !v.is_empty())
}

fn set_cookie(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_cookie(name: &str, secure: bool) -> String {
    set_cookie(name, "", 0, secure)
}

fn append_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError(anyhow::anyhow!("invalid cookie '{cookie}': {e}")))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

/// Percent-encode the bytes a cookie value may not carry.
fn cookie_safe(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b';' | b',' | b'"' | b'\\' | b' ' => out.push_str(&format!("%{b:02X}")),
            0x21..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Only same-site absolute paths are followed after login.
fn local_target(pending: &str) -> &str {
    if pending.starts_with('/') && !pending.starts_with("//") && !pending.contains('\\') {
        pending
    } else {
        "/"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
