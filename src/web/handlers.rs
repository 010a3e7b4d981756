//! HTTP request handlers

use super::state::AppState;
use crate::locales::{format_date, parse_accept_language, table, tr, Locale};
use crate::presenter::View;
use crate::search::SearchMode;
use crate::session::Session;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "amanda_session";

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// `web` or `images`
    pub mode: Option<String>,
}

impl SearchParams {
    fn mode(&self) -> SearchMode {
        self.mode
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }

    /// Trimmed query text, if any is left
    fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Form carrying where to go back to
#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub language: Option<String>,
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// JSON body of `/api/search`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: SearchMode,
    pub view: View,
}

#[derive(Serialize)]
struct LocaleSwitch {
    code: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct HistoryRow {
    query: String,
    mode_label: &'static str,
    captured: String,
    link: String,
}

/// The session a request belongs to, plus a cookie to set if it is new
struct Visit {
    session: Arc<Session>,
    set_cookie: Option<HeaderValue>,
}

impl Visit {
    async fn resolve(state: &AppState, headers: &HeaderMap) -> Self {
        let language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_accept_language);

        let (session, created) = state
            .sessions
            .get_or_create(session_id(headers), language)
            .await;

        let set_cookie = if created {
            session_cookie(session.id(), state.settings.server.secure_cookies)
        } else {
            None
        };

        Self {
            session,
            set_cookie,
        }
    }

    fn finish(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let Some(cookie) = self.set_cookie {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        response
    }
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(unquote(value.trim())).ok())
}

/// Cookie values may be sent wrapped in double quotes
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn session_cookie(id: Uuid, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// Local paths only
fn return_target(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

fn search_link(text: &str, mode: SearchMode) -> String {
    format!("/search?q={}&mode={}", urlencoding::encode(text), mode)
}

async fn signed_out(state: &AppState, session: &Session) -> bool {
    state.auth_required() && state.identity.current_user(session.id()).await.is_none()
}

/// Values every page needs
async fn page_context(state: &AppState, session: &Session, return_to: &str) -> Context {
    let prefs = session.preferences();
    let locale = prefs.language;
    let other = locale.toggled();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("version", crate::VERSION);
    ctx.insert("t", &table(locale));
    ctx.insert("locale", locale.code());
    ctx.insert(
        "other_locale",
        &LocaleSwitch {
            code: other.code(),
            name: other.native_name(),
        },
    );
    ctx.insert("theme", prefs.theme.as_str());
    ctx.insert("incognito", &prefs.incognito);
    ctx.insert("user", &state.identity.current_user(session.id()).await);
    ctx.insert("return_to", return_to);
    ctx
}

fn history_rows(session: &Session, locale: Locale) -> Vec<HistoryRow> {
    session
        .history()
        .into_iter()
        .map(|entry| HistoryRow {
            link: search_link(&entry.query, entry.mode),
            mode_label: match entry.mode {
                SearchMode::Web => tr(locale, "web"),
                SearchMode::Images => tr(locale, "images"),
            },
            captured: format_date(locale, &entry.captured_at),
            query: entry.query,
        })
        .collect()
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Home page handler
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    if signed_out(&state, &visit.session).await {
        return visit.finish(Redirect::to("/auth"));
    }

    let locale = visit.session.language();
    let mut ctx = page_context(&state, &visit.session, "/").await;
    ctx.insert("query", "");
    ctx.insert("mode", SearchMode::Web.as_str());
    ctx.insert("history", &history_rows(&visit.session, locale));
    ctx.insert("quick_links", &state.settings.ui.quick_links);

    let response = render(&state, "index.html", &ctx);
    visit.finish(response)
}

/// Search page handler
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let visit = Visit::resolve(&state, &headers).await;

    let Some(text) = params.text() else {
        return visit.finish(Redirect::to("/"));
    };
    if signed_out(&state, &visit.session).await {
        return visit.finish(Redirect::to("/auth"));
    }

    let mode = params.mode();
    visit.session.submit(text, mode).await;

    let return_to = search_link(text, mode);
    let mut ctx = page_context(&state, &visit.session, &return_to).await;
    ctx.insert("query", text);
    ctx.insert("mode", mode.as_str());
    ctx.insert("view", &visit.session.view());

    let response = render(&state, "search.html", &ctx);
    visit.finish(response)
}

/// JSON search handler
pub async fn api_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let visit = Visit::resolve(&state, &headers).await;

    let Some(text) = params.text() else {
        return visit.finish((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Query is required" })),
        ));
    };
    if signed_out(&state, &visit.session).await {
        return visit.finish((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Sign-in required" })),
        ));
    }

    let mode = params.mode();
    visit.session.submit(text, mode).await;

    let response = SearchResponse {
        query: text.to_string(),
        mode,
        view: visit.session.view(),
    };
    visit.finish(Json(response))
}

/// Clear the session's search history
pub async fn clear_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    visit.session.clear_history();
    let target = return_target(form.return_to.as_deref());
    visit.finish(Redirect::to(target))
}

/// Set the interface language; without a value it switches to the other one
pub async fn set_language(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LanguageForm>,
) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    let language = form
        .language
        .as_deref()
        .and_then(Locale::from_code)
        .unwrap_or_else(|| visit.session.language().toggled());
    visit.session.set_language(language);

    let target = return_target(form.return_to.as_deref());
    visit.finish(Redirect::to(target))
}

pub async fn toggle_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    visit.session.toggle_theme();
    let target = return_target(form.return_to.as_deref());
    visit.finish(Redirect::to(target))
}

pub async fn toggle_incognito(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ReturnForm>,
) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    visit.session.toggle_incognito();
    let target = return_target(form.return_to.as_deref());
    visit.finish(Redirect::to(target))
}

/// Sign-in page handler
pub async fn auth_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    let mut ctx = page_context(&state, &visit.session, "/auth").await;
    ctx.insert("error", &None::<String>);
    ctx.insert("email", "");

    let response = render(&state, "auth.html", &ctx);
    visit.finish(response)
}

pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SignInForm>,
) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    let session_id = visit.session.id();

    match state
        .identity
        .sign_in(session_id, &form.email, &form.password)
        .await
    {
        Ok(_) => visit.finish(Redirect::to("/")),
        Err(e) => {
            let mut ctx = page_context(&state, &visit.session, "/auth").await;
            ctx.insert("error", e.localized(visit.session.language()));
            ctx.insert("email", form.email.trim());

            let response = render(&state, "auth.html", &ctx);
            let (mut parts, body) = response.into_parts();
            if parts.status == StatusCode::OK {
                parts.status = StatusCode::UNPROCESSABLE_ENTITY;
            }
            visit.finish(Response::from_parts(parts, body))
        }
    }
}

pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let visit = Visit::resolve(&state, &headers).await;
    state.identity.sign_out(visit.session.id()).await;

    let target = if state.auth_required() { "/auth" } else { "/" };
    visit.finish(Redirect::to(target))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
