use crate::errors::AppError;
use crate::identity::{self, Identity};
use crate::models::{
    AddEntryRequest, AddEntryResponse, DeleteEntryResponse, EntriesResponse, LoginRequest,
    ShareResponse, SharedBoardResponse, SuccessResponse, UsernameResponse,
};
use crate::share;
use crate::state::AppState;
use crate::stats::{summarize_now, Summary};
use crate::ui::{render_index, render_shared};
use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    Json,
};
use tracing::info;
use url::Url;

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let Some(identity) = identity::resolve(&headers) else {
        return Ok(Html(render_index(None, &Summary::default())));
    };
    let entries = state
        .log
        .list(identity.as_str())
        .await
        .map_err(AppError::context("Failed to fetch entries"))?;
    let summary = summarize_now(&entries);
    Ok(Html(render_index(Some(identity.as_str()), &summary)))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|_| AppError::bad_request("Invalid request body"))?;
    let identity = Identity::from_login(request.username.as_deref().unwrap_or_default())
        .map_err(AppError::context("Failed to set username"))?;

    info!(username = identity.as_str(), "login");
    let cookie = identity::login_cookie(&identity, state.secure_cookies);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(UsernameResponse {
            username: Some(identity.as_str().to_string()),
        }),
    ))
}

pub async fn whoami(headers: HeaderMap) -> Json<UsernameResponse> {
    Json(UsernameResponse {
        username: identity::resolve(&headers).map(|identity| identity.as_str().to_string()),
    })
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, identity::logout_cookie(state.secure_cookies))],
        Json(SuccessResponse { success: true }),
    )
}

pub async fn list_entries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EntriesResponse>, AppError> {
    let failure = AppError::context("Failed to fetch entries");
    let identity = identity::require(&headers).map_err(&failure)?;
    let entries = state.log.list(identity.as_str()).await.map_err(&failure)?;
    Ok(Json(EntriesResponse { entries }))
}

pub async fn add_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AddEntryRequest>, JsonRejection>,
) -> Result<Json<AddEntryResponse>, AppError> {
    let failure = AppError::context("Failed to add entry");
    let identity = identity::require(&headers).map_err(&failure)?;
    let Json(request) = payload.map_err(|_| AppError::bad_request("Invalid request body"))?;

    let (entry, entries) = state
        .log
        .append(identity.as_str(), request.word.as_deref().unwrap_or_default())
        .await
        .map_err(&failure)?;
    Ok(Json(AddEntryResponse { entry, entries }))
}

pub async fn clear_entries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    let failure = AppError::context("Failed to clear entries");
    let identity = identity::require(&headers).map_err(&failure)?;
    state.log.clear_all(identity.as_str()).await.map_err(&failure)?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeleteEntryResponse>, AppError> {
    let failure = AppError::context("Failed to delete entry");
    let identity = identity::require(&headers).map_err(&failure)?;
    let entries = state
        .log
        .remove(identity.as_str(), &id)
        .await
        .map_err(&failure)?;
    Ok(Json(DeleteEntryResponse {
        success: true,
        entries,
    }))
}

/// `DELETE /entries/` with nothing after the slash.
pub async fn delete_missing_id(headers: HeaderMap) -> AppError {
    match identity::require(&headers) {
        Ok(_) => AppError::bad_request("Entry ID is required"),
        Err(err) => AppError::context("Failed to delete entry")(err),
    }
}

pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Summary>, AppError> {
    let failure = AppError::context("Failed to fetch stats");
    let identity = identity::require(&headers).map_err(&failure)?;
    let entries = state.log.list(identity.as_str()).await.map_err(&failure)?;
    Ok(Json(summarize_now(&entries)))
}

pub async fn share_link(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ShareResponse>, AppError> {
    let failure = AppError::context("Failed to build share link");
    let identity = identity::require(&headers).map_err(&failure)?;
    let entries = state.log.list(identity.as_str()).await.map_err(&failure)?;

    let encoded = share::encode(&entries);
    let query = (!encoded.is_empty()).then(|| format!("{}={encoded}", share::SNAPSHOT_PARAM));
    let url = match public_origin(&headers, state.secure_cookies) {
        Some(mut url) => {
            url.set_path("/shared");
            url.set_query(query.as_deref());
            url.to_string()
        }
        None => match query {
            Some(query) => format!("/shared?{query}"),
            None => "/shared".to_string(),
        },
    };
    Ok(Json(ShareResponse { url }))
}

/// Origin the client reached us on, from the `Host` header. Deployments with
/// secure cookies are assumed to sit behind HTTPS.
fn public_origin(headers: &HeaderMap, secure: bool) -> Option<Url> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = if secure { "https" } else { "http" };
    Url::parse(&format!("{scheme}://{host}/")).ok()
}

fn shared_snapshot(query: Option<&str>) -> SharedBoardResponse {
    let entries = query
        .and_then(share::snapshot_param)
        .map(share::decode)
        .unwrap_or_default();
    let summary = summarize_now(&entries);
    SharedBoardResponse { entries, summary }
}

/// Read-only page for a shared snapshot; bad data shows an empty board.
pub async fn shared_board(RawQuery(query): RawQuery) -> Result<Html<String>, AppError> {
    let board = shared_snapshot(query.as_deref());
    render_shared(&board)
        .map(Html)
        .map_err(|err| AppError::internal("Failed to render shared board", err))
}

/// The same snapshot as [`shared_board`], as JSON.
pub async fn shared_board_json(RawQuery(query): RawQuery) -> Json<SharedBoardResponse> {
    Json(shared_snapshot(query.as_deref()))
}
