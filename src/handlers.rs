use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use chrono::Local;
use serde_json::json;

use crate::booking::{self, BookingOutcome};
use crate::error::ApiError;
use crate::models::User;
use crate::session::{self, CurrentUser, MaybeUser};
use crate::{AppState, auth, schedule};

#[derive(Debug, serde::Deserialize)]
pub struct AdminQuery {
    pub token: Option<String>,
}

async fn session_response(
    state: &AppState,
    user: User,
    status: StatusCode,
) -> Result<Response, ApiError> {
    let ttl_days = state.settings.session_ttl_days;
    let created = session::create_session(&state.db, user.id, ttl_days).await?;
    let cookie = session::build_session_cookie(
        &created.token,
        ttl_days * 24 * 3600,
        !state.settings.debug,
    );
    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "user": user })),
    )
        .into_response())
}

#[utoipa::path(get, path = "/", tag = "pages")]
pub async fn root(
    State(state): State<AppState>,
    MaybeUser(current_user): MaybeUser,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let schedule = schedule::week_schedule(&state.db, today).await?;
    Ok(Json(json!({
        "current_user": current_user,
        "schedule": schedule,
    })))
}

#[utoipa::path(get, path = "/healthz/live", tag = "health")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "health")]
pub async fn healthz_ready(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    sqlx::query("SELECT 1").execute(&state.db).await?;
    Ok(Json(json!({"status": "ok"})))
}

#[utoipa::path(get, path = "/register", tag = "auth")]
pub async fn register_form() -> impl IntoResponse {
    Json(json!({
        "required": ["full_name", "email", "password"],
        "optional": ["phone", "gender", "birthday"],
    }))
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = auth::RegisterRequest,
    responses(
        (status = 201, description = "Account created, session started"),
        (status = 400, description = "Missing required fields"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<auth::RegisterRequest>,
) -> Result<Response, ApiError> {
    let user = auth::register(&state.db, request).await?;
    session_response(&state, user, StatusCode::CREATED).await
}

#[utoipa::path(get, path = "/login", tag = "auth")]
pub async fn login_form() -> impl IntoResponse {
    Json(json!({ "required": ["email", "password"] }))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = auth::LoginRequest,
    responses(
        (status = 200, description = "Session started"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<auth::LoginRequest>,
) -> Result<Response, ApiError> {
    let user = auth::login(&state.db, &request.email, &request.password).await?;
    session_response(&state, user, StatusCode::OK).await
}

#[utoipa::path(get, path = "/logout", tag = "auth")]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let token = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session::extract_session_token);
    if let Some(token) = token {
        session::delete_session(&state.db, &token).await?;
    }
    let cookie = session::build_clear_cookie(!state.settings.debug);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({"status": "logged_out"})),
    )
        .into_response())
}

#[utoipa::path(get, path = "/classes", tag = "pages")]
pub async fn classes_page() -> impl IntoResponse {
    Json(json!({
        "classes": [
            {"title": "Hatha Yoga", "level": "all levels"},
            {"title": "Vinyasa Flow", "level": "intermediate"},
            {"title": "Yin Yoga", "level": "all levels"},
        ]
    }))
}

#[utoipa::path(get, path = "/pricing", tag = "pages")]
pub async fn pricing(MaybeUser(current_user): MaybeUser) -> impl IntoResponse {
    Json(json!({
        "current_user": current_user,
        "plans": [
            {"name": "Drop-in", "classes": 1},
            {"name": "Monthly", "classes": 8},
            {"name": "Unlimited", "classes": null},
        ]
    }))
}

#[utoipa::path(
    get,
    path = "/book/{class_id}",
    params(("class_id" = i64, Path, description = "Class to book")),
    responses(
        (status = 200, description = "Class details with availability"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Unknown class")
    ),
    security(("session_cookie" = [])),
    tag = "booking"
)]
pub async fn book_form(
    State(state): State<AppState>,
    CurrentUser(current_user): CurrentUser,
    Path(class_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let class = booking::class_with_spots(&state.db, class_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("class {class_id}")))?;
    Ok(Json(json!({
        "current_user": current_user,
        "class": class,
    })))
}

#[utoipa::path(
    post,
    path = "/book/{class_id}",
    params(("class_id" = i64, Path, description = "Class to book")),
    responses(
        (status = 201, description = "Spot reserved"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Unknown class"),
        (status = 409, description = "Class is fully booked")
    ),
    security(("session_cookie" = [])),
    tag = "booking"
)]
pub async fn book(
    State(state): State<AppState>,
    CurrentUser(current_user): CurrentUser,
    Path(class_id): Path<i64>,
) -> Result<Response, ApiError> {
    match booking::book(&state.db, class_id, &current_user).await? {
        BookingOutcome::Booked { class, booking } => Ok((
            StatusCode::CREATED,
            Json(json!({"status": "booked", "class": class, "booking": booking})),
        )
            .into_response()),
        BookingOutcome::Full { class } => Ok((
            StatusCode::CONFLICT,
            Json(json!({"status": "full", "class": class})),
        )
            .into_response()),
    }
}

#[utoipa::path(
    get,
    path = "/my-classes",
    responses(
        (status = 200, description = "The user's bookings, split into future and past"),
        (status = 401, description = "Authentication required")
    ),
    security(("session_cookie" = [])),
    tag = "booking"
)]
pub async fn my_classes(
    State(state): State<AppState>,
    CurrentUser(current_user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let (future, past) = booking::bookings_for_user(&state.db, current_user.id, today).await?;
    Ok(Json(json!({
        "current_user": current_user,
        "future": future,
        "past": past,
    })))
}

#[utoipa::path(
    get,
    path = "/admin/bookings",
    params(
        ("token" = Option<String>, Query, description = "Admin token (alternative to Bearer header)")
    ),
    responses(
        (status = 200, description = "All bookings, newest first"),
        (status = 401, description = "Invalid authentication token")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "admin"
)]
pub async fn admin_bookings(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = bearer.map(|TypedHeader(a)| a);
    auth::verify_admin_token(&state.settings, auth_header, query.token.as_deref())?;

    let bookings = booking::all_bookings(&state.db).await?;
    Ok(Json(json!({ "bookings": bookings })))
}

#[utoipa::path(get, path = "/schedule", tag = "pages")]
pub async fn schedule_page(
    State(state): State<AppState>,
    MaybeUser(current_user): MaybeUser,
) -> Result<impl IntoResponse, ApiError> {
    let today = Local::now().date_naive();
    let schedule = schedule::week_schedule(&state.db, today).await?;
    Ok(Json(json!({
        "current_user": current_user,
        "schedule": schedule,
    })))
}
