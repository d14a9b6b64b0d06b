use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ghostnet_types::api::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateUserRequest,
};
use ghostnet_types::models::User;

use crate::AppState;
use crate::error::{ApiResult, join_error};

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let directory = state.directory.clone();
    let users = tokio::task::spawn_blocking(move || directory.list())
        .await
        .map_err(join_error)??;
    Ok(Json(users))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let directory = state.directory.clone();
    // argon2 hashing is CPU-bound, keep it off the async runtime
    let user = tokio::task::spawn_blocking(move || directory.register(req))
        .await
        .map_err(join_error)??;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            role: user.role,
            message: "registration successful".into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let directory = state.directory.clone();
    let user = tokio::task::spawn_blocking(move || directory.login(&req))
        .await
        .map_err(join_error)??;

    // A credential mismatch is a negative result: 401 with a body, not
    // an error response.
    let response = match user {
        Some(user) => (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: "login successful".into(),
                user: Some(user),
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: "invalid username or password".into(),
                user: None,
            }),
        ),
    };
    Ok(response.into_response())
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let directory = state.directory.clone();
    let user = tokio::task::spawn_blocking(move || directory.update_profile(id, req))
        .await
        .map_err(join_error)??;
    Ok(Json(user))
}
