use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use ghostnet_types::api::{ReportNetRequest, UpdateStatusRequest};
use ghostnet_types::models::GhostNet;

use crate::AppState;
use crate::error::{ApiError, ApiResult, join_error};

/// Header carrying the id of the logged-in user on submissions. Absent
/// means the report is anonymous.
const USER_ID_HEADER: &str = "x-user-id";

pub async fn list_nets(State(state): State<AppState>) -> ApiResult<Json<Vec<GhostNet>>> {
    let registry = state.registry.clone();
    let nets = tokio::task::spawn_blocking(move || registry.list())
        .await
        .map_err(join_error)??;
    Ok(Json(nets))
}

pub async fn submit_net(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ReportNetRequest>,
) -> ApiResult<impl IntoResponse> {
    let reporter = reporter_from_headers(&headers)?;

    let registry = state.registry.clone();
    let net = tokio::task::spawn_blocking(move || registry.submit(req, reporter))
        .await
        .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(net)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<GhostNet>> {
    let registry = state.registry.clone();
    let net = tokio::task::spawn_blocking(move || registry.update_status(id, req))
        .await
        .map_err(join_error)??;
    Ok(Json(net))
}

fn reporter_from_headers(headers: &HeaderMap) -> ApiResult<Option<i64>> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| {
            ApiError::Validation(format!("{}: header must be a numeric user id", USER_ID_HEADER))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reporter_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(reporter_from_headers(&headers).unwrap(), None);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        assert_eq!(reporter_from_headers(&headers).unwrap(), Some(42));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-number"));
        assert!(matches!(
            reporter_from_headers(&headers).unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
