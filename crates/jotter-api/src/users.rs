use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
};

use jotter_types::api::{ApiResponse, Claims};
use jotter_types::models::User;

use crate::{ApiError, AppState, run_blocking};

pub async fn get_user(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let Path(user_id) = path?;

    let users = state.users.clone();
    let row = run_blocking(move || {
        users
            .find_by_id(user_id)
            .map_err(|e| ApiError::from_store(e, "user"))
    })
    .await?;

    Ok(Json(ApiResponse::with_data("success", row.into())))
}
