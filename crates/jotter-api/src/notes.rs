use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use jotter_db::models::NoteChanges;
use jotter_types::api::{ApiResponse, Claims, CreatedNote, NotePayload};
use jotter_types::models::Note;

use crate::error::require;
use crate::{ApiError, AppState, run_blocking};

fn validate(payload: &NotePayload) -> Result<(), ApiError> {
    require("title", &payload.title)?;
    require("description", &payload.description)
}

pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    validate(&req)?;

    let notes = state.notes.clone();
    let owner = req.user_id;
    let id = run_blocking(move || {
        Ok(notes.create_note(req.user_id, &req.title, &req.description)?)
    })
    .await?;

    info!("Created note {} for user {}", id, owner);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("create success", CreatedNote { id })),
    ))
}

/// Every note in the store, whoever owns it.
pub async fn list_notes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Note>>>, ApiError> {
    let notes = state.notes.clone();
    let rows = run_blocking(move || Ok(notes.list_notes()?)).await?;

    let notes: Vec<Note> = rows.into_iter().map(Note::from).collect();
    Ok(Json(ApiResponse::with_data("success", notes)))
}

pub async fn get_note(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Note>>, ApiError> {
    let Path(id) = path?;

    let notes = state.notes.clone();
    let row = run_blocking(move || {
        notes
            .get_note(id)
            .map_err(|e| ApiError::from_store(e, "note"))
    })
    .await?;

    Ok(Json(ApiResponse::with_data("success", row.into())))
}

pub async fn update_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    validate(&req)?;

    let changes = NoteChanges {
        user_id: req.user_id,
        title: req.title,
        description: req.description,
    };

    let notes = state.notes.clone();
    run_blocking(move || {
        notes
            .update_note(id, &changes)
            .map_err(|e| ApiError::from_store(e, "note"))
    })
    .await?;

    info!("User {} updated note {}", claims.sub, id);

    Ok(Json(ApiResponse::with_data("update success", id)))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<i64>>, ApiError> {
    let Path(id) = path?;

    let notes = state.notes.clone();
    run_blocking(move || {
        notes
            .delete_note(id)
            .map_err(|e| ApiError::from_store(e, "note"))
    })
    .await?;

    info!("User {} deleted note {}", claims.sub, id);

    Ok(Json(ApiResponse::with_data("delete success", id)))
}
