use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use jotter_auth::validate_token;

use crate::{ApiError, AppState};

/// Extract and validate the bearer token, then hand the claims to the
/// handler through request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| ApiError::Unauthorized)?;

    let claims = validate_token(&state.auth, bearer.token())?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
