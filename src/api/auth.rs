use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;
use crate::utils::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Signs whatever object the client sends, valid for one hour.
pub async fn issue_token(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let Value::Object(claims) = payload.into_inner() else {
        return Err(AppError::BadRequest("Token payload must be a JSON object".into()));
    };

    log::info!(
        "🔐 POST /jwt - email: {}",
        claims.get("email").and_then(Value::as_str).unwrap_or("N/A")
    );

    let token = state.tokens.issue(claims).map_err(AppError::Internal)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
