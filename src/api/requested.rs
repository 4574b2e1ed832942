use actix_web::{web, HttpResponse};

use crate::models::{
    DeleteResult, EmailFilter, InsertResult, NewRequestedMeal, RequestedMeal, RequestedMealResponse, UpdateResult,
};
use crate::state::AppState;
use crate::utils::{parse_object_id, AppError};

fn request_not_found() -> AppError {
    AppError::NotFound("Request not found".into())
}

async fn list_for(state: &AppState, email: Option<&str>) -> Result<HttpResponse, AppError> {
    let requests: Vec<RequestedMealResponse> = state
        .requested
        .find(email)
        .await?
        .into_iter()
        .map(RequestedMealResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(requests))
}

/// GET /requested?email=<owner>
pub async fn list_requested(
    state: web::Data<AppState>,
    query: web::Query<EmailFilter>,
) -> Result<HttpResponse, AppError> {
    let email = query
        .into_inner()
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::BadRequest("email query parameter is required".into()))?;

    list_for(&state, Some(&email)).await
}

/// POST /requestedMeal - optional `email` in the body narrows the listing
pub async fn search_requested(
    state: web::Data<AppState>,
    filter: Option<web::Json<EmailFilter>>,
) -> Result<HttpResponse, AppError> {
    let email = filter
        .and_then(|filter| filter.into_inner().email)
        .filter(|email| !email.is_empty());

    list_for(&state, email.as_deref()).await
}

pub async fn create_request(
    state: web::Data<AppState>,
    request: web::Json<NewRequestedMeal>,
) -> Result<HttpResponse, AppError> {
    let request = RequestedMeal::from(request.into_inner());
    log::info!("🛎️ POST /requested - email: {}, meal: {}", request.email, request.meal_id);

    let id = state.requested.insert(request).await?;
    Ok(HttpResponse::Ok().json(InsertResult::inserted(id)))
}

pub async fn delete_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️ DELETE /requested/{}", id);

    let deleted = state.requested.delete(id).await?;
    if deleted == 0 {
        return Err(request_not_found());
    }

    Ok(HttpResponse::Ok().json(DeleteResult::deleted(deleted)))
}

/// PATCH /requested/serve/{id}
pub async fn serve_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🍛 PATCH /requested/serve/{}", id);

    let outcome = state.requested.mark_delivered(id).await?;
    if outcome.matched == 0 {
        return Err(request_not_found());
    }

    Ok(HttpResponse::Ok().json(UpdateResult::from(outcome)))
}
