use actix_web::{web, HttpResponse};

use crate::middleware::ensure_self;
use crate::models::{CreateUserRequest, DeleteResult, InsertResult, UpdateResult, User, UserResponse};
use crate::repository::RepoError;
use crate::services::Claims;
use crate::state::AppState;
use crate::utils::{parse_object_id, AppError};

fn already_exists() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "user already exists",
        "insertedId": null
    }))
}

/// POST /users - signup, idempotent on email
pub async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = User::from(request.into_inner());
    log::info!("📝 POST /users - email: {}", user.email);

    if state.users.find_by_email(&user.email).await?.is_some() {
        return Ok(already_exists());
    }

    match state.users.insert(user).await {
        Ok(id) => Ok(HttpResponse::Ok().json(InsertResult::inserted(id))),
        // Lost a race with a concurrent signup for the same email
        Err(RepoError::Duplicate(_)) => Ok(already_exists()),
        Err(e) => Err(e.into()),
    }
}

/// GET /users - admin only
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    log::info!("👥 GET /users");

    let users: Vec<UserResponse> = state
        .users
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Caller's own email")),
    responses(
        (status = 200, description = "`{ \"admin\": bool }`"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Email does not belong to the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_admin(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    ensure_self(&claims, &email)?;

    let admin = state
        .users
        .find_by_email(&email)
        .await?
        .map(|user| user.is_admin())
        .unwrap_or(false);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "admin": admin })))
}

/// PATCH /users/admin/{id} - admin only
pub async fn make_admin(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("⬆️  PATCH /users/admin/{}", id);

    let outcome = state.users.promote_to_admin(id).await?;
    if outcome.matched == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(HttpResponse::Ok().json(UpdateResult::from(outcome)))
}

/// DELETE /users/{id} - admin only
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️ DELETE /users/{}", id);

    let deleted = state.users.delete(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    Ok(HttpResponse::Ok().json(DeleteResult::deleted(deleted)))
}
