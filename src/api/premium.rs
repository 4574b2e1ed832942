use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::models::MealResponse;
use crate::state::AppState;
use crate::utils::{parse_object_id, AppError};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PromoteRequest {
    #[serde(rename = "mealId")]
    pub meal_id: String,
}

/// POST /premium - moves a catalog meal into the upcoming listing
#[utoipa::path(
    post,
    path = "/premium",
    tag = "Premium",
    request_body = PromoteRequest,
    responses(
        (status = 200, description = "Meal moved"),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn promote_meal(
    state: web::Data<AppState>,
    request: web::Json<PromoteRequest>,
) -> Result<HttpResponse, AppError> {
    let meal_id = parse_object_id(&request.meal_id)?;
    log::info!("🚀 POST /premium - meal: {}", meal_id);

    match state.premium.promote(meal_id).await? {
        Some(_) => {
            log::info!("✅ Meal {} moved to upcoming meals", meal_id);
            Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Meal moved to upcoming meals" })))
        }
        None => Err(AppError::NotFound("Meal not found".into())),
    }
}

pub async fn list_premium(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let meals: Vec<MealResponse> = state
        .premium
        .find_all()
        .await?
        .into_iter()
        .map(MealResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(meals))
}
