use actix_web::{web, HttpResponse};
use mongodb::bson::oid::ObjectId;

use crate::middleware::ensure_self;
use crate::models::{AuthoredReviewResponse, Review, ReviewEditRequest, ReviewRequest, ReviewResponse};
use crate::services::Claims;
use crate::state::AppState;
use crate::utils::{parse_object_id, AppError};

fn review_not_found() -> AppError {
    AppError::NotFound("Review not found".into())
}

/// GET /meals/{id}/reviews
pub async fn list_reviews(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let meal_id = parse_object_id(&path)?;

    match state.meals.reviews(meal_id).await? {
        Some(reviews) => {
            let reviews: Vec<ReviewResponse> = reviews.into_iter().map(ReviewResponse::from).collect();
            Ok(HttpResponse::Ok().json(reviews))
        }
        None => Err(AppError::NotFound("Meal not found".into())),
    }
}

/// POST /meals/{id}/reviews
pub async fn add_review(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<ReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let meal_id = parse_object_id(&path)?;
    let request = request.into_inner();
    let review = Review {
        id: ObjectId::new(),
        user: request.user,
        comment: request.comment,
        rating: request.rating,
    };
    log::info!("⭐ POST /meals/{}/reviews - user: {}", meal_id, review.user);

    if state.meals.push_review(meal_id, review.clone()).await? == 0 {
        return Err(AppError::NotFound("Meal not found".into()));
    }

    Ok(HttpResponse::Ok().json(ReviewResponse::from(review)))
}

async fn remove_review(state: &AppState, meal_id: &str, review_id: &str) -> Result<HttpResponse, AppError> {
    let meal_id = parse_object_id(meal_id)?;
    let review_id = parse_object_id(review_id)?;
    log::info!("🗑️ Removing review {} from meal {}", review_id, meal_id);

    if state.meals.pull_review(meal_id, review_id).await? == 0 {
        return Err(review_not_found());
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Review deleted successfully" })))
}

/// DELETE /meals/{id}/reviews/{review_id}
pub async fn delete_meal_review(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (meal_id, review_id) = path.into_inner();
    remove_review(&state, &meal_id, &review_id).await
}

/// DELETE /reviews/{meal_id}/{review_id} - requires a token
pub async fn delete_review(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (meal_id, review_id) = path.into_inner();
    remove_review(&state, &meal_id, &review_id).await
}

/// DELETE /meals/{id}/reviews - removes reviews matching the body exactly
pub async fn delete_matching_review(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<ReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let meal_id = parse_object_id(&path)?;

    if state.meals.pull_matching_review(meal_id, request.into_inner()).await? > 0 {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Review deleted successfully"
        })))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "message": "Review not found"
        })))
    }
}

/// PUT /reviews/{meal_id}/{review_id} - requires a token
pub async fn edit_review(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<ReviewEditRequest>,
) -> Result<HttpResponse, AppError> {
    let (meal_id, review_id) = path.into_inner();
    let meal_id = parse_object_id(&meal_id)?;
    let review_id = parse_object_id(&review_id)?;
    let ReviewEditRequest { comment, rating } = request.into_inner();

    if state.meals.edit_review(meal_id, review_id, comment, rating).await? == 0 {
        return Err(review_not_found());
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Review updated successfully" })))
}

/// GET /reviews/{email} - the caller's reviews across all meals
pub async fn reviews_by_user(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    ensure_self(&claims, &email)?;

    let reviews: Vec<AuthoredReviewResponse> = state
        .meals
        .reviewed_by(&email)
        .await?
        .iter()
        .flat_map(|meal| meal.reviews_by(&email))
        .collect();

    Ok(HttpResponse::Ok().json(reviews))
}
