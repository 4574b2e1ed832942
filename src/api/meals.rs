use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::models::{DeleteResult, InsertResult, LikesRequest, MealPayload, MealResponse, UpdateResult};
use crate::state::AppState;
use crate::utils::{parse_object_id, AppError};

#[derive(Debug, Deserialize)]
pub struct CreatorQuery {
    pub email: Option<String>,
}

fn meal_not_found() -> AppError {
    AppError::NotFound("Meal not found".into())
}

#[utoipa::path(
    get,
    path = "/meals",
    tag = "Meals",
    responses((status = 200, description = "Whole catalog", body = [MealResponse]))
)]
pub async fn list_meals(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let meals: Vec<MealResponse> = state
        .meals
        .find_all()
        .await?
        .into_iter()
        .map(MealResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(meals))
}

/// POST /meals?email=<creator>
pub async fn create_meal(
    state: web::Data<AppState>,
    query: web::Query<CreatorQuery>,
    payload: web::Json<MealPayload>,
) -> Result<HttpResponse, AppError> {
    let creator = query
        .into_inner()
        .email
        .filter(|email| !email.is_empty())
        .unwrap_or_else(|| state.default_creator_email.clone());
    log::info!("🍽️ POST /meals - creator: {}", creator);

    let meal = payload
        .into_inner()
        .into_meal(creator)
        .map_err(|_| AppError::invalid_id())?;
    let id = state.meals.insert(meal).await?;

    Ok(HttpResponse::Ok().json(InsertResult::inserted(id)))
}

#[utoipa::path(
    get,
    path = "/meals/{id}",
    tag = "Meals",
    params(("id" = String, Path, description = "Meal id")),
    responses(
        (status = 200, description = "The meal", body = MealResponse),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn get_meal(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;

    match state.meals.find_by_id(id).await? {
        Some(meal) => Ok(HttpResponse::Ok().json(MealResponse::from(meal))),
        None => Err(meal_not_found()),
    }
}

/// PUT /meals/{id} - full-field update, creates the meal when absent
pub async fn update_meal(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<MealPayload>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("✏️ PUT /meals/{}", id);

    let fields = payload
        .into_inner()
        .into_fields()
        .map_err(|_| AppError::invalid_id())?;
    let outcome = state.meals.upsert_fields(id, fields).await?;

    Ok(HttpResponse::Ok().json(UpdateResult::from(outcome)))
}

pub async fn delete_meal(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️ DELETE /meals/{}", id);

    let deleted = state.meals.delete(id).await?;
    if deleted == 0 {
        return Err(meal_not_found());
    }

    Ok(HttpResponse::Ok().json(DeleteResult::deleted(deleted)))
}

/// PUT /meals/{id}/likes
pub async fn set_likes(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<LikesRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;

    let outcome = state.meals.set_likes(id, request.likes).await?;
    if outcome.matched == 0 {
        return Err(meal_not_found());
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "acknowledged": true })))
}

#[cfg(test)]
mod tests {
    use crate::state::testing::{test_app, Harness, CREATOR};
    use actix_web::{http::StatusCode, test};
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[actix_web::test]
    async fn test_create_defaults_creator() {
        let harness = Harness::new();
        let app = test_app!(harness);

        let req = test::TestRequest::post()
            .uri("/meals")
            .set_json(json!({ "title": "Chicken biryani", "price": 4.5 }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/meals?email=chef@hall.io")
            .set_json(json!({ "title": "Fish curry" }))
            .to_request();
        test::call_service(&app, req).await;

        let catalog = harness.store.catalog().await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].email.as_deref(), Some(CREATOR));
        assert_eq!(catalog[0].likes, 0);
        assert_eq!(catalog[1].email.as_deref(), Some("chef@hall.io"));
    }

    #[actix_web::test]
    async fn test_get_meal() {
        let harness = Harness::new();
        let id = harness.store.seed_meal("Polao").await;
        let app = test_app!(harness);

        let req = test::TestRequest::get().uri(&format!("/meals/{}", id.to_hex())).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["_id"], id.to_hex());
        assert_eq!(body["title"], "Polao");

        let req = test::TestRequest::get()
            .uri(&format!("/meals/{}", ObjectId::new().to_hex()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_put_overwrites_and_upserts() {
        let harness = Harness::new();
        let id = harness.store.seed_meal("Old title").await;
        let app = test_app!(harness);

        let req = test::TestRequest::put()
            .uri(&format!("/meals/{}", id.to_hex()))
            .set_json(json!({ "title": "New title", "category": "dinner", "likes": 3 }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["matchedCount"], 1);

        let fresh = ObjectId::new();
        let req = test::TestRequest::put()
            .uri(&format!("/meals/{}", fresh.to_hex()))
            .set_json(json!({ "title": "Brand new" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["upsertedId"], fresh.to_hex());

        let catalog = harness.store.catalog().await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].title.as_deref(), Some("New title"));
        assert_eq!(catalog[0].likes, 3);
    }

    #[actix_web::test]
    async fn test_delete_missing_meal_changes_nothing() {
        let harness = Harness::new();
        harness.store.seed_meal("Kept").await;
        let app = test_app!(harness);

        let req = test::TestRequest::delete()
            .uri(&format!("/meals/{}", ObjectId::new().to_hex()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(harness.store.catalog().await.len(), 1);
    }

    #[actix_web::test]
    async fn test_delete_meal() {
        let harness = Harness::new();
        let id = harness.store.seed_meal("Gone").await;
        let app = test_app!(harness);

        let req = test::TestRequest::delete().uri(&format!("/meals/{}", id.to_hex())).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["deletedCount"], 1);
        assert!(harness.store.catalog().await.is_empty());
    }

    #[actix_web::test]
    async fn test_set_likes() {
        let harness = Harness::new();
        let id = harness.store.seed_meal("Liked").await;
        let app = test_app!(harness);

        let req = test::TestRequest::put()
            .uri(&format!("/meals/{}/likes", id.to_hex()))
            .set_json(json!({ "likes": 12 }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["acknowledged"], true);
        assert_eq!(harness.store.catalog().await[0].likes, 12);

        let req = test::TestRequest::put()
            .uri(&format!("/meals/{}/likes", ObjectId::new().to_hex()))
            .set_json(json!({ "likes": 1 }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
