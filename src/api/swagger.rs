use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hall Server API",
        version = "1.0.0",
        description = "Meal ordering backend for a residential hall: catalog, reviews, upcoming meals, meal requests and Stripe checkout.\n\n**Authentication:** Protected endpoints expect `Authorization: Bearer <token>` issued by `POST /jwt`."
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::check_admin,

        // Meals
        crate::api::meals::list_meals,
        crate::api::meals::get_meal,

        // Premium
        crate::api::premium::promote_meal,

        // Payments
        crate::api::payments::create_payment_intent,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::auth::TokenResponse,
            crate::api::premium::PromoteRequest,

            crate::models::Role,
            crate::models::CreateUserRequest,
            crate::models::UserResponse,

            crate::models::MealPayload,
            crate::models::ReviewPayload,
            crate::models::MealResponse,
            crate::models::LikesRequest,
            crate::models::ReviewRequest,
            crate::models::ReviewEditRequest,
            crate::models::ReviewResponse,
            crate::models::AuthoredReviewResponse,

            crate::models::RequestStatus,
            crate::models::NewRequestedMeal,
            crate::models::RequestedMealResponse,

            crate::models::PaymentIntentRequest,
            crate::models::ClientSecretResponse,
            crate::models::PaymentRequest,
            crate::models::PaymentResponse,

            crate::models::InsertResult,
            crate::models::UpdateResult,
            crate::models::DeleteResult,
            crate::models::CheckoutResult,
        )
    ),
    tags(
        (name = "Health", description = "Liveness endpoints for monitoring."),
        (name = "Users", description = "Signup, role lookup and admin user management."),
        (name = "Meals", description = "The meal catalog and its embedded reviews."),
        (name = "Premium", description = "Upcoming meals promoted out of the catalog."),
        (name = "Payments", description = "Stripe payment intents and recorded payments."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build(),
                ),
            );
        }
    }
}
