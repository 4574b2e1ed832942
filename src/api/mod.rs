pub mod auth;
pub mod health;
pub mod meals;
pub mod payments;
pub mod premium;
pub mod requested;
pub mod reviews;
pub mod swagger;
pub mod users;

use actix_web::web;

use crate::middleware::{AdminMiddleware, AuthMiddleware};
use crate::utils::AppError;

/// Registers every route of the service.
///
/// Token-protected routes are wrapped individually with [`AuthMiddleware`];
/// admin routes add [`AdminMiddleware`] inside it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(health::root))
    .route("/health", web::get().to(health::health_check))
    .route("/jwt", web::post().to(auth::issue_token))
    // ==================== USERS ====================
    .service(
        web::resource("/users")
            .route(web::post().to(users::create_user))
            .route(web::get().to(users::list_users).wrap(AdminMiddleware).wrap(AuthMiddleware)),
    )
    .service(
        web::resource("/users/admin/{key}")
            .route(web::get().to(users::check_admin).wrap(AuthMiddleware))
            .route(web::patch().to(users::make_admin).wrap(AdminMiddleware).wrap(AuthMiddleware)),
    )
    .service(
        web::resource("/users/{id}")
            .route(web::delete().to(users::delete_user).wrap(AdminMiddleware).wrap(AuthMiddleware)),
    )
    // ==================== MEALS ====================
    .service(
        web::resource("/meals")
            .route(web::get().to(meals::list_meals))
            .route(web::post().to(meals::create_meal)),
    )
    .service(
        web::resource("/meals/{id}")
            .route(web::get().to(meals::get_meal))
            .route(web::put().to(meals::update_meal))
            .route(web::delete().to(meals::delete_meal)),
    )
    .route("/meals/{id}/likes", web::put().to(meals::set_likes))
    // ==================== REVIEWS ====================
    .service(
        web::resource("/meals/{id}/reviews")
            .route(web::get().to(reviews::list_reviews))
            .route(web::post().to(reviews::add_review))
            .route(web::delete().to(reviews::delete_matching_review)),
    )
    .route(
        "/meals/{id}/reviews/{review_id}",
        web::delete().to(reviews::delete_meal_review),
    )
    .route(
        "/reviews/{email}",
        web::get().to(reviews::reviews_by_user).wrap(AuthMiddleware),
    )
    .service(
        web::resource("/reviews/{meal_id}/{review_id}")
            .route(web::put().to(reviews::edit_review).wrap(AuthMiddleware))
            .route(web::delete().to(reviews::delete_review).wrap(AuthMiddleware)),
    )
    // ==================== PREMIUM ====================
    .service(
        web::resource("/premium")
            .route(web::get().to(premium::list_premium))
            .route(web::post().to(premium::promote_meal)),
    )
    // ==================== CHECKOUT ====================
    .route("/create-payment-intent", web::post().to(payments::create_payment_intent))
    .route("/create-payment-intents", web::post().to(payments::create_payment_intents))
    .route("/payments", web::post().to(payments::record_payment))
    .route(
        "/payments/{email}",
        web::get().to(payments::payment_history).wrap(AuthMiddleware),
    )
    // ==================== REQUESTED MEALS ====================
    .service(
        web::resource("/requested")
            .route(web::get().to(requested::list_requested))
            .route(web::post().to(requested::create_request)),
    )
    .route("/requestedMeal", web::post().to(requested::search_requested))
    .route("/requested/{id}", web::delete().to(requested::delete_request))
    .route("/requested/serve/{id}", web::patch().to(requested::serve_request));
}
