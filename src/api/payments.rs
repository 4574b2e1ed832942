use actix_web::{web, HttpResponse};

use crate::middleware::ensure_self;
use crate::models::{
    CheckoutResult, ClientSecretResponse, Payment, PaymentIntentRequest, PaymentRequest, PaymentResponse,
};
use crate::services::stripe_service::{to_minor_units, IntentRequest, PaymentMethods};
use crate::services::Claims;
use crate::state::AppState;
use crate::utils::{parse_object_ids, AppError};

fn intent_for(price: f64, methods: PaymentMethods) -> Result<IntentRequest, AppError> {
    let amount = to_minor_units(price).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(IntentRequest::usd(amount, methods))
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Card payment intent created", body = ClientSecretResponse),
        (status = 400, description = "Price is not a positive number")
    )
)]
pub async fn create_payment_intent(
    state: web::Data<AppState>,
    request: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
    let intent = intent_for(request.price, PaymentMethods::Card)?;
    log::info!("💳 POST /create-payment-intent - amount: {} {}", intent.amount, intent.currency);

    let created = state.gateway.create_payment_intent(&intent).await?;
    log::info!("✅ Payment intent {} created", created.id);

    Ok(HttpResponse::Ok().json(ClientSecretResponse {
        client_secret: created.client_secret,
    }))
}

/// POST /create-payment-intents - lets the gateway pick the payment methods
pub async fn create_payment_intents(
    state: web::Data<AppState>,
    request: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
    let intent = intent_for(request.price, PaymentMethods::Automatic)?;
    log::info!("💳 POST /create-payment-intents - amount: {} {}", intent.amount, intent.currency);

    match state.gateway.create_payment_intent(&intent).await {
        Ok(created) => Ok(HttpResponse::Ok().json(ClientSecretResponse {
            client_secret: created.client_secret,
        })),
        Err(e) => {
            log::error!("❌ Failed to create PaymentIntent: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Failed to create PaymentIntent" })))
        }
    }
}

/// POST /payments - records the payment and clears the requests it settles
pub async fn record_payment(
    state: web::Data<AppState>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = Payment::from(request.into_inner());
    let settled = parse_object_ids(&payment.meal_id)?;
    log::info!(
        "🧾 POST /payments - email: {}, settling {} request(s)",
        payment.email,
        settled.len()
    );

    let outcome = state.payments.record(payment, settled).await?;
    Ok(HttpResponse::Ok().json(CheckoutResult::from(outcome)))
}

/// GET /payments/{email} - requires a token for that email
pub async fn payment_history(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    ensure_self(&claims, &email)?;

    let payments: Vec<PaymentResponse> = state
        .payments
        .find_by_email(&email)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(payments))
}
