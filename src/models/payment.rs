use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Recorded checkout (collection `payments`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,

    /// Ids of the requested-meal records this payment settles
    #[serde(rename = "mealId", default)]
    pub meal_id: Vec<String>,

    pub price: f64,
    #[serde(rename = "transactionId", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PaymentRequest {
    pub email: String,
    #[serde(rename = "mealId", default)]
    pub meal_id: Vec<String>,
    pub price: f64,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

impl From<PaymentRequest> for Payment {
    fn from(request: PaymentRequest) -> Self {
        Payment {
            id: None,
            email: request.email,
            meal_id: request.meal_id,
            price: request.price,
            transaction_id: request.transaction_id,
            date: request.date,
            status: request.status,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PaymentIntentRequest {
    pub price: f64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClientSecretResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PaymentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "mealId")]
    pub meal_id: Vec<String>,
    pub price: f64,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        PaymentResponse {
            id: payment.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: payment.email,
            meal_id: payment.meal_id,
            price: payment.price,
            transaction_id: payment.transaction_id,
            date: payment.date,
            status: payment.status,
        }
    }
}
