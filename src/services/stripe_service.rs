use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const CURRENCY: &str = "usd";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Stripe API error [{status}]: {message}")]
    Api { status: u16, message: String },
}

/// Which payment methods the intent accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethods {
    Card,
    /// Let the gateway pick from the methods enabled on the account
    Automatic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRequest {
    /// Amount in minor units (cents)
    pub amount: i64,
    pub currency: String,
    pub methods: PaymentMethods,
}

impl IntentRequest {
    pub fn usd(amount: i64, methods: PaymentMethods) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            methods,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, GatewayError>;
}

/// Converts a price in major units to minor units, rounding to the nearest cent.
pub fn to_minor_units(price: f64) -> Result<i64, GatewayError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(GatewayError::InvalidAmount(format!("price must be positive, got {}", price)));
    }
    Ok((price * 100.0).round() as i64)
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// Payment intents over the Stripe REST API
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn form(request: &IntentRequest) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
        ];
        match request.methods {
            PaymentMethods::Card => form.push(("payment_method_types[0]", "card".to_string())),
            PaymentMethods::Automatic => {
                form.push(("automatic_payment_methods[enabled]", "true".to_string()))
            }
        }
        form
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_payment_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, GatewayError> {
        log::debug!("💳 Creating payment intent: {} {}", request.amount, request.currency);

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&Self::form(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = response.json().await?;
        log::info!("✅ Payment intent created: {}", intent.id);
        Ok(intent)
    }
}
