use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::MongoDB;
use crate::repository::mongo::{
    MongoMealRepository, MongoPaymentRepository, MongoPremiumRepository, MongoRequestedRepository,
    MongoUserRepository,
};
use crate::repository::{
    MealRepository, PaymentRepository, PremiumRepository, RequestedRepository, UserRepository,
};
use crate::services::{PaymentGateway, TokenService};

/// Everything a handler needs, shared across workers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub meals: Arc<dyn MealRepository>,
    pub premium: Arc<dyn PremiumRepository>,
    pub requested: Arc<dyn RequestedRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub tokens: TokenService,
    pub default_creator_email: String,
}

impl AppState {
    pub fn from_mongo(db: &MongoDB, gateway: Arc<dyn PaymentGateway>, config: &AppConfig) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db)),
            meals: Arc::new(MongoMealRepository::new(db)),
            premium: Arc::new(MongoPremiumRepository::new(db)),
            requested: Arc::new(MongoRequestedRepository::new(db)),
            payments: Arc::new(MongoPaymentRepository::new(db)),
            gateway,
            tokens: TokenService::new(&config.token_secret),
            default_creator_email: config.default_creator_email.clone(),
        }
    }
}
