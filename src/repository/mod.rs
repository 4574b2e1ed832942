//! Persistence interfaces, one per entity.
//!
//! Handlers only see these traits through [`crate::state::AppState`]; the
//! MongoDB implementations live in [`mongo`], and an in-memory store backs
//! the handler tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{
    CheckoutOutcome, Meal, MealFields, Payment, RequestedMeal, Review, ReviewRequest,
    UpdateOutcome, User,
};

#[cfg(test)]
pub mod memory;
pub mod mongo;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("{0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("BSON serialization failed: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("unexpected inserted id: {0}")]
    InsertedId(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Fails with [`RepoError::Duplicate`] when the email is already taken.
    async fn insert(&self, user: User) -> RepoResult<ObjectId>;

    async fn promote_to_admin(&self, id: ObjectId) -> RepoResult<UpdateOutcome>;

    async fn delete(&self, id: ObjectId) -> RepoResult<u64>;
}

#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Meal>>;

    async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<Meal>>;

    async fn insert(&self, meal: Meal) -> RepoResult<ObjectId>;

    /// Overwrites the catalog fields, creating the meal when absent.
    async fn upsert_fields(&self, id: ObjectId, fields: MealFields) -> RepoResult<UpdateOutcome>;

    async fn delete(&self, id: ObjectId) -> RepoResult<u64>;

    async fn set_likes(&self, id: ObjectId, likes: i64) -> RepoResult<UpdateOutcome>;

    /// `None` when the meal does not exist.
    async fn reviews(&self, meal_id: ObjectId) -> RepoResult<Option<Vec<Review>>>;

    /// Returns the number of meals modified (0 or 1).
    async fn push_review(&self, meal_id: ObjectId, review: Review) -> RepoResult<u64>;

    async fn pull_review(&self, meal_id: ObjectId, review_id: ObjectId) -> RepoResult<u64>;

    /// Removes every review equal field-by-field to `review`.
    async fn pull_matching_review(&self, meal_id: ObjectId, review: ReviewRequest) -> RepoResult<u64>;

    /// Returns the number of meals whose review matched.
    async fn edit_review(
        &self,
        meal_id: ObjectId,
        review_id: ObjectId,
        comment: String,
        rating: f64,
    ) -> RepoResult<u64>;

    /// Meals carrying at least one review by `email`.
    async fn reviewed_by(&self, email: &str) -> RepoResult<Vec<Meal>>;
}

#[async_trait]
pub trait PremiumRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Meal>>;

    /// Moves a catalog meal into the premium listing as one unit of work.
    /// `None` when the meal is not in the catalog.
    async fn promote(&self, meal_id: ObjectId) -> RepoResult<Option<ObjectId>>;
}

#[async_trait]
pub trait RequestedRepository: Send + Sync {
    /// All requests, or only those owned by `email`.
    async fn find(&self, email: Option<&str>) -> RepoResult<Vec<RequestedMeal>>;

    async fn insert(&self, request: RequestedMeal) -> RepoResult<ObjectId>;

    async fn delete(&self, id: ObjectId) -> RepoResult<u64>;

    async fn mark_delivered(&self, id: ObjectId) -> RepoResult<UpdateOutcome>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Payment>>;

    /// Inserts the payment and clears the settled requests as one unit of work.
    async fn record(&self, payment: Payment, settled: Vec<ObjectId>) -> RepoResult<CheckoutOutcome>;
}
