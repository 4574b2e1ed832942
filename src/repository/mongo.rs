use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection};

use super::{
    MealRepository, PaymentRepository, PremiumRepository, RepoError, RepoResult,
    RequestedRepository, UserRepository,
};
use crate::database::{MongoDB, FOODS, PAYMENTS, PREMIUM, REQUESTED, USERS};
use crate::models::{
    CheckoutOutcome, Meal, MealFields, Payment, RequestStatus, RequestedMeal, Review,
    ReviewRequest, UpdateOutcome, User,
};

const DUPLICATE_KEY: i32 = 11000;

fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}

fn inserted_object_id(id: Bson) -> RepoResult<ObjectId> {
    id.as_object_id()
        .ok_or_else(|| RepoError::InsertedId(id.to_string()))
}

fn update_outcome(result: mongodb::results::UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        matched: result.matched_count,
        modified: result.modified_count,
        upserted_id: result.upserted_id.and_then(|id| id.as_object_id()),
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

async fn collect<T>(collection: &Collection<T>, filter: Document) -> RepoResult<Vec<T>>
where
    T: serde::de::DeserializeOwned + Unpin + Send + Sync,
{
    Ok(collection.find(filter).await?.try_collect().await?)
}

pub struct MongoUserRepository {
    users: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self { users: db.collection(USERS) }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        collect(&self.users, doc! {}).await
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    async fn insert(&self, user: User) -> RepoResult<ObjectId> {
        match self.users.insert_one(&user).await {
            Ok(result) => inserted_object_id(result.inserted_id),
            Err(e) if is_duplicate_key(&e) => Err(RepoError::Duplicate(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    async fn promote_to_admin(&self, id: ObjectId) -> RepoResult<UpdateOutcome> {
        let result = self
            .users
            .update_one(by_id(id), doc! { "$set": { "role": "admin" } })
            .await?;
        Ok(update_outcome(result))
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<u64> {
        Ok(self.users.delete_one(by_id(id)).await?.deleted_count)
    }
}

pub struct MongoMealRepository {
    foods: Collection<Meal>,
}

impl MongoMealRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self { foods: db.collection(FOODS) }
    }
}

#[async_trait]
impl MealRepository for MongoMealRepository {
    async fn find_all(&self) -> RepoResult<Vec<Meal>> {
        collect(&self.foods, doc! {}).await
    }

    async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<Meal>> {
        Ok(self.foods.find_one(by_id(id)).await?)
    }

    async fn insert(&self, meal: Meal) -> RepoResult<ObjectId> {
        let result = self.foods.insert_one(&meal).await?;
        inserted_object_id(result.inserted_id)
    }

    async fn upsert_fields(&self, id: ObjectId, fields: MealFields) -> RepoResult<UpdateOutcome> {
        let update = doc! {
            "$set": {
                "title": fields.title,
                "category": fields.category,
                "image": fields.image,
                "ingredients": fields.ingredients,
                "description": fields.description,
                "price": fields.price,
                "rating": fields.rating,
                "postTime": fields.post_time,
                "likes": fields.likes.unwrap_or(0),
                "reviews": to_bson(&fields.reviews)?,
            }
        };

        let result = self.foods.update_one(by_id(id), update).upsert(true).await?;
        Ok(update_outcome(result))
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<u64> {
        Ok(self.foods.delete_one(by_id(id)).await?.deleted_count)
    }

    async fn set_likes(&self, id: ObjectId, likes: i64) -> RepoResult<UpdateOutcome> {
        let result = self
            .foods
            .update_one(by_id(id), doc! { "$set": { "likes": likes } })
            .await?;
        Ok(update_outcome(result))
    }

    async fn reviews(&self, meal_id: ObjectId) -> RepoResult<Option<Vec<Review>>> {
        let meal = self
            .foods
            .find_one(by_id(meal_id))
            .projection(doc! { "reviews": 1 })
            .await?;
        Ok(meal.map(|meal| meal.reviews))
    }

    async fn push_review(&self, meal_id: ObjectId, review: Review) -> RepoResult<u64> {
        let result = self
            .foods
            .update_one(by_id(meal_id), doc! { "$push": { "reviews": to_bson(&review)? } })
            .await?;
        Ok(result.modified_count)
    }

    async fn pull_review(&self, meal_id: ObjectId, review_id: ObjectId) -> RepoResult<u64> {
        let result = self
            .foods
            .update_one(by_id(meal_id), doc! { "$pull": { "reviews": { "_id": review_id } } })
            .await?;
        Ok(result.modified_count)
    }

    async fn pull_matching_review(&self, meal_id: ObjectId, review: ReviewRequest) -> RepoResult<u64> {
        let pull = doc! {
            "$pull": {
                "reviews": {
                    "user": review.user,
                    "comment": review.comment,
                    "rating": review.rating,
                }
            }
        };
        let result = self.foods.update_one(by_id(meal_id), pull).await?;
        Ok(result.modified_count)
    }

    async fn edit_review(
        &self,
        meal_id: ObjectId,
        review_id: ObjectId,
        comment: String,
        rating: f64,
    ) -> RepoResult<u64> {
        let result = self
            .foods
            .update_one(
                doc! { "_id": meal_id, "reviews._id": review_id },
                doc! { "$set": { "reviews.$.comment": comment, "reviews.$.rating": rating } },
            )
            .await?;
        Ok(result.matched_count)
    }

    async fn reviewed_by(&self, email: &str) -> RepoResult<Vec<Meal>> {
        collect(&self.foods, doc! { "reviews.user": email }).await
    }
}

pub struct MongoPremiumRepository {
    client: Client,
    foods: Collection<Document>,
    premium: Collection<Meal>,
}

impl MongoPremiumRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            client: db.client().clone(),
            foods: db.collection(FOODS),
            premium: db.collection(PREMIUM),
        }
    }
}

#[async_trait]
impl PremiumRepository for MongoPremiumRepository {
    async fn find_all(&self) -> RepoResult<Vec<Meal>> {
        collect(&self.premium, doc! {}).await
    }

    /// Copies the stored document untouched, unknown fields included.
    async fn promote(&self, meal_id: ObjectId) -> RepoResult<Option<ObjectId>> {
        let premium = self.premium.clone_with_type::<Document>();
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        let Some(meal) = self.foods.find_one(by_id(meal_id)).session(&mut session).await? else {
            session.abort_transaction().await?;
            return Ok(None);
        };

        // Dropping the session on an early return aborts the transaction.
        premium.insert_one(&meal).session(&mut session).await?;
        self.foods.delete_one(by_id(meal_id)).session(&mut session).await?;
        session.commit_transaction().await?;

        Ok(Some(meal_id))
    }
}

pub struct MongoRequestedRepository {
    requested: Collection<RequestedMeal>,
}

impl MongoRequestedRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self { requested: db.collection(REQUESTED) }
    }
}

#[async_trait]
impl RequestedRepository for MongoRequestedRepository {
    async fn find(&self, email: Option<&str>) -> RepoResult<Vec<RequestedMeal>> {
        let filter = match email {
            Some(email) => doc! { "email": email },
            None => doc! {},
        };
        collect(&self.requested, filter).await
    }

    async fn insert(&self, request: RequestedMeal) -> RepoResult<ObjectId> {
        let result = self.requested.insert_one(&request).await?;
        inserted_object_id(result.inserted_id)
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<u64> {
        Ok(self.requested.delete_one(by_id(id)).await?.deleted_count)
    }

    async fn mark_delivered(&self, id: ObjectId) -> RepoResult<UpdateOutcome> {
        let result = self
            .requested
            .update_one(by_id(id), doc! { "$set": { "status": to_bson(&RequestStatus::Delivered)? } })
            .await?;
        Ok(update_outcome(result))
    }
}

pub struct MongoPaymentRepository {
    client: Client,
    payments: Collection<Payment>,
    requested: Collection<RequestedMeal>,
}

impl MongoPaymentRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            client: db.client().clone(),
            payments: db.collection(PAYMENTS),
            requested: db.collection(REQUESTED),
        }
    }
}

#[async_trait]
impl PaymentRepository for MongoPaymentRepository {
    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Payment>> {
        collect(&self.payments, doc! { "email": email }).await
    }

    async fn record(&self, payment: Payment, settled: Vec<ObjectId>) -> RepoResult<CheckoutOutcome> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        let inserted = self.payments.insert_one(&payment).session(&mut session).await?;
        let payment_id = inserted_object_id(inserted.inserted_id)?;

        let cleared_requests = if settled.is_empty() {
            0
        } else {
            self.requested
                .delete_many(doc! { "_id": { "$in": settled } })
                .session(&mut session)
                .await?
                .deleted_count
        };

        session.commit_transaction().await?;

        Ok(CheckoutOutcome {
            payment_id,
            cleared_requests,
        })
    }
}
