use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;

use super::{
    MealRepository, PaymentRepository, PremiumRepository, RepoError, RepoResult,
    RequestedRepository, UserRepository,
};
use crate::models::{
    CheckoutOutcome, Meal, MealFields, Payment, RequestStatus, RequestedMeal, Review,
    ReviewRequest, Role, UpdateOutcome, User,
};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    foods: Vec<Meal>,
    premium: Vec<Meal>,
    requested: Vec<RequestedMeal>,
    payments: Vec<Payment>,
}

/// Single-lock store implementing every repository; multi-collection
/// operations happen under one guard.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Collections>,
}

impl InMemoryStore {
    pub async fn seed_user(&self, email: &str, role: Option<Role>) -> ObjectId {
        let id = ObjectId::new();
        self.inner.lock().await.users.push(User {
            id: Some(id),
            email: email.to_string(),
            name: None,
            photo: None,
            role,
        });
        id
    }

    pub async fn seed_meal(&self, title: &str) -> ObjectId {
        let id = ObjectId::new();
        self.inner.lock().await.foods.push(Meal {
            id: Some(id),
            title: Some(title.to_string()),
            ..Meal::default()
        });
        id
    }

    pub async fn seed_request(&self, email: &str, meal_id: &str) -> ObjectId {
        let id = ObjectId::new();
        self.inner.lock().await.requested.push(RequestedMeal {
            id: Some(id),
            email: email.to_string(),
            meal_id: meal_id.to_string(),
            title: None,
            price: None,
            status: RequestStatus::Pending,
        });
        id
    }

    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }

    pub async fn catalog(&self) -> Vec<Meal> {
        self.inner.lock().await.foods.clone()
    }

    pub async fn premium(&self) -> Vec<Meal> {
        self.inner.lock().await.premium.clone()
    }

    pub async fn requests(&self) -> Vec<RequestedMeal> {
        self.inner.lock().await.requested.clone()
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.inner.lock().await.payments.clone()
    }
}

fn meal_mut(foods: &mut [Meal], id: ObjectId) -> Option<&mut Meal> {
    foods.iter_mut().find(|meal| meal.id == Some(id))
}

fn matched(found: bool, modified: bool) -> UpdateOutcome {
    UpdateOutcome {
        matched: found as u64,
        modified: modified as u64,
        upserted_id: None,
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.inner.lock().await.users.clone())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|user| user.email == email).cloned())
    }

    async fn insert(&self, mut user: User) -> RepoResult<ObjectId> {
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|existing| existing.email == user.email) {
            return Err(RepoError::Duplicate(user.email));
        }
        let id = ObjectId::new();
        user.id = Some(id);
        inner.users.push(user);
        Ok(id)
    }

    async fn promote_to_admin(&self, id: ObjectId) -> RepoResult<UpdateOutcome> {
        let mut inner = self.inner.lock().await;
        Ok(match inner.users.iter_mut().find(|user| user.id == Some(id)) {
            Some(user) => {
                let modified = !user.is_admin();
                user.role = Some(Role::Admin);
                matched(true, modified)
            }
            None => matched(false, false),
        })
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.users.len();
        inner.users.retain(|user| user.id != Some(id));
        Ok((before - inner.users.len()) as u64)
    }
}

#[async_trait]
impl MealRepository for InMemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<Meal>> {
        Ok(self.inner.lock().await.foods.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<Meal>> {
        let inner = self.inner.lock().await;
        Ok(inner.foods.iter().find(|meal| meal.id == Some(id)).cloned())
    }

    async fn insert(&self, mut meal: Meal) -> RepoResult<ObjectId> {
        let id = ObjectId::new();
        meal.id = Some(id);
        self.inner.lock().await.foods.push(meal);
        Ok(id)
    }

    async fn upsert_fields(&self, id: ObjectId, fields: MealFields) -> RepoResult<UpdateOutcome> {
        let mut inner = self.inner.lock().await;
        let (index, outcome) = match inner.foods.iter().position(|meal| meal.id == Some(id)) {
            Some(index) => (index, matched(true, true)),
            None => {
                inner.foods.push(Meal { id: Some(id), ..Meal::default() });
                let upserted = UpdateOutcome { matched: 0, modified: 0, upserted_id: Some(id) };
                (inner.foods.len() - 1, upserted)
            }
        };

        let meal = &mut inner.foods[index];
        meal.title = fields.title;
        meal.category = fields.category;
        meal.image = fields.image;
        meal.ingredients = fields.ingredients;
        meal.description = fields.description;
        meal.price = fields.price;
        meal.rating = fields.rating;
        meal.post_time = fields.post_time;
        meal.likes = fields.likes.unwrap_or(0);
        meal.reviews = fields.reviews;

        Ok(outcome)
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.foods.len();
        inner.foods.retain(|meal| meal.id != Some(id));
        Ok((before - inner.foods.len()) as u64)
    }

    async fn set_likes(&self, id: ObjectId, likes: i64) -> RepoResult<UpdateOutcome> {
        let mut inner = self.inner.lock().await;
        Ok(match meal_mut(&mut inner.foods, id) {
            Some(meal) => {
                let modified = meal.likes != likes;
                meal.likes = likes;
                matched(true, modified)
            }
            None => matched(false, false),
        })
    }

    async fn reviews(&self, meal_id: ObjectId) -> RepoResult<Option<Vec<Review>>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .foods
            .iter()
            .find(|meal| meal.id == Some(meal_id))
            .map(|meal| meal.reviews.clone()))
    }

    async fn push_review(&self, meal_id: ObjectId, review: Review) -> RepoResult<u64> {
        let mut inner = self.inner.lock().await;
        Ok(match meal_mut(&mut inner.foods, meal_id) {
            Some(meal) => {
                meal.reviews.push(review);
                1
            }
            None => 0,
        })
    }

    async fn pull_review(&self, meal_id: ObjectId, review_id: ObjectId) -> RepoResult<u64> {
        let mut inner = self.inner.lock().await;
        Ok(match meal_mut(&mut inner.foods, meal_id) {
            Some(meal) => {
                let before = meal.reviews.len();
                meal.reviews.retain(|review| review.id != review_id);
                (meal.reviews.len() != before) as u64
            }
            None => 0,
        })
    }

    async fn pull_matching_review(&self, meal_id: ObjectId, target: ReviewRequest) -> RepoResult<u64> {
        let mut inner = self.inner.lock().await;
        Ok(match meal_mut(&mut inner.foods, meal_id) {
            Some(meal) => {
                let before = meal.reviews.len();
                meal.reviews.retain(|review| {
                    !(review.user == target.user
                        && review.comment == target.comment
                        && review.rating == target.rating)
                });
                (meal.reviews.len() != before) as u64
            }
            None => 0,
        })
    }

    async fn edit_review(
        &self,
        meal_id: ObjectId,
        review_id: ObjectId,
        comment: String,
        rating: f64,
    ) -> RepoResult<u64> {
        let mut inner = self.inner.lock().await;
        let review = meal_mut(&mut inner.foods, meal_id)
            .and_then(|meal| meal.reviews.iter_mut().find(|review| review.id == review_id));
        Ok(match review {
            Some(review) => {
                review.comment = comment;
                review.rating = rating;
                1
            }
            None => 0,
        })
    }

    async fn reviewed_by(&self, email: &str) -> RepoResult<Vec<Meal>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .foods
            .iter()
            .filter(|meal| meal.reviews.iter().any(|review| review.user == email))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PremiumRepository for InMemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<Meal>> {
        Ok(self.inner.lock().await.premium.clone())
    }

    async fn promote(&self, meal_id: ObjectId) -> RepoResult<Option<ObjectId>> {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.foods.iter().position(|meal| meal.id == Some(meal_id)) else {
            return Ok(None);
        };
        let meal = inner.foods.remove(index);
        inner.premium.push(meal);
        Ok(Some(meal_id))
    }
}

#[async_trait]
impl RequestedRepository for InMemoryStore {
    async fn find(&self, email: Option<&str>) -> RepoResult<Vec<RequestedMeal>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .requested
            .iter()
            .filter(|request| email.map_or(true, |email| request.email == email))
            .cloned()
            .collect())
    }

    async fn insert(&self, mut request: RequestedMeal) -> RepoResult<ObjectId> {
        let id = ObjectId::new();
        request.id = Some(id);
        self.inner.lock().await.requested.push(request);
        Ok(id)
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.requested.len();
        inner.requested.retain(|request| request.id != Some(id));
        Ok((before - inner.requested.len()) as u64)
    }

    async fn mark_delivered(&self, id: ObjectId) -> RepoResult<UpdateOutcome> {
        let mut inner = self.inner.lock().await;
        Ok(match inner.requested.iter_mut().find(|request| request.id == Some(id)) {
            Some(request) => {
                let modified = request.status != RequestStatus::Delivered;
                request.status = RequestStatus::Delivered;
                matched(true, modified)
            }
            None => matched(false, false),
        })
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Payment>> {
        let inner = self.inner.lock().await;
        Ok(inner.payments.iter().filter(|payment| payment.email == email).cloned().collect())
    }

    async fn record(&self, mut payment: Payment, settled: Vec<ObjectId>) -> RepoResult<CheckoutOutcome> {
        let mut inner = self.inner.lock().await;
        let payment_id = ObjectId::new();
        payment.id = Some(payment_id);
        inner.payments.push(payment);

        let before = inner.requested.len();
        inner
            .requested
            .retain(|request| !request.id.map_or(false, |id| settled.contains(&id)));

        Ok(CheckoutOutcome {
            payment_id,
            cleared_requests: (before - inner.requested.len()) as u64,
        })
    }
}
