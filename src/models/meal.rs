use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Review embedded in a meal document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Reviewer email
    pub user: String,

    pub comment: String,

    pub rating: f64,
}

/// Meal stored in `foods` or `premium`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meal {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(rename = "postTime", skip_serializing_if = "Option::is_none")]
    pub post_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,

    /// Creator email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Review as it arrives inside a full meal body (`PUT /meals/{id}`)
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ReviewPayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub user: String,
    pub comment: String,
    pub rating: f64,
}

impl TryFrom<ReviewPayload> for Review {
    type Error = mongodb::bson::oid::Error;

    fn try_from(payload: ReviewPayload) -> Result<Self, Self::Error> {
        let id = match payload.id {
            Some(raw) => ObjectId::parse_str(raw)?,
            None => ObjectId::new(),
        };
        Ok(Review {
            id,
            user: payload.user,
            comment: payload.comment,
            rating: payload.rating,
        })
    }
}

/// Body for `POST /meals` and `PUT /meals/{id}`
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct MealPayload {
    pub title: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    #[serde(rename = "postTime")]
    pub post_time: Option<String>,
    pub likes: Option<i64>,
    pub reviews: Option<Vec<ReviewPayload>>,
}

/// The ten catalog fields a full update overwrites
#[derive(Debug, Clone, Default)]
pub struct MealFields {
    pub title: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub post_time: Option<String>,
    pub likes: Option<i64>,
    pub reviews: Vec<Review>,
}

impl MealPayload {
    pub fn into_fields(self) -> Result<MealFields, mongodb::bson::oid::Error> {
        let reviews = self
            .reviews
            .unwrap_or_default()
            .into_iter()
            .map(Review::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MealFields {
            title: self.title,
            category: self.category,
            image: self.image,
            ingredients: self.ingredients,
            description: self.description,
            price: self.price,
            rating: self.rating,
            post_time: self.post_time,
            likes: self.likes,
            reviews,
        })
    }

    /// Builds a new catalog entry owned by `creator`.
    pub fn into_meal(self, creator: String) -> Result<Meal, mongodb::bson::oid::Error> {
        let fields = self.into_fields()?;
        Ok(Meal {
            id: None,
            title: fields.title,
            category: fields.category,
            image: fields.image,
            ingredients: fields.ingredients,
            description: fields.description,
            price: fields.price,
            rating: fields.rating,
            post_time: fields.post_time,
            likes: fields.likes.unwrap_or(0),
            reviews: fields.reviews,
            email: Some(creator),
        })
    }
}

/// Body for appending or matching a review
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ReviewRequest {
    pub user: String,
    pub comment: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ReviewEditRequest {
    pub comment: String,
    pub rating: f64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LikesRequest {
    pub likes: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReviewResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub comment: String,
    pub rating: f64,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        ReviewResponse {
            id: review.id.to_hex(),
            user: review.user,
            comment: review.comment,
            rating: review.rating,
        }
    }
}

/// A review listed across meals, tagged with the meal it belongs to
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthoredReviewResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub comment: String,
    pub rating: f64,
    #[serde(rename = "mealTitle")]
    pub meal_title: Option<String>,
    #[serde(rename = "mealId")]
    pub meal_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MealResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub ingredients: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    #[serde(rename = "postTime")]
    pub post_time: Option<String>,
    pub likes: i64,
    pub reviews: Vec<ReviewResponse>,
    pub email: Option<String>,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        MealResponse {
            id: meal.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: meal.title,
            category: meal.category,
            image: meal.image,
            ingredients: meal.ingredients,
            description: meal.description,
            price: meal.price,
            rating: meal.rating,
            post_time: meal.post_time,
            likes: meal.likes,
            reviews: meal.reviews.into_iter().map(ReviewResponse::from).collect(),
            email: meal.email,
        }
    }
}

impl Meal {
    /// Reviews written by `email`, tagged with this meal's id and title.
    pub fn reviews_by(&self, email: &str) -> Vec<AuthoredReviewResponse> {
        let meal_id = self.id.map(|id| id.to_hex()).unwrap_or_default();
        self.reviews
            .iter()
            .filter(|review| review.user == email)
            .map(|review| AuthoredReviewResponse {
                id: review.id.to_hex(),
                user: review.user.clone(),
                comment: review.comment.clone(),
                rating: review.rating,
                meal_title: self.title.clone(),
                meal_id: meal_id.clone(),
            })
            .collect()
    }
}
