use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Delivered,
    /// Any status this service does not write itself
    #[serde(other)]
    Unknown,
}

/// A meal a user asked for (collection `requested`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedMeal {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(rename = "mealId")]
    pub meal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: RequestStatus,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct NewRequestedMeal {
    pub email: String,
    #[serde(rename = "mealId")]
    pub meal_id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
}

impl From<NewRequestedMeal> for RequestedMeal {
    fn from(request: NewRequestedMeal) -> Self {
        RequestedMeal {
            id: None,
            email: request.email,
            meal_id: request.meal_id,
            title: request.title,
            price: request.price,
            status: RequestStatus::Pending,
        }
    }
}

/// Optional owner filter, read from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct EmailFilter {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RequestedMealResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "mealId")]
    pub meal_id: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub status: RequestStatus,
}

impl From<RequestedMeal> for RequestedMealResponse {
    fn from(request: RequestedMeal) -> Self {
        RequestedMealResponse {
            id: request.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: request.email,
            meal_id: request.meal_id,
            title: request.title,
            price: request.price,
            status: request.status,
        }
    }
}
