use mongodb::bson::oid::ObjectId;
use serde::Serialize;

/// Outcome of an update, as reported by the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
    pub upserted_id: Option<ObjectId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub payment_id: ObjectId,
    pub cleared_requests: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InsertResult {
    pub acknowledged: bool,
    #[serde(rename = "insertedId")]
    pub inserted_id: Option<String>,
}

impl InsertResult {
    pub fn inserted(id: ObjectId) -> Self {
        InsertResult {
            acknowledged: true,
            inserted_id: Some(id.to_hex()),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UpdateResult {
    pub acknowledged: bool,
    #[serde(rename = "matchedCount")]
    pub matched_count: u64,
    #[serde(rename = "modifiedCount")]
    pub modified_count: u64,
    #[serde(rename = "upsertedId")]
    pub upserted_id: Option<String>,
}

impl From<UpdateOutcome> for UpdateResult {
    fn from(outcome: UpdateOutcome) -> Self {
        UpdateResult {
            acknowledged: true,
            matched_count: outcome.matched,
            modified_count: outcome.modified,
            upserted_id: outcome.upserted_id.map(|id| id.to_hex()),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeleteResult {
    pub acknowledged: bool,
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn deleted(count: u64) -> Self {
        DeleteResult {
            acknowledged: true,
            deleted_count: count,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CheckoutResult {
    #[serde(rename = "paymentResult")]
    pub payment_result: InsertResult,
    #[serde(rename = "deleteResult")]
    pub delete_result: DeleteResult,
}

impl From<CheckoutOutcome> for CheckoutResult {
    fn from(outcome: CheckoutOutcome) -> Self {
        CheckoutResult {
            payment_result: InsertResult::inserted(outcome.payment_id),
            delete_result: DeleteResult::deleted(outcome.cleared_requests),
        }
    }
}
