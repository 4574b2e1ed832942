use mongodb::bson::oid::ObjectId;

use super::error::AppError;

/// Parses a 24-char hex id coming from a path or body.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::invalid_id())
}

pub fn parse_object_ids<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ObjectId>, AppError> {
    raw.iter().map(|id| parse_object_id(id.as_ref())).collect()
}
