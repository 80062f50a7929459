use crate::utils::AppError;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::Value;

/// Renders a stored value the way clients expect it: ObjectIds as hex
/// strings, dates as RFC 3339, everything else as relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: Document) -> Value {
    Value::Object(doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect())
}

pub fn documents_to_json(docs: Vec<Document>) -> Value {
    Value::Array(docs.into_iter().map(document_to_json).collect())
}

/// Request payloads are trusted as-is, but they must at least be objects.
pub fn json_to_document(value: Value) -> Result<Document, AppError> {
    match value {
        Value::Object(_) => Ok(mongodb::bson::to_document(&value)?),
        other => Err(AppError::InvalidRequest(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest(format!("invalid id: {}", id)))
}
