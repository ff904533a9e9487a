//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Create a learner register request body.
pub fn register_request(handle: Option<&str>) -> serde_json::Value {
    match handle {
        Some(h) => json!({ "handle": h }),
        None => json!({}),
    }
}

/// Create a queue admission request body.
pub fn admit_request(item_id: &str, display_name: &str) -> serde_json::Value {
    json!({
        "item_id": item_id,
        "display_name": display_name,
    })
}

/// Create a grade request body.
pub fn grade_request(item_id: &str, quality: i32) -> serde_json::Value {
    json!({
        "item_id": item_id,
        "quality": quality,
    })
}

/// Generate a unique practice item id to avoid collisions.
pub fn unique_item_id(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().to_string()[..8])
}
