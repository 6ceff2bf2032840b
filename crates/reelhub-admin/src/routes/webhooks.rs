//! Payment provider webhooks
//!
//! These paths are exempt from the CSRF gate. The provider authenticates
//! them by signature, which is verified upstream of this service.

use reelhub_core::{ApiError, Json};
use serde_json::{json, Value};

/// `POST /api/webhooks/stripe`
///
/// Acknowledges any JSON event.
pub async fn stripe(Json(event): Json<Value>) -> Result<Json<Value>, ApiError> {
    let kind = event
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("Missing event type"))?;

    tracing::info!(event_type = kind, "Received payment webhook");
    Ok(Json(json!({ "received": true })))
}
