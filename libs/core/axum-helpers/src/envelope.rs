//! Success envelope shared by every JSON endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{ success, message, data, errors }`
///
/// Successful calls carry `data`; envelope-level failures (such as a path/body
/// id mismatch) carry `errors`. Domain errors are rendered as
/// [`ProblemDetails`](crate::errors::ProblemDetails) instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    /// Success without a payload, e.g. after a delete.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn fail(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_serializes_null_errors() {
        let envelope = ApiResponse::ok("Category count retrieved", 3);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": true,
                "message": "Category count retrieved",
                "data": 3,
                "errors": null
            })
        );
    }

    #[test]
    fn test_empty_envelope_has_no_data() {
        let envelope: ApiResponse<()> = ApiResponse::empty("Category deleted");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["errors"], serde_json::Value::Null);
    }

    #[test]
    fn test_fail_envelope_serializes_null_data() {
        let envelope: ApiResponse<()> =
            ApiResponse::fail("Mismatched product id", vec!["id mismatch".to_string()]);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["errors"], json!(["id mismatch"]));
    }
}
