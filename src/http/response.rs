//! Raw response and its mapping onto the API failure taxonomy.

use serde::de::DeserializeOwned;

use crate::api::ApiError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into the matching `ApiError`.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.body))
        }
    }

    /// Check the status, then decode the JSON body. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let response = self.error_for_status()?;
        let body = match response.body.trim() {
            "" => "null",
            body => body,
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_success_decodes_json() {
        let value: Value = ApiResponse::new(200, r#"{"ok":true}"#).json().unwrap();
        assert_eq!(value["ok"], Value::Bool(true));
    }

    #[test]
    fn test_empty_body_is_null() {
        let value: Value = ApiResponse::new(204, "").json().unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_error_statuses() {
        let err = ApiResponse::new(401, "expired").json::<Value>().unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = ApiResponse::new(502, "").json::<Value>().unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 502, .. }));

        let err = ApiResponse::new(409, "exists").json::<Value>().unwrap_err();
        assert!(matches!(err, ApiError::Client { status: 409, .. }));
    }

    #[test]
    fn test_malformed_body() {
        let err = ApiResponse::new(200, "<html>").json::<Value>().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
