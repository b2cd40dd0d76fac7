//! API response envelope.
//!
//! Every controller answers with a flat JSON object carrying a `status`
//! field next to its payload, e.g. `{"status":"success","guid":"1"}`.
//! Errors use the same shape through [`minds_common::AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use minds_common::AppError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Standard API response wrapper.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    code: StatusCode,
    status: &'static str,
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success envelope with the fields of `data` merged in.
    pub const fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK,
            status: "success",
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// `{"status":"success"}`
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            code: StatusCode::OK,
            status: "success",
            data: None,
        }
    }

    /// `{"status":"failed"}` with the given HTTP status.
    #[must_use]
    pub const fn failed(code: StatusCode) -> Self {
        Self {
            code,
            status: "failed",
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    fn body(self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut body = match self.data.map(serde_json::to_value).transpose()? {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) => Map::new(),
            Some(other) => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        body.insert("status".to_string(), Value::from(self.status));
        Ok(body)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let code = self.code;
        match self.body() {
            Ok(body) => (code, Json(Value::Object(body))).into_response(),
            Err(e) => AppError::Internal(e.to_string()).into_response(),
        }
    }
}
