//! HTTP helpers for the assistant Lambda.

use lambda_http::{Body, Error, Response};
use serde::Serialize;

/// CORS headers attached to every response; any origin may call the assistant.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "authorization, x-client-info, apikey, content-type",
    ),
];

/// Standard API response wrapper for non-triage endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn with_cors(mut builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    for (name, value) in CORS_HEADERS {
        builder = builder.header(*name, *value);
    }
    builder
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, Error> {
    let body = serde_json::to_string(data)?;
    Ok(with_cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(body))?)
}

/// Create an `ApiResponse` error with the given status code and message.
pub fn error_response(status: u16, message: impl Into<String>) -> Result<Response<Body>, Error> {
    json_response(status, &ApiResponse::<()>::error(message))
}

/// Empty 200 answering a CORS pre-flight request.
pub fn preflight_response() -> Result<Response<Body>, Error> {
    Ok(with_cors(Response::builder()).status(200).body(Body::Empty)?)
}
