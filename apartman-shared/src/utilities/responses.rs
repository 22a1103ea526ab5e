use http::StatusCode;
use lambda_http::{Body, Response};
use serde::Serialize;

use crate::models::errors::CallableError;

#[derive(Serialize)]
pub struct CallableOk {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct CallableFail {
    pub success: bool,
    pub error: String,
    pub code: String,
}

pub fn success_response<T: Serialize>(data: T) -> Result<Response<Body>, lambda_http::Error> {
    response_with_code(data, StatusCode::OK)
}

/// `{ success: true, message }` body for a completed callable.
pub fn callable_success(message: impl Into<String>) -> Result<Response<Body>, lambda_http::Error> {
    response_with_code(
        CallableOk {
            success: true,
            message: message.into(),
        },
        StatusCode::OK,
    )
}

/// `{ success: false, error, code }` with the status the error maps to.
pub fn callable_failure(err: &CallableError) -> Result<Response<Body>, lambda_http::Error> {
    response_with_code(
        CallableFail {
            success: false,
            error: err.to_string(),
            code: err.code().to_string(),
        },
        err.status(),
    )
}

pub fn response_with_code<T: Serialize>(
    data: T,
    code: StatusCode,
) -> Result<Response<Body>, lambda_http::Error> {
    let body = serde_json::to_string(&data).map_err(|_| lambda_http::Error::from("Serialization error"))?;
    log::info!("Response Code:{}\nBody: {}", code, body);
    Response::builder()
        .status(code)
        .header("Content-Type", "application/json")
        .body(Body::Text(body))
        .map_err(|e| {
            log::error!("Failed to build response: {:?}", e);
            lambda_http::Error::from("Failed to construct HTTP response")
        })
}
