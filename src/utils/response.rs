use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::utils::error::{ApiError, GENERIC_ERROR_MESSAGE};

/// Success envelope some backend routes wrap their payload in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<String>,
    pub message: String,
    pub details: Option<Value>,
}

/// The `error` field is either a plain string or a structured body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Body(ApiErrorBody),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorField>,
}

/// Extracts the user-facing message from a non-2xx body.
pub fn error_message(body: &[u8]) -> String {
    let message = serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .map(|field| match field {
            ErrorField::Text(text) => text,
            ErrorField::Body(body) => body.message,
        });

    match message {
        Some(text) if !text.trim().is_empty() => text,
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

/// Decodes a 2xx body, unwrapping the success envelope when present.
pub fn decode_body<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    let is_envelope = value
        .as_object()
        .is_some_and(|object| object.contains_key("success") && object.contains_key("data"));

    if is_envelope {
        let envelope: ApiResponse<T> =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(ApiError::Backend {
                status: 200,
                message: envelope
                    .message
                    .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            });
        }
        return envelope
            .data
            .ok_or_else(|| ApiError::Decode("envelope carries no data".to_string()));
    }

    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
