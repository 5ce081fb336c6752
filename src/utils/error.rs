use thiserror::Error;
use tracing::{error, warn};

use crate::models::ticket::TIMESLOT_LIMIT_MESSAGE;

/// Banner text for failures that carry no message of their own.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

pub const INTEREST_LIMIT_MESSAGE: &str = "You can add up to 5 interests";

/// A single problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validation failures of the event draft. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Event name is required")]
    MissingName,

    #[error("Start date and time are required")]
    MissingSchedule,

    #[error("Please select a category")]
    MissingCategory,

    #[error("Event description is required")]
    MissingDescription,

    #[error("Add at least one ticket type for a paid event")]
    NoTicketTypes,

    #[error("{name}: {}", .error.message)]
    InvalidTicketType { name: String, error: FieldError },

    #[error("All ticket types of an event must use the same pricing structure")]
    MixedTicketStructures,

    #[error("Promo code {code}: {}", .error.message)]
    InvalidPromoCode { code: String, error: FieldError },

    #[error("Promo code {0} already exists")]
    DuplicatePromoCode(String),

    #[error("{}", TIMESLOT_LIMIT_MESSAGE)]
    TimeslotLimit,

    #[error("{}", INTEREST_LIMIT_MESSAGE)]
    InterestLimit,

    #[error("Ticket type not found: {0}")]
    UnknownTicketType(String),

    #[error("Could not load event: {0}")]
    InvalidRecord(FieldError),
}

impl DraftError {
    pub fn code(&self) -> &'static str {
        match self {
            DraftError::UnknownTicketType(_) => "NOT_FOUND",
            DraftError::InvalidRecord(_) => "INVALID_RECORD",
            _ => "VALIDATION_ERROR",
        }
    }
}

/// Failures of a call to the backend REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Network error")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotAuthenticated => "AUTH_ERROR",
            ApiError::Backend { status: 401, .. } => "AUTH_ERROR",
            ApiError::Backend { status: 404, .. } => "NOT_FOUND",
            ApiError::Backend { .. } => "BACKEND_ERROR",
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::InvalidUpload(_) => "VALIDATION_ERROR",
        }
    }

    /// Text for the error banner. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotAuthenticated => "Please sign in to continue".to_string(),
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::InvalidUpload(msg) => msg.clone(),
            ApiError::Network(_) | ApiError::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn log(&self) {
        match self {
            ApiError::NotAuthenticated | ApiError::InvalidUpload(_) => {
                warn!(code = self.code(), error = %self, "Request rejected locally");
            }
            ApiError::Backend { status, message } => {
                error!(code = self.code(), status, message = %message, "Backend error");
            }
            ApiError::Network(e) => {
                error!(error = ?e, "Network error");
            }
            ApiError::Decode(msg) => {
                error!(message = %msg, "Unexpected response body");
            }
        }
    }
}

/// Crate-level error surfaced by the wizard submit and the binary.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::Draft(e) => e.code(),
            DashboardError::Api(e) => e.code(),
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Io(_) => "IO_ERROR",
            DashboardError::Json(_) => "JSON_ERROR",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Draft(e) => e.to_string(),
            DashboardError::Api(e) => e.user_message(),
            DashboardError::Config(msg) => msg.clone(),
            DashboardError::Io(_) | DashboardError::Json(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
