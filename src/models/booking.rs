use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{EventId, RowId};

/// Purchase request produced by the ticket selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub event_id: EventId,
    pub ticket_type_id: String,
    pub quantity: u32,
}

/// Booking as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: RowId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub qr_code: Option<String>,
    /// Hosted checkout page for paid bookings.
    #[serde(default)]
    pub payment_url: Option<String>,
}
