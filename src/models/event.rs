use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::promo::PromoCode;
use crate::models::ticket::TicketTypeRecord;
use crate::models::{hhmm, null_as_default, CategoryId, EventId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    #[default]
    Physical,
    Online,
    Hybrid,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Physical => "physical",
            LocationType::Online => "online",
            LocationType::Hybrid => "hybrid",
        }
    }

    pub fn has_venue(&self) -> bool {
        matches!(self, LocationType::Physical | LocationType::Hybrid)
    }

    pub fn has_link(&self) -> bool {
        matches!(self, LocationType::Online | LocationType::Hybrid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Persisted event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location_type: LocationType,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub online_link: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_unlimited", deserialize_with = "unlimited_or_default")]
    pub is_unlimited: bool,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_free: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticket_types: Vec<TicketTypeRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub promo_codes: Vec<PromoCode>,
}

fn default_unlimited() -> bool {
    true
}

fn unlimited_or_default<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_unlimited))
}
