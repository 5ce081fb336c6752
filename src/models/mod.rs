use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub mod booking;
pub mod event;
pub mod profile;
pub mod promo;
pub mod ticket;

pub use booking::{Booking, BookingRequest};
pub use event::{Category, Event, LocationType};
pub use profile::Profile;
pub use promo::{DiscountType, PromoCode};
pub use ticket::{
    ClassTier, LoyaltyTier, SeasonKind, TicketKind, TicketStructure, TicketType, TicketTypeId,
    TicketTypeRecord,
};

/// Backend ids arrive either as JSON strings or as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Integer(value) => value.to_string(),
        }
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

opaque_id!(
    /// Identifier of a persisted event.
    EventId
);
opaque_id!(
    /// Identifier of an event category.
    CategoryId
);
opaque_id!(
    /// Identifier of a persisted child row (ticket type, promo code, booking).
    RowId
);

/// Treats an explicit `null` like a missing key. Pair with `#[serde(default)]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `HH:MM` times, accepting an optional seconds part on input.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub mod option {
        use super::*;

        pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(text) => parse(text)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid time '{text}'"))),
            }
        }
    }
}
