//! Event creation wizard state.
//!
//! An [`EventDraft`] is owned by one wizard session. It is filled in across
//! seven fixed steps, validated as a whole on submit and then sent to the
//! backend as a single multipart payload.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{CategoryId, LocationType, PromoCode, TicketType, TicketTypeRecord};

pub mod builder;
pub mod payload;

pub use builder::EventDraftBuilder;
pub use payload::EventPayload;

pub const MAX_INTERESTS: usize = 5;

/// Wizard steps in their fixed order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    #[default]
    Location,
    Schedule,
    Category,
    NameAndPhoto,
    DescriptionAndCapacity,
    Pricing,
    PromoCodes,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Location,
        WizardStep::Schedule,
        WizardStep::Category,
        WizardStep::NameAndPhoto,
        WizardStep::DescriptionAndCapacity,
        WizardStep::Pricing,
        WizardStep::PromoCodes,
    ];

    /// One-based position shown in the wizard header.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Location => "Location",
            WizardStep::Schedule => "Date & Time",
            WizardStep::Category => "Categories",
            WizardStep::NameAndPhoto => "Name & Photo",
            WizardStep::DescriptionAndCapacity => "Description & Capacity",
            WizardStep::Pricing => "Pricing",
            WizardStep::PromoCodes => "Promo Codes",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.number()).copied()
    }

    pub fn previous(self) -> Option<Self> {
        (self as usize).checked_sub(1).map(|index| Self::ALL[index])
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationDetails {
    pub location_type: LocationType,
    pub venue: String,
    pub address: String,
    pub online_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub end_time: Option<NaiveTime>,
}

/// Single-select category plus free-text interests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    pub category: Option<CategoryId>,
    pub interests: Vec<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaDetails {
    pub name: String,
    pub image: Option<ImageUpload>,
    /// Poster already stored by the backend, kept when editing.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Capacity {
    #[default]
    Unlimited,
    Limited(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub description: String,
    pub capacity: Capacity,
}

/// Ticket types are kept when toggling to free so switching back restores them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub is_free: bool,
    pub ticket_types: Vec<TicketType>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            is_free: true,
            ticket_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub location: LocationDetails,
    pub schedule: Schedule,
    pub category: CategorySelection,
    pub media: MediaDetails,
    pub details: EventDetails,
    pub pricing: Pricing,
    pub promo_codes: Vec<PromoCode>,
}

impl EventDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Ticket types in their flat wire shape.
    pub fn ticket_records(&self) -> Vec<TicketTypeRecord> {
        self.pricing
            .ticket_types
            .iter()
            .map(TicketTypeRecord::from)
            .collect()
    }
}
