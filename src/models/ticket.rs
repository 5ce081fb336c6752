use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{null_as_default, RowId};
use crate::utils::error::FieldError;

/// Hard cap on timeslot-structured ticket types per event.
pub const MAX_TIMESLOT_TICKETS: usize = 8;

pub const TIMESLOT_LIMIT_MESSAGE: &str = "Maximum 8 time slot tickets allowed per event";

/// Identifier of a ticket type within one event.
///
/// Entries added in the wizard get a local id until the backend persists
/// them; hydrated entries keep the backend id so updates refer to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TicketTypeId {
    Local(Uuid),
    Persisted(RowId),
}

impl TicketTypeId {
    pub fn local() -> Self {
        TicketTypeId::Local(Uuid::new_v4())
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, TicketTypeId::Persisted(_))
    }
}

impl fmt::Display for TicketTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketTypeId::Local(id) => write!(f, "local-{id}"),
            TicketTypeId::Persisted(id) => write!(f, "{id}"),
        }
    }
}

/// Discriminator of the pricing structure, as it travels on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStructure {
    #[default]
    Basic,
    Class,
    Loyalty,
    Season,
    Timeslot,
}

impl TicketStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStructure::Basic => "basic",
            TicketStructure::Class => "class",
            TicketStructure::Loyalty => "loyalty",
            TicketStructure::Season => "season",
            TicketStructure::Timeslot => "timeslot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassTier {
    Vvip,
    Vip,
    Regular,
}

impl ClassTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassTier::Vvip => "vvip",
            ClassTier::Vip => "vip",
            ClassTier::Regular => "regular",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClassTier::Vvip => "VVIP",
            ClassTier::Vip => "VIP",
            ClassTier::Regular => "REGULAR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    Diehard,
    Earlybird,
    Advance,
    Gate,
}

impl LoyaltyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoyaltyTier::Diehard => "diehard",
            LoyaltyTier::Earlybird => "earlybird",
            LoyaltyTier::Advance => "advance",
            LoyaltyTier::Gate => "gate",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoyaltyTier::Diehard => "Die Hard",
            LoyaltyTier::Earlybird => "Early Bird",
            LoyaltyTier::Advance => "Advance",
            LoyaltyTier::Gate => "Gate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonKind {
    Daily,
    Season,
}

/// Per-structure fields. Each variant carries only what its structure uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketKind {
    Basic,
    Class(ClassTier),
    Loyalty(LoyaltyTier),
    /// A daily ticket, or a multi-day pass when `duration_days` is set.
    Season { duration_days: Option<u32> },
    Timeslot { label: String },
}

impl TicketKind {
    pub fn structure(&self) -> TicketStructure {
        match self {
            TicketKind::Basic => TicketStructure::Basic,
            TicketKind::Class(_) => TicketStructure::Class,
            TicketKind::Loyalty(_) => TicketStructure::Loyalty,
            TicketKind::Season { .. } => TicketStructure::Season,
            TicketKind::Timeslot { .. } => TicketStructure::Timeslot,
        }
    }

    pub fn season_pass(duration_days: u32) -> Self {
        TicketKind::Season {
            duration_days: Some(duration_days),
        }
    }

    pub fn daily() -> Self {
        TicketKind::Season {
            duration_days: None,
        }
    }

    pub fn timeslot(label: impl Into<String>) -> Self {
        TicketKind::Timeslot {
            label: label.into(),
        }
    }

    fn annotation(&self) -> Option<String> {
        match self {
            TicketKind::Basic | TicketKind::Season {
                duration_days: None,
            } => None,
            TicketKind::Class(tier) => Some(tier.label().to_string()),
            TicketKind::Loyalty(tier) => Some(tier.label().to_string()),
            TicketKind::Season {
                duration_days: Some(days),
            } => Some(format!("{days}-Day Pass")),
            TicketKind::Timeslot { label } => {
                let label = label.trim();
                (!label.is_empty()).then(|| label.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketType {
    pub id: TicketTypeId,
    pub name: String,
    pub kind: TicketKind,
    pub price: Decimal,
    pub quantity_total: i32,
    pub vat_included: bool,
    /// Reported by the backend for persisted ticket types.
    pub quantity_sold: Option<i32>,
    pub available: Option<i32>,
}

impl TicketType {
    pub fn new(
        name: impl Into<String>,
        kind: TicketKind,
        price: Decimal,
        quantity_total: i32,
    ) -> Self {
        Self {
            id: TicketTypeId::local(),
            name: name.into(),
            kind,
            price,
            quantity_total,
            vat_included: false,
            quantity_sold: None,
            available: None,
        }
    }

    pub fn with_vat_included(mut self, vat_included: bool) -> Self {
        self.vat_included = vat_included;
        self
    }

    pub fn structure(&self) -> TicketStructure {
        self.kind.structure()
    }

    pub fn is_timeslot(&self) -> bool {
        matches!(self.kind, TicketKind::Timeslot { .. })
    }

    pub fn is_sold_out(&self) -> bool {
        matches!(self.available, Some(available) if available <= 0)
    }

    /// Returns every field problem, in form order. Empty means valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Ticket name is required"));
        }

        match &self.kind {
            TicketKind::Timeslot { label } if label.trim().is_empty() => {
                errors.push(FieldError::new("timeslot", "Time slot is required"));
            }
            TicketKind::Season {
                duration_days: Some(0),
            } => {
                errors.push(FieldError::new(
                    "season_duration",
                    "Season duration must be at least 1 day",
                ));
            }
            _ => {}
        }

        if self.price < Decimal::ZERO {
            errors.push(FieldError::new("price", "Price cannot be negative"));
        }
        if self.quantity_total < 0 {
            errors.push(FieldError::new("quantity", "Quantity cannot be negative"));
        }

        errors
    }

    /// Display label used by previews, selectors and listings.
    pub fn describe(&self) -> String {
        match self.kind.annotation() {
            Some(annotation) => format!("{} ({})", self.name, annotation),
            None => self.name.clone(),
        }
    }

    pub fn display_price(&self) -> String {
        if self.price.is_zero() {
            return "Free".to_string();
        }
        let amount = format!("{:.2}", self.price);
        if self.vat_included {
            format!("{amount} (VAT incl.)")
        } else {
            amount
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

pub fn timeslot_count(existing: &[TicketType]) -> usize {
    existing.iter().filter(|ticket| ticket.is_timeslot()).count()
}

pub fn can_add_timeslot(existing: &[TicketType]) -> bool {
    timeslot_count(existing) < MAX_TIMESLOT_TICKETS
}

/// Flat wire shape of a ticket type, as the backend stores and returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticket_structure: TicketStructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_type: Option<ClassTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty_type: Option<LoyaltyTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_type: Option<SeasonKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeslot: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vat_included: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<i32>,
}

impl TryFrom<TicketTypeRecord> for TicketType {
    type Error = FieldError;

    /// Fields that do not belong to the record's structure are dropped.
    fn try_from(record: TicketTypeRecord) -> Result<Self, Self::Error> {
        let kind = match record.ticket_structure {
            TicketStructure::Basic => TicketKind::Basic,
            TicketStructure::Class => TicketKind::Class(
                record
                    .class_type
                    .ok_or_else(|| FieldError::new("class_type", "Class tier is required"))?,
            ),
            TicketStructure::Loyalty => TicketKind::Loyalty(
                record
                    .loyalty_type
                    .ok_or_else(|| FieldError::new("loyalty_type", "Loyalty tier is required"))?,
            ),
            TicketStructure::Season => match record.season_type {
                Some(SeasonKind::Daily) => TicketKind::daily(),
                Some(SeasonKind::Season) => TicketKind::Season {
                    duration_days: Some(record.season_duration.unwrap_or(0)),
                },
                None => {
                    return Err(FieldError::new("season_type", "Season type is required"));
                }
            },
            TicketStructure::Timeslot => TicketKind::timeslot(record.timeslot.unwrap_or_default()),
        };

        Ok(Self {
            id: record
                .id
                .map(TicketTypeId::Persisted)
                .unwrap_or_else(TicketTypeId::local),
            name: record.name,
            kind,
            price: record.price,
            quantity_total: record.quantity,
            vat_included: record.vat_included,
            quantity_sold: record.sold,
            available: record.available,
        })
    }
}

impl From<&TicketType> for TicketTypeRecord {
    fn from(ticket: &TicketType) -> Self {
        let mut record = TicketTypeRecord {
            id: match &ticket.id {
                TicketTypeId::Persisted(id) => Some(id.clone()),
                TicketTypeId::Local(_) => None,
            },
            name: ticket.name.clone(),
            ticket_structure: ticket.structure(),
            price: ticket.price,
            quantity: ticket.quantity_total,
            vat_included: ticket.vat_included,
            ..Default::default()
        };

        match &ticket.kind {
            TicketKind::Basic => {}
            TicketKind::Class(tier) => record.class_type = Some(*tier),
            TicketKind::Loyalty(tier) => record.loyalty_type = Some(*tier),
            TicketKind::Season { duration_days } => match duration_days {
                Some(days) => {
                    record.season_type = Some(SeasonKind::Season);
                    record.season_duration = Some(*days);
                }
                None => record.season_type = Some(SeasonKind::Daily),
            },
            TicketKind::Timeslot { label } => record.timeslot = Some(label.clone()),
        }

        record
    }
}
