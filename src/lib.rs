//! Typed core of the partner and attendee dashboards of an event-ticketing
//! platform: the ticket pricing model, the event creation wizard, the ticket
//! selector and the REST client they talk to the backend through.

pub mod bus;
pub mod client;
pub mod config;
pub mod draft;
pub mod models;
pub mod selector;
pub mod session;
pub mod utils;

pub use bus::{DashboardEvent, RefreshBus};
pub use client::ApiClient;
pub use config::Config;
pub use draft::{EventDraft, EventDraftBuilder, EventPayload, WizardStep};
pub use selector::TicketSelector;
pub use session::{Role, Session, SessionHandle};
pub use utils::error::{ApiError, DashboardError, DraftError, FieldError};
