use tracing::{error, info, warn};

use crate::bus::{DashboardEvent, RefreshBus};
use crate::client::ApiClient;
use crate::draft::{
    Capacity, CategorySelection, EventDetails, EventDraft, EventPayload, ImageUpload,
    LocationDetails, MediaDetails, Pricing, Schedule, WizardStep, MAX_INTERESTS,
};
use crate::models::ticket::can_add_timeslot;
use crate::models::{CategoryId, Event, EventId, PromoCode, TicketType, TicketTypeId};
use crate::utils::error::{DashboardError, DraftError};

/// Owns the wizard state from the moment the creation dialog opens until
/// the draft is submitted or discarded.
///
/// `submit` borrows the builder mutably for the whole request, so a second
/// submit cannot start while one is in flight.
#[derive(Debug, Default)]
pub struct EventDraftBuilder {
    draft: EventDraft,
    step: WizardStep,
    editing: Option<EventId>,
    last_error: Option<String>,
}

impl EventDraftBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the wizard against an existing event. Ticket type and promo
    /// code ids are kept so the update refers to the stored rows.
    pub fn for_event(event: &Event) -> Result<Self, DraftError> {
        let draft = hydrate(event)?;
        info!(event_id = %event.id, "Editing event");
        Ok(Self {
            draft,
            editing: Some(event.id.clone()),
            ..Self::default()
        })
    }

    /// Starts a new draft pre-filled from an existing event.
    pub fn duplicate(event: &Event) -> Result<Self, DraftError> {
        let mut draft = hydrate(event)?;
        for ticket in &mut draft.pricing.ticket_types {
            ticket.id = TicketTypeId::local();
            ticket.quantity_sold = None;
            ticket.available = None;
        }
        for promo in &mut draft.promo_codes {
            promo.id = None;
        }
        Ok(Self {
            draft,
            ..Self::default()
        })
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn editing(&self) -> Option<&EventId> {
        self.editing.as_ref()
    }

    /// Message of the last failed submit, for the error banner.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn next(&mut self) -> WizardStep {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        self.step
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Discards everything, as on close or after a successful submit.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // Step 1
    pub fn set_location(&mut self, location: LocationDetails) {
        self.draft.location = location;
    }

    // Step 2
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.draft.schedule = schedule;
    }

    // Step 3
    pub fn select_category(&mut self, category: CategoryId) {
        self.draft.category.category = Some(category);
    }

    pub fn clear_category(&mut self) {
        self.draft.category.category = None;
    }

    /// Blank and duplicate interests are ignored; a sixth one is rejected.
    pub fn add_interest(&mut self, interest: &str) -> Result<(), DraftError> {
        let interest = interest.trim();
        let interests = &mut self.draft.category.interests;
        if interest.is_empty() || interests.iter().any(|i| i.eq_ignore_ascii_case(interest)) {
            return Ok(());
        }
        if interests.len() >= MAX_INTERESTS {
            return Err(DraftError::InterestLimit);
        }
        interests.push(interest.to_string());
        Ok(())
    }

    pub fn remove_interest(&mut self, interest: &str) {
        self.draft
            .category
            .interests
            .retain(|i| !i.eq_ignore_ascii_case(interest.trim()));
    }

    // Step 4
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.media.name = name.into();
    }

    pub fn attach_image(&mut self, image: ImageUpload) {
        self.draft.media.image = Some(image);
    }

    pub fn remove_image(&mut self) {
        self.draft.media.image = None;
        self.draft.media.image_url = None;
    }

    // Step 5
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.details.description = description.into();
    }

    pub fn set_capacity(&mut self, capacity: Capacity) {
        self.draft.details.capacity = capacity;
    }

    // Step 6
    pub fn set_free(&mut self, is_free: bool) {
        self.draft.pricing.is_free = is_free;
    }

    pub fn add_ticket_type(&mut self, ticket: TicketType) -> Result<&TicketTypeId, DraftError> {
        let tickets = &mut self.draft.pricing.ticket_types;
        if ticket.is_timeslot() && !can_add_timeslot(tickets) {
            warn!(name = %ticket.name, "Rejected time slot ticket over the limit");
            return Err(DraftError::TimeslotLimit);
        }
        tickets.push(ticket);
        Ok(&tickets[tickets.len() - 1].id)
    }

    /// Replaces an entry in place, keeping its id.
    pub fn update_ticket_type(
        &mut self,
        id: &TicketTypeId,
        mut ticket: TicketType,
    ) -> Result<(), DraftError> {
        let tickets = &mut self.draft.pricing.ticket_types;
        let index = tickets
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| DraftError::UnknownTicketType(id.to_string()))?;

        if ticket.is_timeslot() && !tickets[index].is_timeslot() && !can_add_timeslot(tickets) {
            return Err(DraftError::TimeslotLimit);
        }

        ticket.id = id.clone();
        tickets[index] = ticket;
        Ok(())
    }

    pub fn remove_ticket_type(&mut self, id: &TicketTypeId) -> Option<TicketType> {
        let tickets = &mut self.draft.pricing.ticket_types;
        let index = tickets.iter().position(|t| &t.id == id)?;
        Some(tickets.remove(index))
    }

    // Step 7
    /// The code is upper-cased before the duplicate check.
    pub fn add_promo_code(&mut self, mut promo: PromoCode) -> Result<(), DraftError> {
        promo.code = promo.code.trim().to_uppercase();
        if let Some(error) = promo.validate().into_iter().next() {
            return Err(DraftError::InvalidPromoCode {
                code: promo.code,
                error,
            });
        }
        if self.draft.promo_codes.iter().any(|p| p.code == promo.code) {
            return Err(DraftError::DuplicatePromoCode(promo.code));
        }
        self.draft.promo_codes.push(promo);
        Ok(())
    }

    pub fn remove_promo_code(&mut self, code: &str) -> Option<PromoCode> {
        let code = code.trim().to_uppercase();
        let index = self.draft.promo_codes.iter().position(|p| p.code == code)?;
        Some(self.draft.promo_codes.remove(index))
    }

    /// Submit-time checks. The first failing rule is reported.
    pub fn validate(&self) -> Result<(), DraftError> {
        let draft = &self.draft;

        if draft.media.name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }
        if draft.schedule.start_date.is_none() || draft.schedule.start_time.is_none() {
            return Err(DraftError::MissingSchedule);
        }
        if draft.category.category.is_none() {
            return Err(DraftError::MissingCategory);
        }
        if draft.details.description.trim().is_empty() {
            return Err(DraftError::MissingDescription);
        }

        if !draft.pricing.is_free {
            let tickets = &draft.pricing.ticket_types;
            let first = tickets.first().ok_or(DraftError::NoTicketTypes)?;

            for ticket in tickets {
                if let Some(error) = ticket.validate().into_iter().next() {
                    return Err(DraftError::InvalidTicketType {
                        name: ticket.name.clone(),
                        error,
                    });
                }
            }
            if tickets.iter().any(|t| t.structure() != first.structure()) {
                return Err(DraftError::MixedTicketStructures);
            }
        }

        for promo in &draft.promo_codes {
            if let Some(error) = promo.validate().into_iter().next() {
                return Err(DraftError::InvalidPromoCode {
                    code: promo.code.clone(),
                    error,
                });
            }
        }

        Ok(())
    }

    pub fn payload(&self) -> Result<EventPayload, DashboardError> {
        self.validate()?;
        Ok(EventPayload::from_draft(&self.draft)?)
    }

    /// Validates, sends the payload once, and resets on success. On failure
    /// the draft is left untouched so it can be corrected and resubmitted.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        bus: &RefreshBus,
    ) -> Result<Event, DashboardError> {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(code = e.code(), error = %e, "Event draft rejected");
                self.last_error = Some(e.user_message());
                return Err(e);
            }
        };

        let result = match &self.editing {
            Some(id) => client.update_event(id, payload).await,
            None => client.create_event(payload).await,
        };

        match result {
            Ok(event) => {
                info!(event_id = %event.id, updated = self.editing.is_some(), "Event saved");
                bus.publish(DashboardEvent::EventsChanged {
                    event_id: event.id.clone(),
                });
                self.reset();
                Ok(event)
            }
            Err(e) => {
                error!(code = e.code(), "Event submit failed");
                self.last_error = Some(e.user_message());
                Err(e.into())
            }
        }
    }
}

fn hydrate(event: &Event) -> Result<EventDraft, DraftError> {
    let ticket_types = event
        .ticket_types
        .iter()
        .cloned()
        .map(TicketType::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(DraftError::InvalidRecord)?;

    let capacity = match (event.is_unlimited, event.capacity) {
        (false, Some(limit)) => Capacity::Limited(limit),
        _ => Capacity::Unlimited,
    };

    Ok(EventDraft {
        location: LocationDetails {
            location_type: event.location_type,
            venue: event.venue.clone().unwrap_or_default(),
            address: event.address.clone().unwrap_or_default(),
            online_link: event.online_link.clone().unwrap_or_default(),
        },
        schedule: Schedule {
            start_date: event.start_date,
            start_time: event.start_time,
            end_date: event.end_date,
            end_time: event.end_time,
        },
        category: CategorySelection {
            category: event.category_id.clone(),
            interests: event.interests.iter().take(MAX_INTERESTS).cloned().collect(),
        },
        media: MediaDetails {
            name: event.title.clone(),
            image: None,
            image_url: event.image_url.clone(),
        },
        details: EventDetails {
            description: event.description.clone(),
            capacity,
        },
        pricing: Pricing {
            is_free: event.is_free,
            ticket_types,
        },
        promo_codes: event.promo_codes.clone(),
    })
}
