use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{BookingRequest, EventId, TicketStructure, TicketType, TicketTypeId};

/// Selection state of the ticket picker on an event page.
///
/// The picker shown depends on the event-level structure, which is the
/// structure shared by the event's ticket types.
#[derive(Debug, Clone)]
pub struct TicketSelector {
    structure: TicketStructure,
    tickets: Vec<TicketType>,
    selected: Option<TicketTypeId>,
    quantity: u32,
}

impl TicketSelector {
    pub fn new(tickets: Vec<TicketType>) -> Self {
        let structure = tickets
            .first()
            .map(TicketType::structure)
            .unwrap_or_default();
        Self {
            structure,
            tickets,
            selected: None,
            quantity: 1,
        }
    }

    pub fn structure(&self) -> TicketStructure {
        self.structure
    }

    pub fn tickets(&self) -> &[TicketType] {
        &self.tickets
    }

    /// Returns whether the selection was accepted. Unknown ids and sold
    /// out time slots are ignored.
    pub fn select(&mut self, id: &TicketTypeId) -> bool {
        let Some(ticket) = self.tickets.iter().find(|t| &t.id == id) else {
            debug!(ticket_type_id = %id, "Ignoring unknown ticket type");
            return false;
        };
        if ticket.is_timeslot() && ticket.is_sold_out() {
            debug!(ticket_type_id = %id, "Ignoring sold out time slot");
            return false;
        }

        if self.selected.as_ref() != Some(id) {
            self.quantity = 1;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.quantity = 1;
    }

    /// A basic event with a single ticket type has it selected implicitly.
    pub fn selected(&self) -> Option<&TicketType> {
        match &self.selected {
            Some(id) => self.tickets.iter().find(|t| &t.id == id),
            None if self.structure == TicketStructure::Basic && self.tickets.len() == 1 => {
                self.tickets.first()
            }
            None => None,
        }
    }

    /// False while nothing is selected or the selection is sold out.
    pub fn can_buy(&self) -> bool {
        self.selected().is_some_and(|ticket| !ticket.is_sold_out())
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Clamps to at least one and at most what is still available. A sold
    /// out selection stays at one.
    pub fn set_quantity(&mut self, quantity: u32) -> u32 {
        let max = match self.selected().and_then(|t| t.available) {
            Some(available) => u32::try_from(available).unwrap_or(0).max(1),
            None => u32::MAX,
        };
        self.quantity = quantity.clamp(1, max);
        self.quantity
    }

    pub fn total_price(&self) -> Option<Decimal> {
        self.selected()
            .map(|ticket| ticket.price * Decimal::from(self.quantity))
    }

    pub fn booking_request(&self, event_id: &EventId) -> Option<BookingRequest> {
        if !self.can_buy() {
            return None;
        }
        self.selected().map(|ticket| BookingRequest {
            event_id: event_id.clone(),
            ticket_type_id: ticket.id.to_string(),
            quantity: self.quantity,
        })
    }
}
