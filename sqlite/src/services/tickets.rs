use dashboard_core::{Priority, Row, Ticket, TicketStatus};

use super::change;
use crate::connection::ConnectionProvider;
use crate::crud::Crud;
use crate::error::Result;

/// IT ticket operations.
pub struct TicketService<'p> {
    crud: Crud<'p, Ticket>,
}

impl<'p> TicketService<'p> {
    /// Service over the `tickets` table.
    pub fn new(provider: &'p ConnectionProvider) -> Self {
        Self {
            crud: Crud::new(provider),
        }
    }

    /// Opens a new ticket; the id must be unused.
    pub fn create(&self, ticket: &Ticket) -> Result<()> {
        self.crud.insert(ticket)
    }

    /// The ticket with `ticket_id`, if any.
    pub fn get(&self, ticket_id: &str) -> Result<Option<Ticket>> {
        self.crud.fetch_by_id(ticket_id)
    }

    /// All tickets, ordered by id.
    pub fn list(&self) -> Result<Vec<Ticket>> {
        self.crud.fetch_all()
    }

    /// Tickets with the given priority.
    pub fn list_by_priority(&self, priority: Priority) -> Result<Vec<Ticket>> {
        self.list_where(|t| t.priority == priority)
    }

    /// Tickets in the given status.
    pub fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        self.list_where(|t| t.status == status)
    }

    /// Tickets still being worked: open or in progress.
    pub fn list_open(&self) -> Result<Vec<Ticket>> {
        self.list_where(|t| matches!(t.status, TicketStatus::Open | TicketStatus::InProgress))
    }

    /// Moves a ticket to `status`.
    pub fn update_status(&self, ticket_id: &str, status: TicketStatus) -> Result<Ticket> {
        self.crud.update(ticket_id, change("status", status))
    }

    /// Re-prioritises a ticket.
    pub fn update_priority(&self, ticket_id: &str, priority: Priority) -> Result<Ticket> {
        self.crud.update(ticket_id, change("priority", priority))
    }

    /// Applies a partial update and returns the updated row.
    pub fn update(&self, ticket_id: &str, changes: Row) -> Result<Ticket> {
        self.crud.update(ticket_id, changes)
    }

    /// Returns whether the ticket existed.
    pub fn delete(&self, ticket_id: &str) -> Result<bool> {
        self.crud.delete(ticket_id)
    }

    fn list_where(&self, keep: impl Fn(&Ticket) -> bool) -> Result<Vec<Ticket>> {
        Ok(self.list()?.into_iter().filter(|t| keep(t)).collect())
    }
}
