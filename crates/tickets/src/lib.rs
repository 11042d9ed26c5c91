//! Ticket lifecycle and SLA engine: status transitions, first-response and
//! resolution tracking, SLA classification and org-scoped ticket queries.

pub mod actor;
pub mod clock;
pub mod error;
pub mod query;
pub mod requests;
pub mod service;
pub mod sink;
pub mod sla;
pub mod view_state;

pub use actor::Actor;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, TicketError};
pub use query::{PageRequest, TicketListParams, TicketPage, TicketQuery};
pub use requests::{CreateTicket, UpdateTicket};
pub use service::{OrganizationCreated, TicketDetail, TicketService, TicketWithSla};
pub use sink::{ActivitySink, DbActivitySink};
pub use sla::{
    DeadlineStrategy, SlaDeadlines, SlaSnapshot, SlaStatus, WallClockDeadlines, classify_sla,
};
