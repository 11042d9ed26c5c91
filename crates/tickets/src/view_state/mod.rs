//! Client view state as pure `(state, action) -> state` transitions.

mod tickets;
mod ui;

pub use tickets::{TicketListAction, TicketListState, ViewMode, reduce as reduce_ticket_list};
pub use ui::{Notification, NotificationKind, UiAction, UiState, reduce as reduce_ui};
