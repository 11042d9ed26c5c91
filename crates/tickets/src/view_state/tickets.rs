use std::collections::BTreeSet;

use db::models::ticket::{SortDirection, TicketFilters, TicketSort, TicketSortField};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::service::TicketWithSla;

pub const DEFAULT_LIST_PAGE_SIZE: u64 = 50;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Kanban,
    Card,
    Table,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TicketListState {
    pub tickets: Vec<TicketWithSla>,
    pub selected_ticket_id: Option<Uuid>,
    pub selected_ticket_ids: BTreeSet<Uuid>,
    pub focused_index: usize,
    pub view_mode: ViewMode,
    pub filters: TicketFilters,
    pub sort: TicketSort,
    pub search_query: String,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

impl Default for TicketListState {
    fn default() -> Self {
        Self {
            tickets: Vec::new(),
            selected_ticket_id: None,
            selected_ticket_ids: BTreeSet::new(),
            focused_index: 0,
            view_mode: ViewMode::List,
            filters: TicketFilters::default(),
            sort: TicketSort {
                field: TicketSortField::UpdatedAt,
                direction: SortDirection::Desc,
            },
            search_query: String::new(),
            is_loading: true,
            is_refreshing: false,
            page: 1,
            page_size: DEFAULT_LIST_PAGE_SIZE,
            total: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TicketListAction {
    SetTickets(Vec<TicketWithSla>),
    /// Prepends.
    AddTicket(TicketWithSla),
    /// Replaces the ticket with the same id, if present.
    UpdateTicket(TicketWithSla),
    RemoveTicket(Uuid),
    SelectTicket(Option<Uuid>),
    ToggleSelection(Uuid),
    SelectAll,
    ClearSelection,
    SetFocusedIndex(usize),
    MoveFocusUp,
    MoveFocusDown,
    SetViewMode(ViewMode),
    SetFilters(TicketFilters),
    SetSort(TicketSort),
    SetSearchQuery(String),
    SetLoading(bool),
    SetRefreshing(bool),
    SetPage(u64),
    SetTotal(u64),
}

pub fn reduce(mut state: TicketListState, action: TicketListAction) -> TicketListState {
    match action {
        TicketListAction::SetTickets(tickets) => {
            state.tickets = tickets;
            state.is_loading = false;
        }
        TicketListAction::AddTicket(ticket) => state.tickets.insert(0, ticket),
        TicketListAction::UpdateTicket(ticket) => {
            if let Some(slot) = state.tickets.iter_mut().find(|t| t.id == ticket.id) {
                *slot = ticket;
            }
        }
        TicketListAction::RemoveTicket(id) => {
            state.tickets.retain(|t| t.id != id);
            if state.selected_ticket_id == Some(id) {
                state.selected_ticket_id = None;
            }
        }
        TicketListAction::SelectTicket(id) => state.selected_ticket_id = id,
        TicketListAction::ToggleSelection(id) => {
            if !state.selected_ticket_ids.remove(&id) {
                state.selected_ticket_ids.insert(id);
            }
        }
        TicketListAction::SelectAll => {
            state.selected_ticket_ids = state.tickets.iter().map(|t| t.id).collect();
        }
        TicketListAction::ClearSelection => state.selected_ticket_ids.clear(),
        TicketListAction::SetFocusedIndex(index) => state.focused_index = index,
        TicketListAction::MoveFocusUp => {
            state.focused_index = state.focused_index.saturating_sub(1);
        }
        TicketListAction::MoveFocusDown => {
            let last = state.tickets.len().saturating_sub(1);
            state.focused_index = (state.focused_index + 1).min(last);
        }
        TicketListAction::SetViewMode(mode) => state.view_mode = mode,
        TicketListAction::SetFilters(filters) => {
            state.filters = filters;
            state.page = 1;
        }
        TicketListAction::SetSort(sort) => state.sort = sort,
        TicketListAction::SetSearchQuery(query) => {
            state.search_query = query;
            state.page = 1;
        }
        TicketListAction::SetLoading(loading) => state.is_loading = loading,
        TicketListAction::SetRefreshing(refreshing) => state.is_refreshing = refreshing,
        TicketListAction::SetPage(page) => state.page = page,
        TicketListAction::SetTotal(total) => state.total = total,
    }
    state
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::ticket::Ticket;
    use db::types::{TicketChannel, TicketPriority, TicketStatus};

    use super::*;
    use crate::sla::classify_sla;

    fn row(number: i32) -> TicketWithSla {
        let now = Utc::now();
        TicketWithSla {
            ticket: Ticket {
                id: Uuid::new_v4(),
                org_id: Uuid::nil(),
                number,
                title: format!("Ticket {number}"),
                description: None,
                status: TicketStatus::Open,
                priority: TicketPriority::Medium,
                channel: TicketChannel::Email,
                assignee_id: None,
                customer_id: None,
                sla_policy_id: None,
                first_response_due: None,
                sla_deadline: None,
                first_response_at: None,
                resolved_at: None,
                snooze_until: None,
                created_at: now,
                updated_at: now,
            },
            tags: Vec::new(),
            sla: classify_sla(now, None),
        }
    }

    fn apply(state: TicketListState, actions: Vec<TicketListAction>) -> TicketListState {
        actions.into_iter().fold(state, reduce)
    }

    #[test]
    fn defaults_match_initial_screen() {
        let state = TicketListState::default();
        assert!(state.is_loading);
        assert_eq!(state.page_size, 50);
        assert_eq!(state.sort.field, TicketSortField::UpdatedAt);
        assert_eq!(state.view_mode, ViewMode::List);
    }

    #[test]
    fn set_add_and_remove_tickets() {
        let (a, b, c) = (row(1), row(2), row(3));
        let state = apply(
            TicketListState::default(),
            vec![
                TicketListAction::SetTickets(vec![a.clone(), b.clone()]),
                TicketListAction::AddTicket(c.clone()),
                TicketListAction::SelectTicket(Some(b.id)),
                TicketListAction::RemoveTicket(b.id),
            ],
        );
        assert!(!state.is_loading);
        let numbers: Vec<i32> = state.tickets.iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![3, 1]);
        assert_eq!(state.selected_ticket_id, None);

        let state = reduce(state, TicketListAction::SelectTicket(Some(a.id)));
        let state = reduce(state, TicketListAction::RemoveTicket(c.id));
        assert_eq!(state.selected_ticket_id, Some(a.id));
    }

    #[test]
    fn update_replaces_matching_ticket() {
        let a = row(1);
        let mut edited = a.clone();
        edited.ticket.title = "Edited".to_string();
        let state = apply(
            TicketListState::default(),
            vec![
                TicketListAction::SetTickets(vec![a, row(2)]),
                TicketListAction::UpdateTicket(edited),
            ],
        );
        assert_eq!(state.tickets[0].title, "Edited");
        assert_eq!(state.tickets[1].title, "Ticket 2");
    }

    #[test]
    fn selection_toggles_and_select_all() {
        let (a, b) = (row(1), row(2));
        let state = apply(
            TicketListState::default(),
            vec![
                TicketListAction::SetTickets(vec![a.clone(), b.clone()]),
                TicketListAction::ToggleSelection(a.id),
                TicketListAction::ToggleSelection(b.id),
                TicketListAction::ToggleSelection(a.id),
            ],
        );
        assert_eq!(state.selected_ticket_ids, BTreeSet::from([b.id]));

        let state = reduce(state, TicketListAction::SelectAll);
        assert_eq!(state.selected_ticket_ids.len(), 2);
        let state = reduce(state, TicketListAction::ClearSelection);
        assert!(state.selected_ticket_ids.is_empty());
    }

    #[test]
    fn focus_stays_in_bounds() {
        let state = reduce(TicketListState::default(), TicketListAction::MoveFocusUp);
        assert_eq!(state.focused_index, 0);
        let state = reduce(state, TicketListAction::MoveFocusDown);
        assert_eq!(state.focused_index, 0);

        let state = apply(
            state,
            vec![
                TicketListAction::SetTickets(vec![row(1), row(2)]),
                TicketListAction::MoveFocusDown,
                TicketListAction::MoveFocusDown,
                TicketListAction::MoveFocusDown,
            ],
        );
        assert_eq!(state.focused_index, 1);
    }

    #[test]
    fn filters_and_search_reset_page() {
        let state = apply(
            TicketListState::default(),
            vec![TicketListAction::SetPage(4), TicketListAction::SetTotal(200)],
        );
        assert_eq!(state.page, 4);

        let state = reduce(
            state,
            TicketListAction::SetFilters(TicketFilters {
                statuses: vec![TicketStatus::Pending],
                ..Default::default()
            }),
        );
        assert_eq!(state.page, 1);

        let state = apply(
            state,
            vec![
                TicketListAction::SetPage(3),
                TicketListAction::SetSort(TicketSort::default()),
            ],
        );
        assert_eq!(state.page, 3);
        let state = reduce(state, TicketListAction::SetSearchQuery("vpn".to_string()));
        assert_eq!(state.page, 1);
        assert_eq!(state.search_query, "vpn");
        assert_eq!(state.total, 200);
    }
}
