use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct UiState {
    pub sidebar_open: bool,
    pub sidebar_collapsed: bool,
    pub command_palette_open: bool,
    pub shortcuts_modal_open: bool,
    pub detail_panel_open: bool,
    pub detail_panel_ticket_id: Option<Uuid>,
    pub create_ticket_open: bool,
    pub macro_picker_open: bool,
    pub notifications: Vec<Notification>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            sidebar_collapsed: false,
            command_palette_open: false,
            shortcuts_modal_open: false,
            detail_panel_open: false,
            detail_panel_ticket_id: None,
            create_ticket_open: false,
            macro_picker_open: false,
            notifications: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiAction {
    ToggleSidebar,
    SetSidebarCollapsed(bool),
    SetCommandPaletteOpen(bool),
    SetShortcutsModalOpen(bool),
    OpenDetailPanel(Uuid),
    CloseDetailPanel,
    SetCreateTicketOpen(bool),
    SetMacroPickerOpen(bool),
    /// The caller supplies id and timestamp so the reducer stays pure.
    AddNotification(Notification),
    DismissNotification(String),
}

pub fn reduce(mut state: UiState, action: UiAction) -> UiState {
    match action {
        UiAction::ToggleSidebar => state.sidebar_open = !state.sidebar_open,
        UiAction::SetSidebarCollapsed(collapsed) => state.sidebar_collapsed = collapsed,
        UiAction::SetCommandPaletteOpen(open) => state.command_palette_open = open,
        UiAction::SetShortcutsModalOpen(open) => state.shortcuts_modal_open = open,
        UiAction::OpenDetailPanel(ticket_id) => {
            state.detail_panel_open = true;
            state.detail_panel_ticket_id = Some(ticket_id);
        }
        UiAction::CloseDetailPanel => {
            state.detail_panel_open = false;
            state.detail_panel_ticket_id = None;
        }
        UiAction::SetCreateTicketOpen(open) => state.create_ticket_open = open,
        UiAction::SetMacroPickerOpen(open) => state.macro_picker_open = open,
        UiAction::AddNotification(notification) => state.notifications.push(notification),
        UiAction::DismissNotification(id) => state.notifications.retain(|n| n.id != id),
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: &str) -> Notification {
        Notification {
            id: id.to_string(),
            kind: NotificationKind::Success,
            title: "Ticket resolved".to_string(),
            message: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn detail_panel_open_and_close() {
        let ticket = Uuid::new_v4();
        let state = reduce(UiState::default(), UiAction::OpenDetailPanel(ticket));
        assert!(state.detail_panel_open);
        assert_eq!(state.detail_panel_ticket_id, Some(ticket));

        let state = reduce(state, UiAction::CloseDetailPanel);
        assert!(!state.detail_panel_open);
        assert_eq!(state.detail_panel_ticket_id, None);
    }

    #[test]
    fn sidebar_toggles() {
        let state = reduce(UiState::default(), UiAction::ToggleSidebar);
        assert!(!state.sidebar_open);
        let state = reduce(state, UiAction::ToggleSidebar);
        assert!(state.sidebar_open);
        let state = reduce(state, UiAction::SetSidebarCollapsed(true));
        assert!(state.sidebar_collapsed);
    }

    #[test]
    fn notifications_append_and_dismiss() {
        let state = [
            UiAction::AddNotification(notification("a")),
            UiAction::AddNotification(notification("b")),
            UiAction::DismissNotification("a".to_string()),
            UiAction::DismissNotification("missing".to_string()),
        ]
        .into_iter()
        .fold(UiState::default(), reduce);
        let ids: Vec<&str> = state.notifications.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn dialogs_are_independent() {
        let state = [
            UiAction::SetCommandPaletteOpen(true),
            UiAction::SetCreateTicketOpen(true),
            UiAction::SetMacroPickerOpen(true),
            UiAction::SetShortcutsModalOpen(true),
            UiAction::SetCreateTicketOpen(false),
        ]
        .into_iter()
        .fold(UiState::default(), reduce);
        assert!(state.command_palette_open);
        assert!(state.macro_picker_open);
        assert!(state.shortcuts_modal_open);
        assert!(!state.create_ticket_open);
    }
}
