use std::sync::Arc;

use tickets::TicketService;

use crate::http::auth::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub tickets: TicketService,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(tickets: TicketService, tokens: TokenKeys) -> Self {
        Self {
            tickets,
            tokens: Arc::new(tokens),
        }
    }
}
