use db::{DbErr, retry::SqliteBusy};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    /// Reserved for optimistic concurrency checks; edits are last-write-wins.
    #[error("Conflicting state: {0}")]
    ConflictingState(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(DbErr),
    #[error("{0}")]
    Validation(String),
    #[error("Assignee {0} is not a member of this organization")]
    InvalidAssignee(Uuid),
    #[error("SLA policy is still bound to {0} unresolved ticket(s)")]
    PolicyInUse(u64),
}

pub type Result<T> = std::result::Result<T, TicketError>;

impl From<DbErr> for TicketError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(what) => TicketError::NotFound(what),
            other => TicketError::StoreUnavailable(other),
        }
    }
}

impl SqliteBusy for TicketError {
    fn is_sqlite_busy(&self) -> bool {
        match self {
            TicketError::StoreUnavailable(err) => err.is_sqlite_busy(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn missing_records_become_not_found() {
        let err: TicketError = DbErr::RecordNotFound("Ticket not found".to_string()).into();
        assert!(matches!(err, TicketError::NotFound(ref msg) if msg == "Ticket not found"));
        assert!(!err.is_sqlite_busy());
    }

    #[test]
    fn busy_store_errors_are_retryable() {
        let err: TicketError =
            DbErr::Exec(RuntimeErr::Internal("database is locked".to_string())).into();
        assert!(matches!(err, TicketError::StoreUnavailable(_)));
        assert!(err.is_sqlite_busy());
    }
}
