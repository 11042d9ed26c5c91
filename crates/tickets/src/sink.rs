use async_trait::async_trait;
use db::{
    DatabaseTransaction, DbErr,
    models::activity::{Activity, NewActivity},
};

/// Destination for ticket history entries. Appends run inside the caller's
/// transaction, so a failed append aborts the whole operation.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn append(&self, txn: &DatabaseTransaction, entry: &NewActivity) -> Result<(), DbErr>;
}

/// Writes entries to the `activities` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DbActivitySink;

#[async_trait]
impl ActivitySink for DbActivitySink {
    async fn append(&self, txn: &DatabaseTransaction, entry: &NewActivity) -> Result<(), DbErr> {
        Activity::append(txn, entry).await?;
        tracing::trace!(ticket_id = %entry.ticket_id, kind = entry.kind, "activity recorded");
        Ok(())
    }
}
