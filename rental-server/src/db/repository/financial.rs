//! Financial Record Repository
//!
//! One repository for the three financial collections (receipts,
//! payments, ledger transactions); every method takes the target
//! collection as a [`FinancialKind`].

use surrealdb::{RecordId, Surreal, engine::local::Db};

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{FinancialKind, FinancialRecord};

#[derive(Clone)]
pub struct FinancialRepository {
    base: BaseRepository,
}

impl FinancialRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self, kind: FinancialKind) -> RepoResult<Vec<FinancialRecord>> {
        let query = format!("SELECT * FROM {} ORDER BY serial_number DESC", kind.table());
        let records: Vec<FinancialRecord> = self.base.db().query(query.as_str()).await?.take(0)?;
        Ok(records)
    }

    pub async fn find_by_id(
        &self,
        kind: FinancialKind,
        id: &str,
    ) -> RepoResult<Option<FinancialRecord>> {
        let rid = to_record_id(kind.table(), id);
        let record: Option<FinancialRecord> = self.base.db().select(rid).await?;
        Ok(record)
    }

    /// Every serial number in the collection (serial generator input)
    pub async fn all_serials(&self, kind: FinancialKind) -> RepoResult<Vec<String>> {
        let query = format!("SELECT VALUE serial_number FROM {}", kind.table());
        let serials: Vec<String> = self.base.db().query(query.as_str()).await?.take(0)?;
        Ok(serials)
    }

    /// Persist a record; its serial must not already exist
    pub async fn create(
        &self,
        kind: FinancialKind,
        record: FinancialRecord,
    ) -> RepoResult<FinancialRecord> {
        let query = format!(
            "SELECT VALUE serial_number FROM {} WHERE serial_number = $serial",
            kind.table()
        );
        let existing: Vec<String> = self
            .base
            .db()
            .query(query.as_str())
            .bind(("serial", record.serial_number.clone()))
            .await?
            .take(0)?;
        if !existing.is_empty() {
            return Err(RepoError::Duplicate(format!(
                "{} serial {} already exists",
                kind.label(),
                record.serial_number
            )));
        }

        let created: Option<FinancialRecord> = self
            .base
            .db()
            .create(kind.table())
            .content(record)
            .await?;
        created
            .ok_or_else(|| RepoError::Database(format!("Failed to create {}", kind.label())))
    }

    /// Bulk delete by id set; returns the number actually removed
    pub async fn delete_many(
        &self,
        kind: FinancialKind,
        ids: &[RecordId],
    ) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let query = format!("DELETE {} WHERE id INSIDE $ids RETURN BEFORE", kind.table());
        let deleted: Vec<FinancialRecord> = self
            .base
            .db()
            .query(query.as_str())
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(deleted.len())
    }

    /// Records tied to one invoice (bookkeeping screens)
    pub async fn find_by_invoice(
        &self,
        kind: FinancialKind,
        invoice_id: &RecordId,
    ) -> RepoResult<Vec<FinancialRecord>> {
        let query = format!("SELECT * FROM {} WHERE related_invoice = $invoice", kind.table());
        let records: Vec<FinancialRecord> = self
            .base
            .db()
            .query(query.as_str())
            .bind(("invoice", invoice_id.to_string()))
            .await?
            .take(0)?;
        Ok(records)
    }
}
