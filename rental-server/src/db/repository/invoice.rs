//! Invoice Repository

use surrealdb::{RecordId, Surreal, engine::local::Db};

use shared::{InvoiceStatus, PaymentStatus};

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{Invoice, InvoiceItem};

const INVOICE_TABLE: &str = "invoice";

/// Invoice number prefix
pub const INVOICE_PREFIX: &str = "INV";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Invoice>> {
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query("SELECT * FROM invoice ORDER BY invoice_number DESC")
            .await?
            .take(0)?;
        Ok(invoices)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Invoice>> {
        let rid = to_record_id(INVOICE_TABLE, id);
        let invoice: Option<Invoice> = self.base.db().select(rid).await?;
        Ok(invoice)
    }

    pub async fn find_by_number(&self, number: &str) -> RepoResult<Option<Invoice>> {
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE invoice_number = $number")
            .bind(("number", number.to_string()))
            .await?
            .take(0)?;
        Ok(invoices.into_iter().next())
    }

    /// Look up by invoice number (`INV...`) or record id
    pub async fn find_by_id_or_number(&self, key: &str) -> RepoResult<Option<Invoice>> {
        if key.starts_with(INVOICE_PREFIX) {
            self.find_by_number(key).await
        } else {
            self.find_by_id(key).await
        }
    }

    /// Every invoice number currently in the store
    pub async fn all_numbers(&self) -> RepoResult<Vec<String>> {
        let numbers: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE invoice_number FROM invoice")
            .await?
            .take(0)?;
        Ok(numbers)
    }

    /// Invoice with the highest numeric suffix, if any exist
    pub async fn find_latest(&self) -> RepoResult<Option<Invoice>> {
        let numbers = self.all_numbers().await?;
        let latest = numbers.into_iter().max_by_key(|n| {
            n.strip_prefix(INVOICE_PREFIX)
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0)
        });
        match latest {
            Some(number) => self.find_by_number(&number).await,
            None => Ok(None),
        }
    }

    /// Persist a new invoice; the number must not already exist
    pub async fn create(&self, invoice: Invoice) -> RepoResult<Invoice> {
        if self.find_by_number(&invoice.invoice_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Invoice number {} already exists",
                invoice.invoice_number
            )));
        }

        let created: Option<Invoice> = self
            .base
            .db()
            .create(INVOICE_TABLE)
            .content(invoice)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create invoice".into()))
    }

    /// Field-wise update used by the edit path
    #[allow(clippy::too_many_arguments)]
    pub async fn update_fields(
        &self,
        rid: &RecordId,
        items: Option<Vec<InvoiceItem>>,
        total_amount: Option<f64>,
        balance_amount: Option<f64>,
        payment_status: Option<PaymentStatus>,
        delivery_date: Option<String>,
        wedding_date: Option<String>,
        status: Option<InvoiceStatus>,
    ) -> RepoResult<Invoice> {
        let mut set_parts: Vec<&str> = Vec::new();
        if items.is_some() {
            set_parts.push("items = $items");
        }
        if total_amount.is_some() {
            set_parts.push("total_amount = $total_amount");
        }
        if balance_amount.is_some() {
            set_parts.push("balance_amount = $balance_amount");
        }
        if payment_status.is_some() {
            set_parts.push("payment_status = $payment_status");
        }
        if delivery_date.is_some() {
            set_parts.push("delivery_date = $delivery_date");
        }
        if wedding_date.is_some() {
            set_parts.push("wedding_date = $wedding_date");
        }
        if status.is_some() {
            set_parts.push("status = $status");
        }

        if set_parts.is_empty() {
            let invoice: Option<Invoice> = self.base.db().select(rid.clone()).await?;
            return invoice.ok_or_else(|| RepoError::NotFound(format!("Invoice {rid} not found")));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $rid SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str.as_str())
            .bind(("rid", rid.clone()))
            .bind(("now", shared::util::now_millis()));

        if let Some(v) = items {
            query = query.bind(("items", v));
        }
        if let Some(v) = total_amount {
            query = query.bind(("total_amount", v));
        }
        if let Some(v) = balance_amount {
            query = query.bind(("balance_amount", v));
        }
        if let Some(v) = payment_status {
            query = query.bind(("payment_status", v));
        }
        if let Some(v) = delivery_date {
            query = query.bind(("delivery_date", v));
        }
        if let Some(v) = wedding_date {
            query = query.bind(("wedding_date", v));
        }
        if let Some(v) = status {
            query = query.bind(("status", v));
        }

        let invoices: Vec<Invoice> = query.await?.take(0)?;
        invoices
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {rid} not found")))
    }

    /// Replace the embedded item list (status synchronizer write path)
    pub async fn set_items(&self, rid: &RecordId, items: Vec<InvoiceItem>) -> RepoResult<()> {
        let _updated: Vec<Invoice> = self
            .base
            .db()
            .query("UPDATE $rid SET items = $items, updated_at = $now RETURN AFTER")
            .bind(("rid", rid.clone()))
            .bind(("items", items))
            .bind(("now", shared::util::now_millis()))
            .await?
            .take(0)?;
        Ok(())
    }

    pub async fn delete(&self, rid: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Invoice> = self.base.db().delete(rid.clone()).await?;
        Ok(deleted.is_some())
    }

    /// Invoices whose embedded items reference any of the given sub-items
    pub async fn find_referencing(&self, sub_item_ids: &[RecordId]) -> RepoResult<Vec<Invoice>> {
        if sub_item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_strings: Vec<String> = sub_item_ids.iter().map(|id| id.to_string()).collect();
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE items.sub_item CONTAINSANY $ids")
            .bind(("ids", id_strings))
            .await?
            .take(0)?;
        Ok(invoices)
    }
}
