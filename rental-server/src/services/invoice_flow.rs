//! Invoice/Receipt Save-and-Reconcile Flow
//!
//! A multi-step, non-transactional sequence with manual compensation:
//!
//! ```text
//! START -> RECEIPTS_CREATED -> INVOICE_SAVED -> ITEMS_SYNCED -> DONE
//! ```
//!
//! Receipts are created first, then the invoice referencing them, then
//! the item statuses are flipped. Failure after a partial write runs a
//! compensating delete:
//!
//! - invoice save fails -> the just-created receipts are deleted
//!   (best-effort; a failed delete escalates to a critical error)
//! - item-status sync fails -> the just-saved invoice is deleted and
//!   the receipts are left in place
//!
//! The second branch deliberately leaves the receipts behind; callers
//! observe that window and clean up through the bulk-delete endpoint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal, engine::local::Db};

use shared::{DeliveryStatus, EntityRef, ItemStatus, TransactionType};

use crate::db::models::{
    FinancialCreate, FinancialKind, FinancialRecord, Invoice, InvoiceDraft, InvoiceItem,
    InvoiceItemInput, InvoiceUpdate, ReceiptInput,
};
use crate::db::repository::{
    AccountRepository, CustomerRepository, FinancialRepository, InvoiceRepository, to_record_id,
};
use crate::db::repository::invoice::INVOICE_PREFIX;
use crate::services::availability::AvailabilityService;
use crate::services::entity::resolve_entity;
use crate::services::money;
use crate::services::notify::Notifier;
use crate::services::serial::{SerialService, format_serial, parse_serial};
use crate::services::status_sync::{StatusSync, diff_item_sets};
use crate::utils::validation::{validate_amount, validate_non_negative_amount};
use crate::utils::{AppError, AppResult};

const SUB_ITEM_TABLE: &str = "sub_item";
const CUSTOMER_TABLE: &str = "customer";

/// One failed entry in a batch create
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    /// Position in the submitted batch
    pub index: usize,
    pub message: String,
}

/// Outcome of a financial batch create: successes commit even when
/// siblings fail
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub created: Vec<FinancialRecord>,
    pub errors: Vec<BatchError>,
}

impl BatchOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of a successful save-and-reconcile run
#[derive(Debug, Serialize)]
pub struct CreatedInvoice {
    pub invoice: Invoice,
    pub receipts: Vec<FinancialRecord>,
    /// Receipt entries that failed while the rest committed
    pub receipt_errors: Vec<BatchError>,
    /// Serial for the next draft, so a client can reset its state
    pub next_invoice_number: String,
}

/// Invoice navigation direction
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Numeric neighbor of an invoice number; refuses to go below 1
pub fn neighbor_number(current: &str, direction: Direction) -> AppResult<String> {
    let n = parse_serial(INVOICE_PREFIX, current).ok_or_else(|| {
        AppError::validation(format!("Invalid invoice number: {current}"))
    })?;
    match direction {
        Direction::Prev if n <= 1 => {
            Err(AppError::validation("Already at the first invoice"))
        }
        Direction::Prev => Ok(format_serial(INVOICE_PREFIX, n - 1)),
        Direction::Next => Ok(format_serial(INVOICE_PREFIX, n + 1)),
    }
}

/// Orchestrates invoice creation/editing and the financial records
/// around it
pub struct InvoiceFlow {
    db: Surreal<Db>,
    invoices: InvoiceRepository,
    financial: FinancialRepository,
    serials: SerialService,
    availability: AvailabilityService,
    sync: Arc<dyn StatusSync>,
    notifier: Arc<dyn Notifier>,
}

impl InvoiceFlow {
    pub fn new(
        db: Surreal<Db>,
        availability: AvailabilityService,
        sync: Arc<dyn StatusSync>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            invoices: InvoiceRepository::new(db.clone()),
            financial: FinancialRepository::new(db.clone()),
            serials: SerialService::new(db.clone()),
            db,
            availability,
            sync,
            notifier,
        }
    }

    // ========================================================================
    // Create path
    // ========================================================================

    /// Save a draft invoice with its proposed receipts: receipts first,
    /// then the invoice, then the item sync, each step compensating the
    /// one before it on failure
    pub async fn create_invoice(&self, draft: InvoiceDraft) -> AppResult<CreatedInvoice> {
        if draft.items.is_empty() {
            return Err(AppError::validation("Invoice needs at least one item"));
        }

        let customer_rid = to_record_id(CUSTOMER_TABLE, &draft.customer);
        CustomerRepository::new(self.db.clone())
            .resolve(&customer_rid)
            .await?;

        // Validate item references before writing anything
        let sub_item_ids: Vec<RecordId> = draft
            .items
            .iter()
            .map(|item| to_record_id(SUB_ITEM_TABLE, &item.sub_item))
            .collect();
        let sub_items = self.availability.ensure_available(&sub_item_ids).await?;

        let items = build_items(&draft.items, &sub_items);
        let total_amount = match draft.total_amount {
            Some(total) => total,
            None => money::sum_amounts(items.iter().map(|i| &i.rent_rate)),
        };
        validate_non_negative_amount(total_amount, "total_amount")?;

        let invoice_number = match draft.invoice_number {
            Some(number) => number,
            None => self.serials.next_invoice_number().await?,
        };

        // Step 1-2: create the receipts and remember what we created
        let (receipts, receipt_errors) = self
            .create_draft_receipts(&customer_rid, &draft.receipts)
            .await;
        let receipt_ids: Vec<RecordId> = receipts.iter().filter_map(|r| r.id.clone()).collect();

        // Step 3: payment state from what actually committed
        let total_paid = money::sum_amounts(receipts.iter().map(|r| &r.amount));
        let payment_status = money::compute_payment_status(total_amount, total_paid);
        let balance_amount = money::balance_amount(total_amount, total_paid);

        let now = shared::util::now_millis();
        let invoice = Invoice {
            id: None,
            invoice_number: invoice_number.clone(),
            customer: customer_rid,
            items,
            total_amount,
            delivery_date: draft.delivery_date,
            wedding_date: draft.wedding_date,
            status: draft.status.unwrap_or_default(),
            payment_status,
            advance_amount: total_paid,
            balance_amount,
            receipts: receipt_ids.clone(),
            created_at: now,
            updated_at: now,
        };

        // Step 4: persist the invoice; roll the receipts back if it fails
        let saved = match self.invoices.create(invoice).await {
            Ok(saved) => saved,
            Err(save_err) => {
                return Err(self.rollback_receipts(&receipt_ids, save_err.into()).await);
            }
        };

        // Step 5: flip item statuses; roll the invoice back if it fails.
        // The receipts deliberately survive this branch.
        if let Err(sync_err) = self.sync.set_item_status(&sub_item_ids, ItemStatus::Rented).await {
            return Err(self.rollback_invoice(&saved, sync_err.into()).await);
        }

        // Step 6: the serial for the next draft
        let next_invoice_number = self.serials.next_invoice_number().await?;

        self.notifier
            .info(&format!("Invoice {invoice_number} saved"));

        Ok(CreatedInvoice {
            invoice: saved,
            receipts,
            receipt_errors,
            next_invoice_number,
        })
    }

    /// Create the proposed receipts one by one, collecting per-entry
    /// failures while the rest commit
    async fn create_draft_receipts(
        &self,
        customer: &RecordId,
        inputs: &[ReceiptInput],
    ) -> (Vec<FinancialRecord>, Vec<BatchError>) {
        let mut created = Vec::new();
        let mut errors = Vec::new();

        for (index, input) in inputs.iter().enumerate() {
            if let Err(e) = validate_amount(input.amount, "amount") {
                errors.push(BatchError {
                    index,
                    message: e.to_string(),
                });
                continue;
            }

            let serial = match self.serials.next_financial_serial(FinancialKind::Receipt).await {
                Ok(serial) => serial,
                Err(e) => {
                    errors.push(BatchError {
                        index,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let record = FinancialRecord {
                id: None,
                entity: EntityRef::Customer(customer.to_string()),
                related_invoice: None,
                transaction_type: TransactionType::Income,
                serial_number: serial,
                amount: input.amount,
                method: input.method,
                date: input
                    .date
                    .clone()
                    .unwrap_or_else(shared::util::today_iso),
                note: input.note.clone(),
                source_page: Some("invoice".to_string()),
                created_at: shared::util::now_millis(),
            };

            match self.financial.create(FinancialKind::Receipt, record).await {
                Ok(record) => created.push(record),
                Err(e) => errors.push(BatchError {
                    index,
                    message: e.to_string(),
                }),
            }
        }

        (created, errors)
    }

    /// Compensate a failed invoice save: delete the receipts created in
    /// this attempt. A failed delete escalates to a critical error.
    async fn rollback_receipts(&self, receipt_ids: &[RecordId], cause: AppError) -> AppError {
        match self
            .financial
            .delete_many(FinancialKind::Receipt, receipt_ids)
            .await
        {
            Ok(removed) => {
                self.notifier.error(&format!(
                    "Invoice save failed, rolled back {removed} receipt(s): {cause}"
                ));
                cause
            }
            Err(delete_err) => {
                let message = format!(
                    "invoice save failed ({cause}) and receipt rollback also failed ({delete_err}); \
                     orphaned receipts remain"
                );
                self.notifier.critical(&message);
                AppError::critical(message)
            }
        }
    }

    /// Compensate a failed item-status sync: delete the just-saved
    /// invoice. Receipts from this attempt are NOT touched here.
    async fn rollback_invoice(&self, invoice: &Invoice, cause: AppError) -> AppError {
        let Some(rid) = invoice.id.clone() else {
            return cause;
        };
        match self.invoices.delete(&rid).await {
            Ok(_) => {
                self.notifier.error(&format!(
                    "Item status sync failed, invoice {} rolled back: {cause}",
                    invoice.invoice_number
                ));
                cause
            }
            Err(delete_err) => {
                let message = format!(
                    "item status sync failed ({cause}) and invoice rollback also failed \
                     ({delete_err}); invoice {} needs manual cleanup",
                    invoice.invoice_number
                );
                self.notifier.critical(&message);
                AppError::critical(message)
            }
        }
    }

    // ========================================================================
    // Edit path
    // ========================================================================

    /// Update an existing invoice by number or id. Recomputes the
    /// old-vs-new item diff and re-syncs statuses; receipts are managed
    /// as separate actions in edit mode and are not touched here.
    pub async fn update_invoice(&self, key: &str, update: InvoiceUpdate) -> AppResult<Invoice> {
        let existing = self
            .invoices
            .find_by_id_or_number(key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {key} not found")))?;
        let rid = existing
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Invoice record has no id"))?;

        let old_ids: Vec<RecordId> = existing.items.iter().map(|i| i.sub_item.clone()).collect();

        let mut new_items: Option<Vec<InvoiceItem>> = None;
        let mut removed = Vec::new();
        let mut added = Vec::new();

        if let Some(inputs) = &update.items {
            if inputs.is_empty() {
                return Err(AppError::validation("Invoice needs at least one item"));
            }
            let new_ids: Vec<RecordId> = inputs
                .iter()
                .map(|item| to_record_id(SUB_ITEM_TABLE, &item.sub_item))
                .collect();
            let sub_items = self.availability.ensure_exists(&new_ids).await?;

            (removed, added) = diff_item_sets(&old_ids, &new_ids);

            // Double-booking policy applies to added items only
            let added_items: Vec<_> = sub_items
                .iter()
                .filter(|item| {
                    item.id
                        .as_ref()
                        .map(|id| added.contains(id))
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            self.availability.assert_not_rented(&added_items)?;

            let mut items = build_items(inputs, &sub_items);
            // Retained lines keep their current status and delivery state
            for item in &mut items {
                if let Some(previous) = existing
                    .items
                    .iter()
                    .find(|old| old.sub_item == item.sub_item)
                {
                    item.status = previous.status;
                    item.delivery_status = previous.delivery_status;
                }
            }
            new_items = Some(items);
        }

        // Recompute money fields when the total or the items changed
        let new_total = match (update.total_amount, &new_items) {
            (Some(total), _) => Some(total),
            (None, Some(items)) => Some(money::sum_amounts(items.iter().map(|i| &i.rent_rate))),
            (None, None) => None,
        };
        let (balance, payment_status) = match new_total {
            Some(total) => {
                validate_non_negative_amount(total, "total_amount")?;
                (
                    Some(money::balance_amount(total, existing.advance_amount)),
                    Some(money::compute_payment_status(
                        total,
                        existing.advance_amount,
                    )),
                )
            }
            None => (None, None),
        };

        let updated = self
            .invoices
            .update_fields(
                &rid,
                new_items,
                new_total,
                balance,
                payment_status,
                update.delivery_date,
                update.wedding_date,
                update.status,
            )
            .await?;

        // Sync statuses after the document is persisted: removed items
        // free up, added items become rented
        if !removed.is_empty() {
            self.sync
                .set_item_status(&removed, ItemStatus::Available)
                .await?;
        }
        if !added.is_empty() {
            self.sync.set_item_status(&added, ItemStatus::Rented).await?;
        }

        Ok(updated)
    }

    /// Delete an invoice and release its items back to `Available`
    pub async fn delete_invoice(&self, key: &str) -> AppResult<bool> {
        let Some(invoice) = self.invoices.find_by_id_or_number(key).await? else {
            return Ok(false);
        };
        let Some(rid) = invoice.id.clone() else {
            return Ok(false);
        };

        let item_ids: Vec<RecordId> = invoice.items.iter().map(|i| i.sub_item.clone()).collect();
        let deleted = self.invoices.delete(&rid).await?;
        if deleted {
            self.sync
                .set_item_status(&item_ids, ItemStatus::Available)
                .await?;
        }
        Ok(deleted)
    }

    /// Mark returned items `Available` again (both stores)
    pub async fn return_items(&self, ids: &[RecordId]) -> AppResult<usize> {
        Ok(self.sync.set_item_status(ids, ItemStatus::Available).await?)
    }

    /// Change the delivery state of lines on one invoice; the sub-item
    /// documents are deliberately untouched
    pub async fn set_delivery_status(
        &self,
        invoice_key: &str,
        ids: &[RecordId],
        status: DeliveryStatus,
    ) -> AppResult<usize> {
        let invoice = self
            .invoices
            .find_by_id_or_number(invoice_key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {invoice_key} not found")))?;
        let rid = invoice
            .id
            .ok_or_else(|| AppError::internal("Invoice record has no id"))?;
        Ok(self.sync.set_delivery_status(&rid, ids, status).await?)
    }

    // ========================================================================
    // Financial batches
    // ========================================================================

    /// Create a batch of financial records. Entries are attempted
    /// independently; failures land in the errors array while the rest
    /// commit. Records against an account shift its balance.
    pub async fn create_financial_batch(
        &self,
        kind: FinancialKind,
        entries: Vec<FinancialCreate>,
    ) -> AppResult<BatchOutcome> {
        let mut created = Vec::new();
        let mut errors = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            match self.create_financial_entry(kind, entry).await {
                Ok(record) => created.push(record),
                Err(e) => errors.push(BatchError {
                    index,
                    message: e.to_string(),
                }),
            }
        }

        Ok(BatchOutcome { created, errors })
    }

    async fn create_financial_entry(
        &self,
        kind: FinancialKind,
        entry: FinancialCreate,
    ) -> AppResult<FinancialRecord> {
        validate_amount(entry.amount, "amount")?;
        resolve_entity(&self.db, &entry.entity).await?;

        let related_invoice = match &entry.related_invoice {
            Some(key) => {
                let invoice = self
                    .invoices
                    .find_by_id_or_number(key)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Invoice {key} not found")))?;
                invoice.id
            }
            None => None,
        };

        let serial = self.serials.next_financial_serial(kind).await?;
        let record = FinancialRecord {
            id: None,
            entity: entry.entity.clone(),
            related_invoice,
            transaction_type: entry.transaction_type,
            serial_number: serial,
            amount: entry.amount,
            method: entry.method,
            date: entry.date.unwrap_or_else(shared::util::today_iso),
            note: entry.note,
            source_page: entry.source_page,
            created_at: shared::util::now_millis(),
        };

        let created = self.financial.create(kind, record).await?;

        // Ledger side effect: account entities carry a running balance
        if let EntityRef::Account(account_id) = &entry.entity {
            let delta = match entry.transaction_type {
                TransactionType::Income => created.amount,
                TransactionType::Expense => -created.amount,
            };
            let rid = to_record_id("account", account_id);
            AccountRepository::new(self.db.clone())
                .adjust_balance(&rid, delta)
                .await?;
        }

        Ok(created)
    }

    /// Bulk delete (the rollback path UIs use after a failed save)
    pub async fn delete_financial(&self, kind: FinancialKind, ids: &[String]) -> AppResult<usize> {
        let rids: Vec<RecordId> = ids.iter().map(|id| to_record_id(kind.table(), id)).collect();
        Ok(self.financial.delete_many(kind, &rids).await?)
    }
}

/// Build embedded line items from the draft inputs and their resolved
/// sub-items (same order)
fn build_items(inputs: &[InvoiceItemInput], sub_items: &[crate::db::models::SubItem]) -> Vec<InvoiceItem> {
    inputs
        .iter()
        .zip(sub_items.iter())
        .map(|(input, sub)| InvoiceItem {
            sub_item: sub.id.clone().unwrap_or_else(|| {
                to_record_id(SUB_ITEM_TABLE, &input.sub_item)
            }),
            name: input.name.clone().or_else(|| Some(sub.name.clone())),
            category: input.category.clone(),
            rent_rate: input.rent_rate.unwrap_or(sub.rent_rate),
            measurements: input.measurements.clone(),
            status: sub.status,
            delivery_status: DeliveryStatus::Pending,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_navigation_parses_the_suffix() {
        assert_eq!(neighbor_number("INV005", Direction::Prev).unwrap(), "INV004");
        assert_eq!(neighbor_number("INV005", Direction::Next).unwrap(), "INV006");
    }

    #[test]
    fn neighbor_navigation_refuses_to_go_below_one() {
        assert!(neighbor_number("INV001", Direction::Prev).is_err());
        assert_eq!(neighbor_number("INV001", Direction::Next).unwrap(), "INV002");
    }

    #[test]
    fn neighbor_navigation_rejects_foreign_numbers() {
        assert!(neighbor_number("R004", Direction::Next).is_err());
        assert!(neighbor_number("garbage", Direction::Prev).is_err());
    }
}
