//! Item Status Synchronizer
//!
//! The rental status lives in two places: on the sub-item document and
//! on the denormalized copy embedded in every invoice that references
//! it. This module is the only writer that touches both, in one pass:
//! a bulk update over the sub-item collection, then a read-modify-write
//! of each referencing invoice's embedded item list.
//!
//! Delivery status is the asymmetric case: it exists only on the
//! embedded copy, so [`StatusSync::set_delivery_status`] never touches
//! the sub-item documents.

use std::collections::HashSet;

use async_trait::async_trait;
use surrealdb::{RecordId, Surreal, engine::local::Db};

use shared::{DeliveryStatus, ItemStatus};

use crate::db::repository::{InvoiceRepository, RepoError, RepoResult, SubItemRepository};

/// Seam between the invoice flow and the two status stores
#[async_trait]
pub trait StatusSync: Send + Sync {
    /// Update the sub-item documents and every embedded invoice copy;
    /// returns the number of sub-items touched
    async fn set_item_status(&self, ids: &[RecordId], status: ItemStatus) -> RepoResult<usize>;

    /// Update only the embedded copy on one invoice; returns the number
    /// of embedded lines touched
    async fn set_delivery_status(
        &self,
        invoice_id: &RecordId,
        ids: &[RecordId],
        status: DeliveryStatus,
    ) -> RepoResult<usize>;
}

#[derive(Clone)]
pub struct StatusSyncService {
    sub_items: SubItemRepository,
    invoices: InvoiceRepository,
}

impl StatusSyncService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            sub_items: SubItemRepository::new(db.clone()),
            invoices: InvoiceRepository::new(db),
        }
    }
}

#[async_trait]
impl StatusSync for StatusSyncService {
    async fn set_item_status(&self, ids: &[RecordId], status: ItemStatus) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let touched = self.sub_items.set_status(ids, status).await?;

        // Second pass: embedded copies on referencing invoices
        let id_set: HashSet<String> = ids.iter().map(|id| id.to_string()).collect();
        let invoices = self.invoices.find_referencing(ids).await?;
        for invoice in invoices {
            let rid = match invoice.id {
                Some(ref rid) => rid.clone(),
                None => continue,
            };
            let mut items = invoice.items;
            let mut changed = false;
            for item in &mut items {
                if id_set.contains(&item.sub_item.to_string()) && item.status != status {
                    item.status = status;
                    changed = true;
                }
            }
            if changed {
                self.invoices.set_items(&rid, items).await?;
            }
        }

        tracing::debug!(count = touched, ?status, "Sub-item statuses synchronized");
        Ok(touched)
    }

    async fn set_delivery_status(
        &self,
        invoice_id: &RecordId,
        ids: &[RecordId],
        status: DeliveryStatus,
    ) -> RepoResult<usize> {
        let invoice = self
            .invoices
            .find_by_id(&invoice_id.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {invoice_id} not found")))?;

        let id_set: HashSet<String> = ids.iter().map(|id| id.to_string()).collect();
        let mut items = invoice.items;
        let mut touched = 0;
        for item in &mut items {
            if id_set.contains(&item.sub_item.to_string()) {
                item.delivery_status = status;
                touched += 1;
            }
        }

        if touched > 0 {
            self.invoices.set_items(invoice_id, items).await?;
        }
        Ok(touched)
    }
}

/// Old-vs-new item id diff used by the invoice edit path: removed items
/// go back to `Available`, added items become `Rented`, unchanged items
/// are left alone.
pub fn diff_item_sets(
    old_ids: &[RecordId],
    new_ids: &[RecordId],
) -> (Vec<RecordId>, Vec<RecordId>) {
    let old_set: HashSet<String> = old_ids.iter().map(|id| id.to_string()).collect();
    let new_set: HashSet<String> = new_ids.iter().map(|id| id.to_string()).collect();

    let removed = old_ids
        .iter()
        .filter(|id| !new_set.contains(&id.to_string()))
        .cloned()
        .collect();
    let added = new_ids
        .iter()
        .filter(|id| !old_set.contains(&id.to_string()))
        .cloned()
        .collect();
    (removed, added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(key: &str) -> RecordId {
        RecordId::from_table_key("sub_item", key)
    }

    #[test]
    fn diff_classifies_removed_added_unchanged() {
        let old_ids = vec![rid("a"), rid("b")];
        let new_ids = vec![rid("b"), rid("c")];

        let (removed, added) = diff_item_sets(&old_ids, &new_ids);
        assert_eq!(removed, vec![rid("a")]);
        assert_eq!(added, vec![rid("c")]);
    }

    #[test]
    fn diff_of_identical_sets_is_empty() {
        let ids = vec![rid("a"), rid("b")];
        let (removed, added) = diff_item_sets(&ids, &ids);
        assert!(removed.is_empty());
        assert!(added.is_empty());
    }

    #[test]
    fn diff_handles_empty_sides() {
        let ids = vec![rid("a")];
        let (removed, added) = diff_item_sets(&[], &ids);
        assert!(removed.is_empty());
        assert_eq!(added, vec![rid("a")]);

        let (removed, added) = diff_item_sets(&ids, &[]);
        assert_eq!(removed, vec![rid("a")]);
        assert!(added.is_empty());
    }
}
