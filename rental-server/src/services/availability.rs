//! Item Availability Validator
//!
//! Confirms every sub-item referenced by a draft invoice exists before
//! anything is written. Items already marked `Rented` are accepted by
//! default: double-booking is a policy choice, controlled by
//! configuration rather than hard-coded either way.

use surrealdb::{RecordId, Surreal, engine::local::Db};

use shared::ItemStatus;

use crate::db::models::SubItem;
use crate::db::repository::SubItemRepository;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct AvailabilityService {
    sub_items: SubItemRepository,
    /// When false, sub-items already `Rented` are rejected
    allow_double_booking: bool,
}

impl AvailabilityService {
    pub fn new(db: Surreal<Db>, allow_double_booking: bool) -> Self {
        Self {
            sub_items: SubItemRepository::new(db),
            allow_double_booking,
        }
    }

    /// Resolve every referenced sub-item, applying the double-booking
    /// policy to all of them (create path)
    pub async fn ensure_available(&self, ids: &[RecordId]) -> AppResult<Vec<SubItem>> {
        let items = self.ensure_exists(ids).await?;
        self.assert_not_rented(&items)?;
        Ok(items)
    }

    /// Resolve every referenced sub-item, in the order requested
    ///
    /// Fails with NotFound if fewer items resolve than were asked for,
    /// naming the missing ids.
    pub async fn ensure_exists(&self, ids: &[RecordId]) -> AppResult<Vec<SubItem>> {
        let found = self.sub_items.find_by_ids(ids).await?;

        if found.len() < ids.len() {
            let missing: Vec<String> = ids
                .iter()
                .filter(|id| !found.iter().any(|item| item.id.as_ref() == Some(id)))
                .map(|id| id.to_string())
                .collect();
            return Err(AppError::not_found(format!(
                "Sub-items not found: {}",
                missing.join(", ")
            )));
        }

        // Preserve the caller's ordering; the store returns set order
        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(item) = found.iter().find(|item| item.id.as_ref() == Some(id)) {
                ordered.push(item.clone());
            }
        }
        Ok(ordered)
    }

    /// Reject `Rented` items when double-booking is disallowed; no-op
    /// under the default policy. The edit path applies this to added
    /// items only, so an invoice keeping its own rented items never
    /// trips over them.
    pub fn assert_not_rented(&self, items: &[SubItem]) -> AppResult<()> {
        if self.allow_double_booking {
            return Ok(());
        }
        let rented: Vec<&str> = items
            .iter()
            .filter(|item| item.status == ItemStatus::Rented)
            .map(|item| item.code.as_str())
            .collect();
        if !rented.is_empty() {
            return Err(AppError::business_rule(format!(
                "Sub-items already rented: {}",
                rented.join(", ")
            )));
        }
        Ok(())
    }
}
