//! Polymorphic entity resolution
//!
//! Financial records point at either a customer or an account through
//! the `entity_type`/`entity_id` pair. Each case is resolved through
//! its own repository lookup; there is no generic reference mechanism.

use surrealdb::{Surreal, engine::local::Db};

use shared::EntityRef;

use crate::db::repository::{AccountRepository, CustomerRepository, to_record_id};
use crate::utils::{AppError, AppResult};

/// Confirm the referenced entity exists, per case
pub async fn resolve_entity(db: &Surreal<Db>, entity: &EntityRef) -> AppResult<()> {
    match entity {
        EntityRef::Customer(id) => {
            let rid = to_record_id("customer", id);
            CustomerRepository::new(db.clone())
                .resolve(&rid)
                .await
                .map_err(AppError::from)?;
        }
        EntityRef::Account(id) => {
            let rid = to_record_id("account", id);
            AccountRepository::new(db.clone())
                .resolve(&rid)
                .await
                .map_err(AppError::from)?;
        }
    }
    Ok(())
}
