//! Sub Item Model

use serde::{Deserialize, Serialize};
use shared::ItemStatus;
use surrealdb::RecordId;

use super::serde_helpers;

/// Rentable inventory unit belonging to one master item
///
/// Delivery status is tracked on the invoice's embedded line item, not
/// here; this document only carries the rental status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Parent master item
    #[serde(with = "serde_helpers::record_id")]
    pub master: RecordId,
    pub name: String,
    /// Derived as `{masterCode}-{seq:03}` at creation, unique
    pub code: String,
    pub rent_rate: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: ItemStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create sub item payload (code is derived, not supplied)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubItemCreate {
    pub master: String,
    pub name: String,
    pub rent_rate: f64,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Update sub item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SubItemUpdate {
    pub name: Option<String>,
    pub rent_rate: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Option<ItemStatus>,
}
