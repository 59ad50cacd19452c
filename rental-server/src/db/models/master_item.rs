//! Master Item Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Master inventory item, parent of rentable sub-items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Code prefix for sub-item codes (`{code}-001`, `{code}-002`, ...)
    pub code: String,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create master item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterItemCreate {
    pub name: String,
    pub code: String,
    pub image: Option<String>,
}

/// Update master item payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MasterItemUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub image: Option<String>,
}
