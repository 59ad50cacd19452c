//! Customer Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Customer entity
///
/// Deleted independently of invoices; historical invoices keep their
/// customer reference even after the customer document is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Unique shop-assigned code
    pub code: String,
    pub mobile: String,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub code: String,
    pub mobile: String,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
}

/// Update customer payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
}
