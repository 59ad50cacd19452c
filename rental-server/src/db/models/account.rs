//! Account Model

use serde::{Deserialize, Serialize};
use shared::AccountType;
use surrealdb::RecordId;

use super::serde_helpers;

/// Accounting ledger account
///
/// Referenced by financial records the same way customers are, through
/// the polymorphic `entity_type`/`entity_id` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub category: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create account payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub name: String,
    pub account_type: AccountType,
    /// Opening balance, defaults to zero
    pub balance: Option<f64>,
    pub category: Option<String>,
}

/// Update account payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub balance: Option<f64>,
    pub category: Option<String>,
}
