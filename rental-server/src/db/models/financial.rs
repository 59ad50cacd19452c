//! Financial Record Model
//!
//! Receipts, payments and ledger transactions share one document shape
//! stored in three separate collections. The collections stay split so
//! each keeps its own serial sequence (`R###`, `P###`, `T###`).

use serde::{Deserialize, Serialize};
use shared::{EntityRef, PaymentMethod, TransactionType};
use surrealdb::RecordId;

use super::serde_helpers;

/// Which collection a financial record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialKind {
    Receipt,
    Payment,
    Transaction,
}

impl FinancialKind {
    /// Collection name (`txn` avoids the TRANSACTION keyword in queries)
    pub fn table(&self) -> &'static str {
        match self {
            FinancialKind::Receipt => "receipt",
            FinancialKind::Payment => "payment",
            FinancialKind::Transaction => "txn",
        }
    }

    /// Serial number prefix for this collection
    pub fn serial_prefix(&self) -> &'static str {
        match self {
            FinancialKind::Receipt => "R",
            FinancialKind::Payment => "P",
            FinancialKind::Transaction => "T",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FinancialKind::Receipt => "receipt",
            FinancialKind::Payment => "payment",
            FinancialKind::Transaction => "transaction",
        }
    }
}

/// Financial record entity
///
/// Never updated in place; deleted only by the bulk-delete path used to
/// roll back a failed invoice save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Polymorphic customer/account reference (`entity_type` + `entity_id`)
    #[serde(flatten)]
    pub entity: EntityRef,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub related_invoice: Option<RecordId>,
    pub transaction_type: TransactionType,
    /// Generated unique serial, `R###` / `P###` / `T###`
    pub serial_number: String,
    pub amount: f64,
    pub method: PaymentMethod,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    pub note: Option<String>,
    /// Page the record was created from, kept for bookkeeping screens
    pub source_page: Option<String>,
    pub created_at: i64,
}

/// Create financial record payload (batch endpoints take a list)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialCreate {
    #[serde(flatten)]
    pub entity: EntityRef,
    pub related_invoice: Option<String>,
    #[serde(default)]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub method: PaymentMethod,
    pub date: Option<String>,
    pub note: Option<String>,
    pub source_page: Option<String>,
}
