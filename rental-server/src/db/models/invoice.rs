//! Invoice Model
//!
//! Invoices own their embedded line items as snapshots: measurements
//! and rent rate are copied at creation time and never change when the
//! sub-item is edited later. The `status`/`delivery_status` fields on
//! the embedded copy are the one exception, kept in step with the
//! sub-item documents by the status synchronizer.

use serde::{Deserialize, Serialize};
use shared::{DeliveryStatus, InvoiceStatus, ItemStatus, Measurement, PaymentMethod, PaymentStatus};
use surrealdb::RecordId;

use super::serde_helpers;

/// Embedded invoice line item snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(with = "serde_helpers::record_id")]
    pub sub_item: RecordId,
    /// Name copy taken at creation time
    pub name: Option<String>,
    /// Category copy taken at creation time
    pub category: Option<String>,
    /// Rate-at-time-of-sale copy
    pub rent_rate: f64,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    pub status: ItemStatus,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
}

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Unique sequential number, `INV###`
    pub invoice_number: String,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    pub items: Vec<InvoiceItem>,
    pub total_amount: f64,
    pub delivery_date: Option<String>,
    pub wedding_date: Option<String>,
    pub status: InvoiceStatus,
    pub payment_status: PaymentStatus,
    /// Sum of receipts taken at creation time
    pub advance_amount: f64,
    /// Always `total_amount - advance_amount`
    pub balance_amount: f64,
    /// Receipt references created by the save flow
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub receipts: Vec<RecordId>,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// One line item in a draft invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    pub sub_item: String,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Overrides the sub-item's current rate when present
    pub rent_rate: Option<f64>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

/// One receipt proposed alongside a draft invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptInput {
    pub amount: f64,
    pub method: PaymentMethod,
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Create invoice payload
///
/// `invoice_number` is normally omitted and derived server-side; a
/// client that already displayed a number may send it back, in which
/// case a duplicate is rejected rather than renumbered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub invoice_number: Option<String>,
    pub customer: String,
    pub items: Vec<InvoiceItemInput>,
    /// Overrides the computed sum of line rates when present
    pub total_amount: Option<f64>,
    pub delivery_date: Option<String>,
    pub wedding_date: Option<String>,
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub receipts: Vec<ReceiptInput>,
}

/// Update invoice payload (edit path)
///
/// Receipts are managed as separate actions in edit mode and are
/// deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InvoiceUpdate {
    pub items: Option<Vec<InvoiceItemInput>>,
    pub total_amount: Option<f64>,
    pub delivery_date: Option<String>,
    pub wedding_date: Option<String>,
    pub status: Option<InvoiceStatus>,
}
