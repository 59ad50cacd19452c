//! Common types for the shared crate
//!
//! Status enums and value types stored in documents and exchanged over
//! the HTTP API. Serde renames pin the exact stored string values, so
//! changing a variant name here is a data migration.

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Rental state of a sub-item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ItemStatus {
    #[default]
    Available,
    Rented,
    Damaged,
    Maintenance,
}

/// Delivery state of an invoice line item
///
/// Tracked on the invoice's embedded copy only, never on the sub-item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Delivered,
    Overdue,
}

/// Invoice lifecycle state, independent of [`PaymentStatus`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum InvoiceStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

/// How much of an invoice has been paid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Completed,
}

/// Payment method for receipts, payments and transactions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    BankTransfer,
}

/// Direction of a financial record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

/// Account classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Income,
    Expense,
    Asset,
    Liability,
}

/// Polymorphic reference carried by financial records
///
/// Serializes as two sibling fields, `entity_type` + `entity_id`, so a
/// record reads `{"entity_type": "customer", "entity_id": "customer:x"}`.
/// Each case carries its own id and is resolved through an explicit
/// per-case lookup, not a generic reference mechanism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "entity_type", content = "entity_id", rename_all = "lowercase")]
pub enum EntityRef {
    Customer(String),
    Account(String),
}

impl EntityRef {
    /// The referenced id, regardless of case
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Customer(id) | EntityRef::Account(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EntityRef::Customer(_) => "customer",
            EntityRef::Account(_) => "account",
        }
    }
}

/// A single measurement snapshot on an invoice line item
///
/// Copied into the invoice at creation time; later edits to the
/// customer's measurements never change historical invoices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Measurement {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ref_serializes_as_sibling_fields() {
        let entity = EntityRef::Customer("customer:abc".to_string());
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["entity_type"], "customer");
        assert_eq!(json["entity_id"], "customer:abc");

        let back: EntityRef = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn payment_method_uses_snake_case_values() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"bank_transfer\"");
    }

    #[test]
    fn item_status_round_trips_stored_values() {
        for (status, value) in [
            (ItemStatus::Available, "\"Available\""),
            (ItemStatus::Rented, "\"Rented\""),
            (ItemStatus::Damaged, "\"Damaged\""),
            (ItemStatus::Maintenance, "\"Maintenance\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), value);
        }
    }
}
