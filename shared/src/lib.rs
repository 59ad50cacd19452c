//! Shared types for the Mandap rental platform
//!
//! Wire-level enums and value types used by the server and by any
//! client that talks to it: item/delivery/payment statuses, payment
//! methods, the polymorphic entity reference carried by financial
//! records, and measurement snapshots embedded in invoices.

pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
pub use types::{
    AccountType, DeliveryStatus, EntityRef, InvoiceStatus, ItemStatus, Measurement, PaymentMethod,
    PaymentStatus, Timestamp, TransactionType,
};
