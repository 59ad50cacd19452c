//! Service Layer
//!
//! Business logic between the HTTP handlers and the repositories:
//!
//! - [`serial`] - sequential identifier generation
//! - [`availability`] - sub-item existence/double-booking validation
//! - [`status_sync`] - keeps sub-item and embedded invoice statuses in step
//! - [`invoice_flow`] - the save-and-reconcile orchestration
//! - [`money`] - decimal-precision money math
//! - [`entity`] - polymorphic customer/account resolution
//! - [`notify`] - injected operator notification sink

pub mod availability;
pub mod entity;
pub mod invoice_flow;
pub mod money;
pub mod notify;
pub mod serial;
pub mod status_sync;

pub use availability::AvailabilityService;
pub use invoice_flow::{BatchError, BatchOutcome, CreatedInvoice, Direction, InvoiceFlow};
pub use notify::{Notifier, TracingNotifier};
pub use serial::SerialService;
pub use status_sync::{StatusSync, StatusSyncService, diff_item_sets};
