//! Database Models

// Serde helpers
pub mod serde_helpers;

// People and accounts
pub mod account;
pub mod customer;

// Inventory
pub mod master_item;
pub mod sub_item;

// Billing
pub mod financial;
pub mod invoice;

// Re-exports
pub use account::{Account, AccountCreate, AccountUpdate};
pub use customer::{Customer, CustomerCreate, CustomerUpdate};
pub use financial::{FinancialCreate, FinancialKind, FinancialRecord};
pub use invoice::{
    Invoice, InvoiceDraft, InvoiceItem, InvoiceItemInput, InvoiceUpdate, ReceiptInput,
};
pub use master_item::{MasterItem, MasterItemCreate, MasterItemUpdate};
pub use sub_item::{SubItem, SubItemCreate, SubItemUpdate};
