//! Mandap Rental Server - wedding-rental shop management backend
//!
//! # Overview
//!
//! A single-process HTTP/JSON server over an embedded document
//! database:
//!
//! - **Customers & accounts** (`api/customers`, `api/accounts`)
//! - **Inventory** (`api/master_items`, `api/sub_items`): master items
//!   with rentable sub-items, codes derived per master
//! - **Invoices** (`api/invoices`): itemized measurement snapshots,
//!   sequential `INV###` numbers, the save-and-reconcile flow
//! - **Accounting** (`api/financial`): receipts, payments and ledger
//!   transactions with generated serials
//!
//! # Module structure
//!
//! ```text
//! rental-server/src/
//! ├── core/        # configuration, state, server lifecycle
//! ├── api/         # HTTP routes and handlers
//! ├── services/    # serials, availability, status sync, invoice flow
//! ├── db/          # embedded database, models, repositories
//! └── utils/       # errors, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::logger::{init_logger, init_logger_with_file};
pub use crate::utils::{AppError, AppResult};

/// Prepare the process environment: dotenv and logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___                __
   /  |/  /___ _____  ____/ /___ _____
  / /|_/ / __ `/ __ \/ __  / __ `/ __ \
 / /  / / /_/ / / / / /_/ / /_/ / /_/ /
/_/  /_/\__,_/_/ /_/\__,_/\__,_/ .___/
                              /_/
    "#
    );
}
