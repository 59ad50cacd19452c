//! Database Module
//!
//! Embedded SurrealDB bootstrap: RocksDB storage at a configured path,
//! or the in-memory engine when the path is `:memory:` (tests, demos).

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

/// Namespace and database used by the server
const NAMESPACE: &str = "mandap";
const DATABASE: &str = "shop";

/// Sentinel path selecting the in-memory engine
pub const MEMORY_DB: &str = ":memory:";

/// Schema pass run at startup. Collections stay schemaless; the unique
/// indexes are the backstop behind the synchronous duplicate checks on
/// serials and codes.
const SCHEMA: &str = "
    DEFINE INDEX IF NOT EXISTS idx_customer_code ON TABLE customer COLUMNS code UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_master_item_code ON TABLE master_item COLUMNS code UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_sub_item_code ON TABLE sub_item COLUMNS code UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_invoice_number ON TABLE invoice COLUMNS invoice_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_receipt_serial ON TABLE receipt COLUMNS serial_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_payment_serial ON TABLE payment COLUMNS serial_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS idx_txn_serial ON TABLE txn COLUMNS serial_number UNIQUE;
";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database and apply the schema pass
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = if db_path == MEMORY_DB {
            Surreal::new::<Mem>(())
                .await
                .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?
        } else {
            Surreal::new::<RocksDb>(db_path)
                .await
                .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?
        };

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema statement failed: {e}")))?;

        tracing::info!(path = %db_path, "Database ready");
        Ok(Self { db })
    }
}
