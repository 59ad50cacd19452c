//! Server state
//!
//! [`ServerState`] holds the shared handles every request needs: the
//! embedded database plus the service singletons built over it. Cloning
//! is cheap (Arc/handle copies).

use std::sync::Arc;

use surrealdb::{Surreal, engine::local::Db};

use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    AvailabilityService, InvoiceFlow, Notifier, SerialService, StatusSync, StatusSyncService,
    TracingNotifier,
};

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    pub serials: SerialService,
    pub availability: AvailabilityService,
    pub status_sync: Arc<dyn StatusSync>,
    pub notifier: Arc<dyn Notifier>,
    pub invoice_flow: Arc<InvoiceFlow>,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// # Panics
    ///
    /// Panics when the working directory or database cannot be opened;
    /// there is nothing useful to serve without them.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(&config.db_path)
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        Self::with_parts(config.clone(), db, notifier)
    }

    /// Assemble state from pre-built parts (tests swap in doubles here)
    pub fn with_parts(config: Config, db: Surreal<Db>, notifier: Arc<dyn Notifier>) -> Self {
        let serials = SerialService::new(db.clone());
        let availability = AvailabilityService::new(db.clone(), config.allow_double_booking);
        let status_sync: Arc<dyn StatusSync> = Arc::new(StatusSyncService::new(db.clone()));
        let invoice_flow = Arc::new(InvoiceFlow::new(
            db.clone(),
            availability.clone(),
            status_sync.clone(),
            notifier.clone(),
        ));

        Self {
            config,
            db,
            serials,
            availability,
            status_sync,
            notifier,
            invoice_flow,
        }
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
