//! Server configuration
//!
//! Every setting can be overridden through the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/mandap | Working directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DB_PATH | {WORK_DIR}/database/shop.db | Database path, `:memory:` for the in-memory engine |
//! | LOG_DIR | unset | Rolling log file directory (console only when unset) |
//! | LOG_LEVEL | info | Log level when RUST_LOG is unset |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | ALLOW_DOUBLE_BOOKING | true | Accept already-rented items on new invoices |

use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Database path; `:memory:` selects the in-memory engine
    pub db_path: String,
    /// Rolling log directory, console-only when None
    pub log_dir: Option<String>,
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// development | staging | production
    pub environment: String,
    /// Policy switch: accept sub-items already marked `Rented` on a new
    /// invoice. On by default, mirroring how the shop actually books.
    pub allow_double_booking: bool,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/mandap".into());
        let default_db_path = PathBuf::from(&work_dir)
            .join("database")
            .join("shop.db")
            .to_string_lossy()
            .into_owned();

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            db_path: std::env::var("DB_PATH").unwrap_or(default_db_path),
            log_dir: std::env::var("LOG_DIR").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            allow_double_booking: std::env::var("ALLOW_DOUBLE_BOOKING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            work_dir,
        }
    }

    /// In-memory configuration used by tests and demos
    pub fn in_memory() -> Self {
        let mut config = Self::from_env();
        config.db_path = crate::db::MEMORY_DB.to_string();
        config
    }

    /// Ensure the working directory structure exists (skipped for the
    /// in-memory engine)
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        if self.db_path == crate::db::MEMORY_DB {
            return Ok(());
        }
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("database"))?;
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
