//! Serial Number Generator
//!
//! Derives the next sequential identifier for invoices (`INV###`) and
//! financial records (`R###` / `P###` / `T###`) by scanning the
//! existing serials, parsing the trailing integer, and incrementing the
//! maximum. An empty collection starts at 1.
//!
//! Two concurrent creations can compute the same candidate; the
//! repositories detect the duplicate synchronously (plus a unique index
//! backstop) and fail with a conflict. There is deliberately no
//! retry-on-conflict loop and no atomic counter.

use surrealdb::{Surreal, engine::local::Db};

use crate::db::models::FinancialKind;
use crate::db::repository::{FinancialRepository, InvoiceRepository, RepoResult};
use crate::db::repository::invoice::INVOICE_PREFIX;

/// Parse the numeric suffix of a serial carrying the given prefix
pub fn parse_serial(prefix: &str, serial: &str) -> Option<u32> {
    serial.strip_prefix(prefix)?.parse().ok()
}

/// Format a serial: prefix + number zero-padded to three digits
pub fn format_serial(prefix: &str, n: u32) -> String {
    format!("{prefix}{n:03}")
}

/// Next serial in a sequence: highest parsed suffix + 1
pub fn next_serial<'a, I>(existing: I, prefix: &str) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let max = existing
        .into_iter()
        .filter_map(|s| parse_serial(prefix, s))
        .max()
        .unwrap_or(0);
    format_serial(prefix, max + 1)
}

/// Serial generator over the live collections
#[derive(Clone)]
pub struct SerialService {
    invoices: InvoiceRepository,
    financial: FinancialRepository,
}

impl SerialService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            invoices: InvoiceRepository::new(db.clone()),
            financial: FinancialRepository::new(db),
        }
    }

    /// Next invoice number (`INV001` when none exist yet)
    pub async fn next_invoice_number(&self) -> RepoResult<String> {
        let numbers = self.invoices.all_numbers().await?;
        Ok(next_serial(&numbers, INVOICE_PREFIX))
    }

    /// Next serial for a financial collection
    pub async fn next_financial_serial(&self, kind: FinancialKind) -> RepoResult<String> {
        let serials = self.financial.all_serials(kind).await?;
        Ok(next_serial(&serials, kind.serial_prefix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_matching_prefixes() {
        assert_eq!(parse_serial("INV", "INV004"), Some(4));
        assert_eq!(parse_serial("R", "R017"), Some(17));
        assert_eq!(parse_serial("INV", "R004"), None);
        assert_eq!(parse_serial("INV", "INVx"), None);
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_serial("INV", 1), "INV001");
        assert_eq!(format_serial("P", 42), "P042");
        // Width is a floor, not a ceiling
        assert_eq!(format_serial("R", 1234), "R1234");
    }

    #[test]
    fn empty_sequence_starts_at_one() {
        let existing: Vec<String> = Vec::new();
        assert_eq!(next_serial(&existing, "INV"), "INV001");
    }

    #[test]
    fn increments_the_numeric_maximum() {
        let existing = vec![
            "INV001".to_string(),
            "INV003".to_string(),
            "INV002".to_string(),
        ];
        assert_eq!(next_serial(&existing, "INV"), "INV004");
    }

    #[test]
    fn ignores_unparsable_serials() {
        let existing = vec!["INV002".to_string(), "legacy".to_string()];
        assert_eq!(next_serial(&existing, "INV"), "INV003");
    }
}
