//! Staging table access.
//!
//! [`PaysheetStore`] is what the loader needs from the database: purge the
//! rows of one source, insert one record, and end the transaction. All calls
//! of a run share one transaction, so nothing is visible to the payroll
//! system until [`PaysheetStore::commit`].

use once_cell::sync::Lazy;

use crate::error::StoreResult;
use crate::models::paysheet::all_columns;
use crate::models::{PaysheetTxn, SourceTag};

pub mod oracle;

#[cfg(test)]
pub(crate) mod memory;

pub use self::oracle::OracleStore;

/// Paysheet transaction staging table.
pub const STAGING_TABLE: &str = "sysadm.PS_PSHUP_TXN";

/// Named-parameter insert covering every staging column.
pub static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let columns: Vec<&str> = all_columns().collect();
    let params: Vec<String> = columns.iter().map(|c| format!(":{}", c)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        STAGING_TABLE,
        columns.join(", "),
        params.join(", ")
    )
});

/// Delete every staged row of one source.
pub static PURGE_SQL: Lazy<String> =
    Lazy::new(|| format!("DELETE FROM {} WHERE pu_source = :pu_source", STAGING_TABLE));

/// Transactional access to the staging table.
pub trait PaysheetStore {
    /// Delete all rows tagged `source`; returns the number deleted.
    fn purge(&mut self, source: SourceTag) -> StoreResult<u64>;

    /// Insert one record; returns the affected row count (1 on success).
    fn insert(&mut self, txn: &PaysheetTxn) -> StoreResult<u64>;

    fn commit(&mut self) -> StoreResult<()>;

    fn rollback(&mut self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_shape() {
        let sql = INSERT_SQL.as_str();
        assert!(sql.starts_with("INSERT INTO sysadm.PS_PSHUP_TXN (pu_source, creation_dt,"));
        assert!(sql.contains("VALUES (:pu_source, :creation_dt,"));
        assert!(sql.ends_with(":oprid)"));
        assert_eq!(sql.matches(':').count(), 83);
    }

    #[test]
    fn test_purge_sql_binds_source() {
        assert_eq!(
            PURGE_SQL.as_str(),
            "DELETE FROM sysadm.PS_PSHUP_TXN WHERE pu_source = :pu_source"
        );
    }
}
