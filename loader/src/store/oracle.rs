//! Oracle-backed [`PaysheetStore`].

use ::oracle::sql_type::ToSql;
use ::oracle::{Connection, Connector};
use chrono::NaiveDate;

use crate::config::{ConnectionDescriptor, Privilege};
use crate::error::StoreResult;
use crate::models::{ColumnValue, PaysheetTxn, SourceTag};

use super::{PaysheetStore, INSERT_SQL, PURGE_SQL};

/// Typed NULL for date columns.
static NULL_DATE: Option<NaiveDate> = None;

/// One connection to the PeopleSoft HR database.
///
/// The driver does not autocommit; purge and inserts stay pending until
/// [`PaysheetStore::commit`].
pub struct OracleStore {
    conn: Connection,
}

impl OracleStore {
    pub fn connect(descriptor: &ConnectionDescriptor) -> StoreResult<Self> {
        let mut connector = Connector::new(
            descriptor.user.as_str(),
            descriptor.password.as_str(),
            descriptor.connect_string(),
        );
        if descriptor.privilege == Privilege::Sysdba {
            connector.privilege(::oracle::Privilege::Sysdba);
        }

        tracing::info!(
            host = %descriptor.host,
            port = descriptor.port,
            user = %descriptor.user,
            "connecting"
        );
        let conn = connector.connect()?;
        Ok(Self { conn })
    }
}

fn bind(value: &ColumnValue) -> &dyn ToSql {
    match value {
        ColumnValue::Text(s) => s,
        ColumnValue::Int(i) => i,
        ColumnValue::Float(f) => f,
        ColumnValue::Date(d) => d,
        ColumnValue::Timestamp(ts) => ts,
        ColumnValue::NullDate => &NULL_DATE,
    }
}

impl PaysheetStore for OracleStore {
    fn purge(&mut self, source: SourceTag) -> StoreResult<u64> {
        let tag = source.as_str().to_string();
        let stmt = self.conn.execute_named(PURGE_SQL.as_str(), &[("pu_source", &tag)])?;
        let deleted = stmt.row_count()?;
        tracing::info!(source = %source, deleted, "purged staged rows");
        Ok(deleted)
    }

    fn insert(&mut self, txn: &PaysheetTxn) -> StoreResult<u64> {
        let values = txn.values();
        let params: Vec<(&str, &dyn ToSql)> = values
            .iter()
            .map(|(name, value)| (*name, bind(value)))
            .collect();

        let stmt = self.conn.execute_named(INSERT_SQL.as_str(), &params)?;
        let inserted = stmt.row_count()?;
        tracing::debug!(
            emplid = %txn.emplid,
            seqno = txn.seq_no,
            inserted,
            "inserted paysheet row"
        );
        Ok(inserted)
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.conn.commit()?;
        tracing::info!("committed");
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.conn.rollback()?;
        tracing::info!("rolled back");
        Ok(())
    }
}
