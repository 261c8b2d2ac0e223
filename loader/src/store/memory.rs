//! In-memory [`PaysheetStore`] for loader tests.

use crate::error::{StoreError, StoreResult};
use crate::models::{PaysheetTxn, SourceTag};

use super::PaysheetStore;

/// A staged row as seen by the table: only the columns tests look at.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedRow {
    pub source: String,
    pub emplid: String,
    pub seq_no: i64,
    pub amount: f64,
    pub hours: f64,
}

impl StagedRow {
    pub fn foreign(source: &str, emplid: &str) -> Self {
        Self {
            source: source.to_string(),
            emplid: emplid.to_string(),
            seq_no: 0,
            amount: 0.0,
            hours: 0.0,
        }
    }
}

/// Committed table contents plus one pending transaction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub committed: Vec<StagedRow>,
    pending: Option<Vec<StagedRow>>,
    /// Fail the n-th insert (0-based) of the run.
    pub fail_insert_at: Option<usize>,
    inserts: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<StagedRow>) -> Self {
        Self { committed: rows, ..Default::default() }
    }

    fn working(&mut self) -> &mut Vec<StagedRow> {
        let committed = &self.committed;
        self.pending.get_or_insert_with(|| committed.clone())
    }
}

impl PaysheetStore for MemoryStore {
    fn purge(&mut self, source: SourceTag) -> StoreResult<u64> {
        let rows = self.working();
        let before = rows.len();
        rows.retain(|r| r.source != source.as_str());
        Ok((before - rows.len()) as u64)
    }

    fn insert(&mut self, txn: &PaysheetTxn) -> StoreResult<u64> {
        let n = self.inserts;
        self.inserts += 1;
        if self.fail_insert_at == Some(n) {
            return Err(StoreError::Other(format!("insert {} failed", n)));
        }

        let row = StagedRow {
            source: txn.source.as_str().to_string(),
            emplid: txn.emplid.clone(),
            seq_no: txn.seq_no,
            amount: txn.amount,
            hours: txn.hours,
        };
        self.working().push(row);
        Ok(1)
    }

    fn commit(&mut self) -> StoreResult<()> {
        if let Some(rows) = self.pending.take() {
            self.committed = rows;
        }
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.pending = None;
        self.rollbacks += 1;
        Ok(())
    }
}
