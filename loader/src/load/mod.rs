//! Load run: warn the operator, then purge, insert and commit.
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────┐   ┌────────────┐   ┌────────┐
//! │  Batch   │──▶│ warn + delay │──▶│ purge │──▶│ insert all │──▶│ commit │
//! └──────────┘   └──────────────┘   └───────┘   └────────────┘   └────────┘
//! ```
//!
//! Purge and inserts share one transaction. If any of them fails the
//! transaction is rolled back, so the previously staged rows are untouched.

use std::path::Path;
use std::time::Duration;

use crate::error::{LoadResult, StoreError};
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::store::{PaysheetStore, STAGING_TABLE};
use crate::transform::Batch;

/// Operator abort window before the destructive delete.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);

/// Outcome of a committed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub purged: u64,
    pub inserted: u64,
    pub skipped: usize,
}

/// Human-readable description of what the run is about to do.
pub fn confirmation_message(batch: &Batch, csv_path: &Path, wait: Duration) -> String {
    let ctx = &batch.context;
    format!(
        "In {wait} seconds the {table} rows with a source of '{source}' will be deleted. \
         Then {count} records from {file} will be inserted with an earns_begin date of {begin} \
         and an earns_end date of {end} for pay group {paygroup} in {company}.",
        wait = wait.as_secs(),
        table = STAGING_TABLE,
        source = ctx.source,
        count = batch.len(),
        file = csv_path.display(),
        begin = ctx.period.begin().format("%Y-%m-%d"),
        end = ctx.period.end().format("%Y-%m-%d"),
        paygroup = ctx.paygroup,
        company = ctx.company,
    )
}

/// Print the confirmation and block for `wait`.
pub fn warn_and_wait(message: &str, wait: Duration) {
    log_warning("Warning:");
    log_warning(message);
    if !wait.is_zero() {
        log_info("Press Ctrl-C now to abort.");
        std::thread::sleep(wait);
    }
}

/// Purge the batch's source, insert every record, commit.
pub fn run<S: PaysheetStore>(store: &mut S, batch: &Batch) -> LoadResult<LoadReport> {
    let source = batch.context.source;

    log_info(format!("🗑️  Removing '{}' rows from {}...", source, STAGING_TABLE));
    let purged = match store.purge(source) {
        Ok(n) => n,
        Err(e) => return Err(abort(store, e).into()),
    };
    log_success(format!("Removed {} rows", purged));

    log_info(format!("📥 Inserting {} records...", batch.len()));
    let mut inserted = 0;
    for row in &batch.rows {
        match store.insert(&row.txn) {
            Ok(1) => inserted += 1,
            Ok(n) => {
                log_warning(format!("Line {}: insert affected {} rows", row.line, n));
                inserted += n;
            }
            Err(e) => {
                log_error(format!(
                    "Line {} ({} seq {}): {}",
                    row.line, row.txn.emplid, row.txn.seq_no, e
                ));
                return Err(abort(store, e).into());
            }
        }
    }

    store.commit()?;
    log_success(format!("Committed {} rows", inserted));

    Ok(LoadReport {
        purged,
        inserted,
        skipped: batch.skipped.len(),
    })
}

/// Roll back after a failure, keeping the original error.
fn abort<S: PaysheetStore>(store: &mut S, err: StoreError) -> StoreError {
    if let Err(rollback_err) = store.rollback() {
        log_error(format!("Rollback failed: {}", rollback_err));
    } else {
        log_warning("Rolled back; staged rows unchanged");
    }
    err
}
