// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! The Vitrine import pipeline.
//!
//! Reads a delimited product file, applies per-row validation and
//! normalization, and hands the surviving batch to the record store with
//! full-replace semantics. A malformed row never aborts the import; a store
//! failure aborts the remaining pipeline and surfaces as [`ImportError`].

mod logging;
mod rows;

use rows::{process_row, RawRow, RowOutcome};
use rusqlite::Connection;
use std::collections::{BTreeMap, HashSet};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use tracing::{info, warn};
use vitrine_model::Product;

pub use logging::{ImportEvent, ImportLog, ImportStage};

pub const CRATE_NAME: &str = "vitrine-ingest";

#[derive(Debug)]
pub struct ImportError(pub String);

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ImportError {}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub csv_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub chunks: usize,
    pub header_rows: usize,
    pub missing_field_rows: usize,
    pub unrecoverable_rows: usize,
    pub duplicate_rows: usize,
    pub malformed_rows: usize,
    pub events: Vec<ImportEvent>,
}

impl ImportResult {
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.header_rows
            + self.missing_field_rows
            + self.unrecoverable_rows
            + self.duplicate_rows
            + self.malformed_rows
    }
}

/// Runs the pipeline end to end against an injected store connection.
///
/// An input that yields zero valid rows leaves the store untouched.
pub fn run_import(conn: &mut Connection, opts: &ImportOptions) -> Result<ImportResult, ImportError> {
    let mut log = ImportLog::default();
    log.emit(
        ImportStage::Prepare,
        "import.start",
        BTreeMap::from([(
            "path".to_string(),
            opts.csv_path.display().to_string(),
        )]),
    );

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&opts.csv_path)
        .map_err(|e| ImportError(format!("open {}: {e}", opts.csv_path.display())))?;

    log.emit(ImportStage::Parse, "import.parse.begin", BTreeMap::new());

    let mut batch: Vec<Product> = Vec::new();
    let mut seen_ids: HashSet<i64> = HashSet::new();
    let mut seen_skus: HashSet<String> = HashSet::new();
    let mut header_rows = 0_usize;
    let mut missing_field_rows = 0_usize;
    let mut unrecoverable_rows = 0_usize;
    let mut duplicate_rows = 0_usize;
    let mut malformed_rows = 0_usize;

    for (index, record) in reader.deserialize::<RawRow>().enumerate() {
        let row_number = index + 1;
        let raw = match record {
            Ok(raw) => raw,
            Err(e) => {
                warn!(row = row_number, error = %e, "skipping malformed row");
                malformed_rows += 1;
                continue;
            }
        };
        match process_row(&raw) {
            RowOutcome::Valid(product) => {
                if !seen_ids.insert(product.id) {
                    warn!(row = row_number, id = product.id, "skipping duplicate id");
                    duplicate_rows += 1;
                    continue;
                }
                if !seen_skus.insert(product.sku.clone()) {
                    warn!(row = row_number, sku = %product.sku, "skipping duplicate sku");
                    duplicate_rows += 1;
                    continue;
                }
                batch.push(product);
            }
            RowOutcome::HeaderRow => {
                header_rows += 1;
            }
            RowOutcome::MissingField(field) => {
                warn!(row = row_number, field, "skipping row with missing required field");
                missing_field_rows += 1;
            }
            RowOutcome::Unrecoverable(field) => {
                warn!(row = row_number, field, "discarding unrecoverable row");
                unrecoverable_rows += 1;
            }
        }
    }

    log.emit(
        ImportStage::Parse,
        "import.parse.complete",
        BTreeMap::from([
            ("valid".to_string(), batch.len().to_string()),
            ("missing_field".to_string(), missing_field_rows.to_string()),
            ("unrecoverable".to_string(), unrecoverable_rows.to_string()),
            ("duplicate".to_string(), duplicate_rows.to_string()),
            ("malformed".to_string(), malformed_rows.to_string()),
        ]),
    );

    if batch.is_empty() {
        warn!("no valid rows in input; store left untouched");
        log.emit(ImportStage::Finalize, "import.empty", BTreeMap::new());
        return Ok(ImportResult {
            imported: 0,
            chunks: 0,
            header_rows,
            missing_field_rows,
            unrecoverable_rows,
            duplicate_rows,
            malformed_rows,
            events: log.into_events(),
        });
    }

    log.emit(ImportStage::Persist, "import.persist.begin", BTreeMap::new());
    let report = vitrine_store::replace_all_products(conn, &batch)
        .map_err(|e| ImportError(format!("bulk replace failed: {e}")))?;
    info!(imported = report.inserted, chunks = report.chunks, "import complete");
    log.emit(
        ImportStage::Finalize,
        "import.persist.complete",
        BTreeMap::from([
            ("inserted".to_string(), report.inserted.to_string()),
            ("chunks".to_string(), report.chunks.to_string()),
        ]),
    );

    Ok(ImportResult {
        imported: report.inserted,
        chunks: report.chunks,
        header_rows,
        missing_field_rows,
        unrecoverable_rows,
        duplicate_rows,
        malformed_rows,
        events: log.into_events(),
    })
}
