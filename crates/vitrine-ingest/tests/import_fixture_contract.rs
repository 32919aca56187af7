// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;
use std::io::Write;
use vitrine_ingest::{run_import, ImportOptions, ImportStage};
use vitrine_store::{create_schema, product_by_id, product_by_sku, product_count};

fn fixture(contents: &str) -> (tempfile::TempDir, ImportOptions) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("products.csv");
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(contents.as_bytes()).expect("write fixture");
    (dir, ImportOptions { csv_path: path })
}

fn memory_store() -> Connection {
    let conn = Connection::open_in_memory().expect("open memory db");
    create_schema(&conn).expect("schema");
    conn
}

const HEADER: &str = "id,cost,category,name,brand,retail_price,department,sku,distribution_center_id\n";

#[test]
fn import_round_trips_every_valid_row_by_sku() {
    let (_dir, opts) = fixture(&format!(
        "{HEADER}5,2,Tools,Widget,Acme,4,Hardware,SKU5,1\n6,3,Tools,Gadget,Acme,7,Hardware,SKU6,2\n"
    ));
    let mut conn = memory_store();
    let result = run_import(&mut conn, &opts).expect("import");
    assert_eq!(result.imported, 2);
    assert_eq!(result.skipped(), 0);

    let widget = product_by_sku(&conn, "SKU5")
        .expect("lookup")
        .expect("present");
    assert_eq!(widget.id, 5);
    assert_eq!(widget.name, "Widget");
    assert_eq!(widget.category, "Tools");
    assert_eq!(widget.retail_price, 4.0);

    assert!(product_by_sku(&conn, "SKU6").expect("lookup").is_some());
}

#[test]
fn reimporting_the_same_file_does_not_accumulate() {
    let (_dir, opts) = fixture(&format!("{HEADER}5,2,Tools,Widget,Acme,4,Hardware,SKU5,1\n"));
    let mut conn = memory_store();
    run_import(&mut conn, &opts).expect("first import");
    run_import(&mut conn, &opts).expect("second import");
    assert_eq!(product_count(&conn).expect("count"), 1);
}

#[test]
fn row_missing_sku_is_skipped_and_absent_from_store() {
    let (_dir, opts) = fixture(&format!(
        "{HEADER}5,2,Tools,Widget,Acme,4,Hardware,SKU5,1\n7,2,Tools,Anvil,Acme,4,Hardware,,1\n"
    ));
    let mut conn = memory_store();
    let result = run_import(&mut conn, &opts).expect("import");
    assert_eq!(result.imported, 1);
    assert_eq!(result.missing_field_rows, 1);
    assert!(product_by_id(&conn, 7).expect("lookup").is_none());
    assert_eq!(product_count(&conn).expect("count"), 1);
}

#[test]
fn duplicate_embedded_header_rows_are_dropped() {
    let (_dir, opts) = fixture(&format!(
        "{HEADER}5,2,Tools,Widget,Acme,4,Hardware,SKU5,1\n{}",
        "id,cost,category,name,brand,retail_price,department,sku,distribution_center_id\n"
    ));
    let mut conn = memory_store();
    let result = run_import(&mut conn, &opts).expect("import");
    assert_eq!(result.imported, 1);
    assert_eq!(result.header_rows, 1);
}

#[test]
fn import_emits_stage_events_in_order() {
    let (_dir, opts) = fixture(&format!("{HEADER}5,2,Tools,Widget,Acme,4,Hardware,SKU5,1\n"));
    let mut conn = memory_store();
    let result = run_import(&mut conn, &opts).expect("import");
    let stages: Vec<&ImportStage> = result.events.iter().map(|e| &e.stage).collect();
    assert_eq!(stages.first(), Some(&&ImportStage::Prepare));
    assert_eq!(stages.last(), Some(&&ImportStage::Finalize));
    assert!(result
        .events
        .iter()
        .any(|e| e.name == "import.persist.complete"));
}
