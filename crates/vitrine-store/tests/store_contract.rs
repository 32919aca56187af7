// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;
use vitrine_model::Product;
use vitrine_store::{
    create_schema, distinct_categories, list_departments, migrate_departments, open_store,
    product_by_id, product_by_sku, product_count, quality_checks, replace_all_products,
};

fn memory_store() -> Connection {
    let conn = Connection::open_in_memory().expect("open memory db");
    create_schema(&conn).expect("schema");
    conn
}

fn product(id: i64, name: &str, department: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        cost: price / 2.0,
        retail_price: price,
        category: "Tools".to_string(),
        brand: "Acme".to_string(),
        department: department.to_string(),
        department_id: None,
        sku: format!("SKU{id}"),
        distribution_center_id: 1,
    }
}

#[test]
fn replace_inserts_and_round_trips_by_sku() {
    let mut conn = memory_store();
    let batch = vec![
        product(1, "Hammer", "Hardware", 9.0),
        product(2, "Saw", "Hardware", 19.0),
        product(3, "Apron", "Kitchen", 12.0),
    ];
    let report = replace_all_products(&mut conn, &batch).expect("replace");
    assert_eq!(report.inserted, 3);
    assert_eq!(report.chunks, 1);

    for p in &batch {
        let found = product_by_sku(&conn, &p.sku)
            .expect("lookup")
            .expect("present");
        assert_eq!(found.id, p.id);
        assert_eq!(found.name, p.name);
        assert_eq!(found.department, p.department);
    }
}

#[test]
fn replace_is_full_replace_not_accumulation() {
    let mut conn = memory_store();
    let batch = vec![product(1, "Hammer", "Hardware", 9.0)];
    replace_all_products(&mut conn, &batch).expect("first import");
    replace_all_products(&mut conn, &batch).expect("second import");
    assert_eq!(product_count(&conn).expect("count"), 1);
}

#[test]
fn empty_batch_does_not_clear_the_store() {
    let mut conn = memory_store();
    replace_all_products(&mut conn, &[product(1, "Hammer", "Hardware", 9.0)]).expect("seed");
    let report = replace_all_products(&mut conn, &[]).expect("empty replace");
    assert_eq!(report.inserted, 0);
    assert_eq!(product_count(&conn).expect("count"), 1);
}

#[test]
fn replace_chunks_large_batches() {
    let mut conn = memory_store();
    let batch: Vec<Product> = (1..=2500)
        .map(|id| product(id, &format!("Item {id}"), "Hardware", 5.0))
        .collect();
    let report = replace_all_products(&mut conn, &batch).expect("replace");
    assert_eq!(report.inserted, 2500);
    assert_eq!(report.chunks, 3);
    assert_eq!(product_count(&conn).expect("count"), 2500);
}

#[test]
fn replace_normalizes_departments_inline() {
    let mut conn = memory_store();
    let batch = vec![
        product(1, "Hammer", "Hardware", 9.0),
        product(2, "Saw", "Hardware", 19.0),
        product(3, "Apron", "Kitchen", 12.0),
    ];
    replace_all_products(&mut conn, &batch).expect("replace");

    let departments = list_departments(&conn).expect("departments");
    let names: Vec<&str> = departments.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Hardware", "Kitchen"]);

    let hammer = product_by_id(&conn, 1).expect("lookup").expect("present");
    let apron = product_by_id(&conn, 3).expect("lookup").expect("present");
    assert!(hammer.department_id.is_some());
    assert_ne!(hammer.department_id, apron.department_id);
}

#[test]
fn duplicate_sku_in_batch_fails_the_chunk() {
    let mut conn = memory_store();
    let mut batch = vec![product(1, "Hammer", "Hardware", 9.0)];
    let mut dup = product(2, "Saw", "Hardware", 19.0);
    dup.sku = "SKU1".to_string();
    batch.push(dup);
    assert!(replace_all_products(&mut conn, &batch).is_err());
}

#[test]
fn migration_is_idempotent_and_preserves_original_names() {
    let mut conn = memory_store();
    // Seed rows without department references, as an older importer would.
    conn.execute_batch(
        "
        INSERT INTO products (id, name, name_normalized, cost, retail_price,
                              category, category_normalized, brand, brand_normalized,
                              department, department_normalized, department_id,
                              sku, distribution_center_id)
        VALUES (1, 'Hammer', 'hammer', 4.5, 9.0, 'Tools', 'tools', 'Acme', 'acme',
                'Hardware', 'hardware', NULL, 'SKU1', 1),
               (2, 'Apron', 'apron', 6.0, 12.0, 'Textile', 'textile', 'Acme', 'acme',
                'Kitchen', 'kitchen', NULL, 'SKU2', 1),
               (3, 'Saw', 'saw', 9.5, 19.0, 'Tools', 'tools', 'Acme', 'acme',
                'Hardware', 'hardware', NULL, 'SKU3', 1);
        ",
    )
    .expect("seed");

    let first = migrate_departments(&mut conn, 2).expect("migrate");
    assert_eq!(first.departments, 2);
    assert_eq!(first.products_updated, 3);
    assert_eq!(first.batches, 2);

    let hammer = product_by_id(&conn, 1).expect("lookup").expect("present");
    assert_eq!(hammer.department, "Hardware");
    let hardware_id = hammer.department_id.expect("reference set");

    let second = migrate_departments(&mut conn, 1000).expect("re-run");
    assert_eq!(second.products_updated, 3);
    let hammer_again = product_by_id(&conn, 1).expect("lookup").expect("present");
    assert_eq!(hammer_again.department_id, Some(hardware_id));
    assert_eq!(list_departments(&conn).expect("departments").len(), 2);
}

#[test]
fn distinct_categories_sees_the_whole_collection() {
    let mut conn = memory_store();
    let mut batch = Vec::new();
    for id in 1..=30 {
        let mut p = product(id, &format!("Item {id}"), "Hardware", 5.0);
        p.category = format!("Category {}", id % 7);
        batch.push(p);
    }
    replace_all_products(&mut conn, &batch).expect("replace");
    assert_eq!(distinct_categories(&conn).expect("categories").len(), 7);
}

#[test]
fn missing_product_is_none_not_error() {
    let conn = memory_store();
    assert!(product_by_id(&conn, 999).expect("lookup").is_none());
}

#[test]
fn quality_checks_are_clean_after_import() {
    let mut conn = memory_store();
    replace_all_products(&mut conn, &[product(1, "Hammer", "Hardware", 9.0)]).expect("replace");
    let checks = quality_checks(&conn).expect("checks");
    assert_eq!(checks.zero_id, 0);
    assert_eq!(checks.empty_name, 0);
    assert_eq!(checks.empty_sku, 0);
}

#[test]
fn open_store_creates_a_reusable_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.db");
    {
        let mut conn = open_store(&path).expect("open");
        replace_all_products(&mut conn, &[product(1, "Hammer", "Hardware", 9.0)])
            .expect("replace");
    }
    let conn = open_store(&path).expect("reopen");
    assert_eq!(product_count(&conn).expect("count"), 1);
}
