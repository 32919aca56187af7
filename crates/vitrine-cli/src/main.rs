// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vitrine_ingest::{run_import, ImportOptions};
use vitrine_query::{explain_query_plan, ProductFilter, ProductQueryRequest, QueryLimits};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Vitrine catalog operations CLI")]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a product CSV into the store, replacing its contents.
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        db: PathBuf,
    },
    /// Backfill department references for stores loaded before the
    /// departments table existed. Safe to re-run.
    MigrateDepartments {
        #[arg(long)]
        db: PathBuf,
        #[arg(long, default_value_t = 1000)]
        batch_size: usize,
    },
    InspectDb {
        #[arg(long)]
        db: PathBuf,
        #[arg(long, default_value_t = 5)]
        sample_rows: usize,
    },
    ExplainQuery {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    match run(cli) {
        Ok(()) => ProcessExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ProcessExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Import { csv, db } => import(csv, db, cli.json),
        Commands::MigrateDepartments { db, batch_size } => {
            migrate_departments(db, batch_size, cli.json)
        }
        Commands::InspectDb { db, sample_rows } => inspect_db(db, sample_rows, cli.json),
        Commands::ExplainQuery {
            db,
            category,
            brand,
            department,
            keyword,
            min_price,
            max_price,
            limit,
        } => explain_query(
            db,
            ProductFilter {
                category,
                brand,
                department,
                keyword,
                min_price,
                max_price,
            },
            limit,
        ),
    }
}

fn import(csv: PathBuf, db: PathBuf, machine_json: bool) -> Result<(), String> {
    let mut conn = vitrine_store::open_store(&db).map_err(|e| e.to_string())?;
    let result = run_import(&mut conn, &ImportOptions { csv_path: csv }).map_err(|e| e.to_string())?;

    if machine_json {
        let payload = json!({
            "imported": result.imported,
            "chunks": result.chunks,
            "skipped": result.skipped(),
            "header_rows": result.header_rows,
            "missing_field_rows": result.missing_field_rows,
            "unrecoverable_rows": result.unrecoverable_rows,
            "duplicate_rows": result.duplicate_rows,
            "malformed_rows": result.malformed_rows,
            "events": result.events,
        });
        println!("{}", serde_json::to_string(&payload).map_err(|e| e.to_string())?);
    } else {
        println!(
            "import: OK imported={} skipped={} chunks={}",
            result.imported,
            result.skipped(),
            result.chunks
        );
    }
    Ok(())
}

fn migrate_departments(db: PathBuf, batch_size: usize, machine_json: bool) -> Result<(), String> {
    if batch_size == 0 {
        return Err("batch-size must be at least 1".to_string());
    }
    let mut conn = vitrine_store::open_store(&db).map_err(|e| e.to_string())?;
    let report =
        vitrine_store::migrate_departments(&mut conn, batch_size).map_err(|e| e.to_string())?;

    if machine_json {
        let payload = json!({
            "departments": report.departments,
            "products_updated": report.products_updated,
            "batches": report.batches,
        });
        println!("{}", serde_json::to_string(&payload).map_err(|e| e.to_string())?);
    } else {
        println!(
            "migrate-departments: OK departments={} products_updated={} batches={}",
            report.departments, report.products_updated, report.batches
        );
    }
    Ok(())
}

/// Read-only commands must not create an empty database out of a mistyped
/// path; `Connection::open` would.
fn open_existing(db: &Path) -> Result<Connection, String> {
    if !db.exists() {
        return Err(format!("no database at {}", db.display()));
    }
    Connection::open(db).map_err(|e| e.to_string())
}

fn inspect_db(db: PathBuf, sample_rows: usize, machine_json: bool) -> Result<(), String> {
    let conn = open_existing(&db)?;

    let count = vitrine_store::product_count(&conn).map_err(|e| e.to_string())?;
    let departments = vitrine_store::list_departments(&conn).map_err(|e| e.to_string())?;
    let categories = vitrine_store::category_distribution(&conn, 10).map_err(|e| e.to_string())?;
    let by_department =
        vitrine_store::department_distribution(&conn, 10).map_err(|e| e.to_string())?;
    let samples = vitrine_store::sample_products(&conn, sample_rows).map_err(|e| e.to_string())?;
    let quality = vitrine_store::quality_checks(&conn).map_err(|e| e.to_string())?;

    if machine_json {
        let payload = json!({
            "product_count": count,
            "departments": departments,
            "top_categories": categories,
            "by_department": by_department,
            "sample_rows": samples,
            "quality": quality,
        });
        println!("{}", serde_json::to_string(&payload).map_err(|e| e.to_string())?);
        return Ok(());
    }

    println!("product_count={count}");
    println!(
        "departments={}",
        serde_json::to_string(&departments).map_err(|e| e.to_string())?
    );
    println!(
        "top_categories={}",
        serde_json::to_string(&categories).map_err(|e| e.to_string())?
    );
    println!(
        "by_department={}",
        serde_json::to_string(&by_department).map_err(|e| e.to_string())?
    );
    println!(
        "sample_rows={}",
        serde_json::to_string(&samples).map_err(|e| e.to_string())?
    );
    println!(
        "quality={}",
        serde_json::to_string(&quality).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn explain_query(db: PathBuf, filter: ProductFilter, limit: usize) -> Result<(), String> {
    let conn = open_existing(&db)?;
    let req = ProductQueryRequest {
        filter,
        page: 1,
        page_size: limit,
    };
    let lines =
        explain_query_plan(&conn, &req, &QueryLimits::default()).map_err(|e| e.to_string())?;
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
