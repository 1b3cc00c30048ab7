use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skatt_core::{MunicipalRateProvider, TaxTableProvider};
use skatt_data::{
    MUNICIPALITIES_FILE, MunicipalityLoader, ReferenceData, TAX_TABLES_FILE, TaxTableLoader,
    VEHICLES_FILE, VehicleLoader,
};

/// Check a directory of Skatteverket reference data before using it.
///
/// The directory may hold any of:
/// - tax_tables.csv: monthly withholding tables ("år", "tabellnr", "inkomst fr.o.m.", ...)
/// - municipalities.csv: municipal, county and church rates per parish
/// - vehicles.csv: new-car prices and vehicle tax per model
#[derive(Parser, Debug)]
#[command(name = "skatt-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the reference CSV files
    #[arg(short, long, default_value = "data")]
    dir: PathBuf,

    /// Income year to check table coverage for
    #[arg(short, long, default_value_t = 2025)]
    year: i32,

    /// Print every municipality with its withholding table
    #[arg(short, long, default_value_t = false)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    for name in [TAX_TABLES_FILE, MUNICIPALITIES_FILE, VEHICLES_FILE] {
        let path = args.dir.join(name);
        if !path.exists() {
            println!("{name}: missing");
            continue;
        }
        let file =
            File::open(&path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let parse_context = || format!("Failed to parse CSV: {}", path.display());
        let count = match name {
            TAX_TABLES_FILE => TaxTableLoader::parse(file)
                .with_context(parse_context)?
                .len(),
            MUNICIPALITIES_FILE => MunicipalityLoader::parse(file)
                .with_context(parse_context)?
                .len(),
            _ => VehicleLoader::parse(file).with_context(parse_context)?.len(),
        };
        println!("{name}: {count} records");
    }

    let data = ReferenceData::from_dir(&args.dir)
        .with_context(|| format!("Failed to load reference data from: {}", args.dir.display()))?;

    let mut missing: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for municipality in data.municipalities() {
        let table_id = municipality.table_id(false);
        let found = data.tax_table(args.year, &table_id).is_ok();
        if args.list {
            println!(
                "{:<24} table {:<4} {}",
                municipality.name,
                table_id,
                if found { "ok" } else { "missing" }
            );
        }
        if !found {
            missing.entry(table_id).or_default().push(municipality.name);
        }
    }

    if missing.is_empty() {
        println!("All municipalities have a withholding table for {}.", args.year);
    } else {
        for (table_id, names) in &missing {
            println!(
                "Table {table_id} for {} is missing ({} municipalities, e.g. {})",
                args.year,
                names.len(),
                names[0]
            );
        }
    }

    Ok(())
}
