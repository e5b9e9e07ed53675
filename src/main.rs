// proposal-pdf: Generate commercial proposal PDFs from service line items

mod currency;
mod error;
mod model;
mod render;
mod store;

use std::io::Read;

use ::image::DynamicImage;
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Deserialize;

use crate::error::AppError;
use crate::model::ClientRecord;
use crate::render::{generate_pdf, output_filename, RenderOptions};
use crate::store::{DraftField, QuoteStore};

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a commercial proposal PDF from service line items")]
struct Args {
    /// Client name
    #[arg(short, long)]
    client: String,

    /// Client email
    #[arg(short, long)]
    email: Option<String>,

    /// Client WhatsApp/phone number
    #[arg(short, long)]
    phone: Option<String>,

    /// Line items file (JSON array, see tests/fixtures/items.json)
    #[arg(short, long)]
    items: String,

    /// Proposal date (YYYY-MM-DD format, defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Logo image (file path or URL) to display in the header
    #[arg(long)]
    logo: Option<String>,

    /// Output filename (defaults to proposta_comercial_{client}.pdf)
    #[arg(short, long)]
    output: Option<String>,
}

/// Line item entry from the JSON file. `unit_price` holds the raw digit
/// entry (centavos), masked into a BRL string on the way into the store.
#[derive(Debug, Deserialize)]
struct ItemEntry {
    name: String,
    details: Option<String>,
    unit: String,
    unit_price: String,
    quantity: String,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let date = parse_date(&args.date)?;
    let entries = load_items(&args.items)?;
    let logo = load_logo(&args.logo)?;

    let mut store = QuoteStore::new(ClientRecord {
        name: args.client,
        email: args.email,
        phone: args.phone,
    });

    // Feed every entry through the draft, so file input gets the same
    // masking and validation as interactive entry.
    for entry in &entries {
        store.set_field(DraftField::Name, &entry.name);
        if let Some(ref details) = entry.details {
            store.set_field(DraftField::Details, details);
        }
        store.set_field(DraftField::Unit, &entry.unit);
        store.set_field(DraftField::UnitPrice, &entry.unit_price);
        store.set_field(DraftField::Quantity, &entry.quantity);
        store.commit_draft()?;
    }

    let output_file = args
        .output
        .unwrap_or_else(|| output_filename(&store.client.name));

    let options = RenderOptions {
        logo,
        ..RenderOptions::default()
    };
    generate_pdf(&store.client, store.items(), date, &options, &output_file)?;

    println!("✓ Generated: {}", output_file);
    println!("  Cliente: {}", store.client.name);
    println!("  Data da proposta: {}", date.format("%d/%m/%Y"));
    println!("  Itens: {}", store.items().len());

    Ok(())
}

fn parse_date(date_str: &Option<String>) -> Result<NaiveDate, AppError> {
    match date_str {
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::DateError(s.clone()))
        }
        None => Ok(Local::now().date_naive()),
    }
}

fn load_items(path: &str) -> Result<Vec<ItemEntry>, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::ItemsError(format!("{}: {}", path, e)))?;
    serde_json::from_str(&content).map_err(|e| AppError::ItemsError(format!("Invalid JSON: {}", e)))
}

fn load_logo(path: &Option<String>) -> Result<Option<DynamicImage>, AppError> {
    match path {
        Some(p) => {
            let image_bytes = if p.starts_with("http://") || p.starts_with("https://") {
                let response = ureq::get(p)
                    .call()
                    .map_err(|e| AppError::LogoError(format!("Failed to fetch URL: {}", e)))?;

                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| AppError::LogoError(format!("Failed to read response: {}", e)))?;
                bytes
            } else {
                std::fs::read(p).map_err(|e| AppError::LogoError(format!("{}: {}", p, e)))?
            };

            let img = ::image::load_from_memory(&image_bytes)
                .map_err(|e| AppError::LogoError(format!("Failed to decode image: {}", e)))?;

            Ok(Some(img))
        }
        None => Ok(None),
    }
}
