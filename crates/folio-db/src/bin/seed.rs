//! # Seed Data Generator
//!
//! Populates the database with a starter catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p folio-db --bin seed
//!
//! # Specify database path
//! cargo run -p folio-db --bin seed -- --db ./data/folio.db
//!
//! # Wipe everything first (books, reservations, sales, sequence)
//! cargo run -p folio-db --bin seed -- --wipe
//! ```
//!
//! ## Generated Catalog
//! A fixed shelf of Brazilian and Portuguese classics across categories
//! (Realismo, Romantismo, Naturalismo, Modernismo, Clássicos), with prices
//! in centavos and one deliberately sold-out title so the storefront's
//! out-of-stock path has data to show.

use chrono::Utc;
use std::env;

use folio_core::Book;
use folio_db::repository::book::generate_book_id;
use folio_db::{Database, DbConfig};

/// The starter shelf: (title, author, price_cents, stock, category, description)
const CATALOG: &[(&str, &str, i64, i64, &str, Option<&str>)] = &[
    (
        "Dom Casmurro",
        "Machado de Assis",
        2500,
        15,
        "Realismo",
        Some("Bentinho, Capitu e a dúvida que atravessa gerações."),
    ),
    (
        "Memórias Póstumas de Brás Cubas",
        "Machado de Assis",
        2800,
        10,
        "Realismo",
        Some("As memórias de um defunto autor."),
    ),
    ("O Alienista", "Machado de Assis", 1800, 25, "Realismo", None),
    (
        "O Cortiço",
        "Aluísio Azevedo",
        2200,
        12,
        "Naturalismo",
        Some("O cotidiano de uma habitação coletiva carioca."),
    ),
    ("Iracema", "José de Alencar", 2000, 18, "Romantismo", None),
    ("O Guarani", "José de Alencar", 2400, 14, "Romantismo", None),
    // Sold out on purpose
    ("Senhora", "José de Alencar", 2100, 0, "Romantismo", None),
    (
        "Os Lusíadas",
        "Luís de Camões",
        3500,
        8,
        "Clássicos",
        Some("A epopeia das navegações portuguesas."),
    ),
    (
        "Grande Sertão: Veredas",
        "João Guimarães Rosa",
        4200,
        6,
        "Modernismo",
        None,
    ),
    ("Vidas Secas", "Graciliano Ramos", 2600, 20, "Modernismo", None),
    (
        "A Hora da Estrela",
        "Clarice Lispector",
        2300,
        16,
        "Modernismo",
        None,
    ),
    ("Capitães da Areia", "Jorge Amado", 2900, 11, "Modernismo", None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./folio_dev.db");
    let mut wipe = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--wipe" | "-w" => {
                wipe = true;
            }
            "--help" | "-h" => {
                println!("Folio Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./folio_dev.db)");
                println!("  -w, --wipe         Delete existing rows before seeding");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Folio Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Titles:   {}", CATALOG.len());
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    let (embedded, applied) = folio_db::migrations::migration_status(db.pool()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, embedded);

    if wipe {
        // Children before parents: the foreign keys demand it
        sqlx::query("DELETE FROM sales").execute(db.pool()).await?;
        sqlx::query("DELETE FROM reservation_items")
            .execute(db.pool())
            .await?;
        sqlx::query("DELETE FROM reservations")
            .execute(db.pool())
            .await?;
        sqlx::query("DELETE FROM books").execute(db.pool()).await?;
        sqlx::query("UPDATE sequences SET value = 0 WHERE name = 'reservation_number'")
            .execute(db.pool())
            .await?;
        println!("✓ Wiped existing rows");
    }

    // Check existing catalog
    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Re-run with --wipe to regenerate.");
        return Ok(());
    }

    // Insert the catalog
    println!();
    println!("Seeding catalog...");

    let start = std::time::Instant::now();
    let mut seeded = 0;

    for (title, author, price_cents, stock, category, description) in CATALOG {
        let now = Utc::now();
        let book = Book {
            id: generate_book_id(),
            title: (*title).to_string(),
            author: (*author).to_string(),
            price_cents: *price_cents,
            stock: *stock,
            category: (*category).to_string(),
            description: description.map(str::to_string),
            cover_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            version: 0,
        };

        if let Err(e) = db.books().insert(&book).await {
            eprintln!("Failed to insert {}: {}", title, e);
            continue;
        }

        seeded += 1;
        println!("  + {} by {} ({} in stock)", title, author, stock);
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seeded {} books in {:?}", seeded, elapsed);

    // Verify the catalog reads back
    let listed = db.books().list().await?;
    println!("  Catalog check: {} active titles", listed.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
