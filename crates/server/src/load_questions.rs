//! Bulk-loads questions from a plain-text fixture file.
//!
//! One question per line, optional choices appended after `|`:
//!
//!     What's new? | Not much | The sky
//!
//! Blank lines and lines starting with `#` are skipped, as are questions
//! whose text is already in the database.

use chrono::Utc;
use polls::db;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{env, str::FromStr};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:polls.db".to_string());
    let path = env::args().nth(1).unwrap_or_else(|| "questions.txt".to_string());

    let options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    db::init_schema(&db).await?;
    println!("Connected to database!");

    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {path}: {e}"))?;

    let mut count = 0;
    let mut skipped = 0;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split('|').map(str::trim);
        let question_text = match parts.next().filter(|t| !t.is_empty()) {
            Some(text) => text,
            None => continue,
        };

        if db::question_text_exists(&db, question_text).await? {
            println!("⊘ Skipped (duplicate): {question_text}");
            skipped += 1;
            continue;
        }

        let id = db::create_question(&db, question_text, Utc::now()).await?;
        for choice_text in parts.filter(|t| !t.is_empty()) {
            db::add_choice(&db, id, choice_text, 0).await?;
        }

        count += 1;
        println!("✓ Loaded: {question_text}");
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Successfully loaded {count} new questions!");
    if skipped > 0 {
        println!("⊘ Skipped {skipped} duplicate questions");
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    Ok(())
}
