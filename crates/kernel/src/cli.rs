//! CLI command implementations.
//!
//! These commands operate with a minimal context (configuration and, where
//! needed, a database pool), without starting the HTTP server.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::models::language::Languages;

/// Apply pending schema migrations and exit.
pub async fn cmd_migrate(config: &Config) -> Result<()> {
    let pool = db::create_pool(config).await?;
    db::run_migrations(&pool).await?;
    println!("Migrations applied.");
    Ok(())
}

/// Print the configured languages, default first.
pub fn cmd_languages(languages: &Languages) {
    print!("{}", languages_table(languages));
}

fn languages_table(languages: &Languages) -> String {
    let mut out = format!("{:<8} {:<20} {}\n", "CODE", "LABEL", "DEFAULT");
    out.push_str(&"-".repeat(36));
    out.push('\n');
    for language in languages.iter() {
        let default = if language.code == languages.default_code() {
            "yes"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<8} {:<20} {default}\n",
            language.code, language.label
        ));
    }
    out
}
