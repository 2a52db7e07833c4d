//! Standalone migration runner.
//!
//! Usage: `migration [up|fresh|down]` (defaults to `up`).
//! The target database comes from `DATABASE_PATH`, same as the API binary.

use migration::Migrator;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use util::config;

#[tokio::main]
async fn main() {
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".into());

    let path = config::database_path();
    let url = if path.starts_with("sqlite:") {
        path
    } else {
        if let Some(parent) = std::path::Path::new(&path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path}?mode=rwc")
    };

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");

    let result = match command.as_str() {
        "up" => Migrator::up(&db, None).await,
        "fresh" => Migrator::fresh(&db).await,
        "down" => Migrator::down(&db, None).await,
        other => {
            eprintln!("Unknown command: {other} (expected up, fresh, or down)");
            std::process::exit(1);
        }
    };

    match result {
        Ok(()) => println!("Migration `{command}` applied to {url}"),
        Err(err) => {
            eprintln!("Migration `{command}` failed: {err}");
            std::process::exit(1);
        }
    }
}
