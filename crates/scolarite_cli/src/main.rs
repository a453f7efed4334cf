//! One-shot schema initialization entry point.
//!
//! # Responsibility
//! - Ensure the academic-records database exists with the current schema.
//! - Keep output deterministic for quick local sanity checks.

use scolarite_core::db::migrations::latest_version;
use scolarite_core::db::open_db;
use scolarite_core::{core_version, default_log_level, init_logging};

const DEFAULT_DB_PATH: &str = "data/school.db";

fn main() {
    if let Some(log_dir) = std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join("logs"))
        .and_then(|dir| dir.to_str().map(str::to_owned))
    {
        // Logging is best effort here; schema init must work without it.
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    match open_db(&db_path) {
        Ok(_conn) => {
            println!("scolarite_core version={}", core_version());
            println!("database `{db_path}` ready at schema version {}", latest_version());
        }
        Err(err) => {
            eprintln!("failed to initialize database `{db_path}`: {err}");
            std::process::exit(1);
        }
    }
}
