//! Runnable server binary.
//!
//! # Responsibility
//! - Construct the process-wide store and hand it to the HTTP adapter.
//! - Read the two supported environment knobs: `PORT` and `TASKLIST_DB`.

use std::sync::{Arc, Mutex};

use tasklist_core::db::{open_db, open_db_in_memory};
use tasklist_core::{default_log_level, init_logging};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = std::env::current_dir()?.join("logs");
    match log_dir.to_str() {
        Some(dir) => {
            if let Err(err) = init_logging(default_log_level(), dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        None => eprintln!("logging disabled: log directory path is not valid UTF-8"),
    }

    // TASKLIST_DB selects a database file; unset keeps the store in memory,
    // scoped to this process.
    let conn = match std::env::var("TASKLIST_DB") {
        Ok(path) => open_db(path)?,
        Err(_) => open_db_in_memory()?,
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    log::info!("event=server_start module=http status=ok addr={addr}");
    println!("listening on {addr}");

    axum::serve(listener, tasklist_http::app(Arc::new(Mutex::new(conn)))).await?;
    Ok(())
}
