mod aggregate;
mod config;
mod export;
mod ledger;
mod logging;
mod models;
mod run;
mod store;
mod ui;


use anyhow::Result;

use crate::config::Config;
use crate::ledger::Ledger;
use crate::store::{LocalStorage, SqliteStore};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env()?;
    config.ensure_data_dir()?;
    logging::init_tracing(&config)?;

    let store = SqliteStore::open(&config.db_path)?;
    let mut ledger = Ledger::load(LocalStorage::new(Box::new(store)))?;
    tracing::debug!(db = %config.db_path.display(), "ledger opened");

    match args.len() {
        1 => run::as_tui(&mut ledger),
        2.. => run::as_cli(&args, &mut ledger),
        _ => {
            eprintln!("Usage: expensedash [command]");
            Ok(())
        }
    }
}
