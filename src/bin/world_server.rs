use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;

use elara::account::{
    AccountFlow, AccountStore, MemoryAccountStore, MySqlAccountStore, Password, VersionChecker,
};
use elara::config::ServerConfig;
use elara::game::world::World;
use elara::net::{self, ServerState};
use elara::requests;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut conf_file = "conf/server.yaml".to_string();

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "--h" | "--?" | "/?" => {
                println!("Usage: world_server [--conf FILE]");
                return Ok(());
            }
            "--conf" => {
                if i + 1 < args.len() {
                    i += 1;
                    conf_file = args[i].clone();
                } else {
                    eprintln!("Error: --conf requires a FILE argument");
                    return Ok(());
                }
            }
            _ => {}
        }
        i += 1;
    }

    let config = match std::fs::metadata(&conf_file) {
        Ok(_) => ServerConfig::load(&conf_file)?,
        Err(_) => {
            tracing::warn!("[world] [boot] no config at {}, using defaults", conf_file);
            ServerConfig::default()
        }
    };

    let store: Arc<dyn AccountStore> = match &config.database {
        Some(db) => {
            let pool = MySqlPoolOptions::new()
                .max_connections(5)
                .connect(&db.url())
                .await
                .with_context(|| format!("Cannot connect to DB: {}", db.sql_ip))?;
            Arc::new(MySqlAccountStore::new(pool))
        }
        None => {
            tracing::warn!("[world] [boot] no database configured, accounts are in-memory");
            Arc::new(MemoryAccountStore::new())
        }
    };

    let world = Arc::new(World::from_config(&config.maps));
    world.start_ticks();

    let flow = Arc::new(AccountFlow::new(
        Arc::clone(&store),
        Password::new(),
        VersionChecker::new(config.version),
    ));
    let dispatcher =
        requests::build_dispatcher(Arc::clone(&world), flow, store, config.start_point)?;

    tracing::info!("[world] [started] World Server Started ({} maps)", world.map_count());

    let state = Arc::new(ServerState { world, dispatcher });
    net::run_server(state, &config.bind_addr()).await
}
