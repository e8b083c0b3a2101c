//! Server assembly and lifecycle

use cachefront_domain::error::{Error, Result};
use cachefront_infrastructure::cache::build_cache;
use cachefront_infrastructure::config::ConfigLoader;
use cachefront_infrastructure::logging::init_logging;
use rocket::{routes, Build, Rocket};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::handlers::{memory, ops, redis};
use crate::state::AppState;

/// Build the Rocket application with all routes mounted
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount(
            "/cache",
            routes![
                memory::set_entry,
                memory::get_entry,
                memory::delete_entry,
                memory::get_or_set_entry,
            ],
        )
        .mount(
            "/redis",
            routes![
                redis::set_string,
                redis::set_strings,
                redis::get_strings,
                redis::get_string,
                redis::increment_string,
                redis::decrement_string,
                redis::hash_set,
                redis::hash_fields,
                redis::hash_values,
                redis::hash_delete_fields,
                redis::hash_get,
                redis::hash_exists,
                redis::hash_increment,
                redis::list_range,
                redis::list_push_back,
                redis::list_push_front,
                redis::list_pop_back,
                redis::list_pop_front,
                redis::list_remove,
                redis::list_len,
                redis::set_add,
                redis::set_remove,
                redis::set_members,
                redis::set_len,
                redis::zset_add,
                redis::zset_remove,
                redis::zset_range,
                redis::zset_len,
                redis::key_delete,
                redis::key_exists,
                redis::key_rename,
                redis::key_expire,
                redis::probe,
            ],
        )
        .mount("/", routes![ops::health, ops::stats, ops::live, ops::ready])
}

/// Load configuration, initialize logging, and serve until shutdown
pub async fn run(config_path: Option<PathBuf>, port_override: Option<u16>) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }

    let config = loader.load()?;
    init_logging(&config.logging)?;

    let (cache, redis) = build_cache(&config.cache).await?;
    let state = AppState {
        cache,
        redis,
        config,
        started_at: Instant::now(),
    };

    let host = state.config.server.host.clone();
    let port = port_override.unwrap_or(state.config.server.port);

    info!(
        backend = state.cache.backend_name(),
        "server listening on {}:{}",
        host,
        port
    );

    let figment = rocket::Config::figment()
        .merge(("address", host))
        .merge(("port", port));

    build_rocket(state)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| Error::internal(format!("rocket launch failed: {}", e)))?;

    Ok(())
}
