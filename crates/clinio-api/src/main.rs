mod api_doc;
mod auth;
mod constants;
mod error;
mod handlers;
mod landlock;
mod middleware;
mod setup;
mod state;
mod telemetry;
mod utils;

use clinio_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // The uploads root must exist before the sandbox rule referring to it
    // can be installed.
    tokio::fs::create_dir_all(config.uploads_root()).await?;

    // Best-effort Landlock sandboxing on Linux.
    landlock::linux::init(config.uploads_root());

    // Initialize the application (telemetry, state, routes)
    let (_state, router) = crate::setup::initialize_app(config.clone()).await?;

    // Start the server
    crate::setup::server::start_server(&config, router).await?;

    Ok(())
}
