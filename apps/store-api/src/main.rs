//! Store API - REST server for the products resource

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::InMemoryProductRepository;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let state = AppState {
        products: InMemoryProductRepository::new(),
    };

    let api_routes = api::routes(&state);
    let router =
        create_router::<openapi::ApiDoc>(api_routes, &config.server, &config.environment)?;
    let app = router.merge(health_router(config.app.clone()));

    info!(
        "Starting {} v{} ({:?}) on {}",
        config.app.name,
        config.app.version,
        config.environment,
        config.server.address()
    );

    let products = state.products.clone();
    create_production_app(app, &config.server, async move {
        info!(
            "Shutting down: discarding {} in-memory products",
            products.len().await
        );
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Store API shutdown complete");
    Ok(())
}
