pub mod handlers;
pub mod routes;
pub mod shared;
pub mod store;
pub mod system;

use tokio::net::TcpListener;

use crate::shared::config::load_config;
use crate::shared::state::AppState;
use crate::store::seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = load_config()?;
    let store = seed::seeded()?;
    let state = AppState::new(&config, store);
    tracing::info!("Uploads directory: {}", state.uploads_dir.display());

    let app = routes::configure_routes(state, routes::cors_layer(&config.cors));

    let addr = config.bind_addr()?;
    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        "Demo accounts: admin / {}, greenearth / {} (aggregator), approvedretail / {} (buyer)",
        seed::ADMIN_PASSWORD,
        seed::MEMBER_PASSWORD,
        seed::MEMBER_PASSWORD
    );

    axum::serve(listener, app).await?;

    Ok(())
}
