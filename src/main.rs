use std::sync::Arc;

use tracing::info;
use weather_mcp::{
    build_app,
    config::{Config, Transport},
    logging, stdio,
    weather_client::OpenWeatherClient,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let provider = Arc::new(OpenWeatherClient::new(config.api_key.clone()));

    let transport = config.transport;
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config, provider);

    match transport {
        Transport::Stdio => {
            info!("server starting on stdio");
            stdio::serve(state).await?;
        }
        Transport::Http => {
            let app = build_app(state);
            let listener = tokio::net::TcpListener::bind(bind_socket).await?;

            info!(bind_addr = %bind_socket, "server starting");

            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}
