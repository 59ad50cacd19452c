use rental_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    print_banner();

    tracing::info!("Mandap rental server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Server state (database, services)
    let state = ServerState::initialize(&config).await;

    // 4. HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
