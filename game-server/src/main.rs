use std::sync::Arc;
use tokio::signal;
use tracing::info;

use game_persistence::{
    connection::connect_and_migrate,
    repositories::{LeaderboardRepository, SessionRepository, WordRepository},
};
use game_server::{
    config::Config, create_routes, session::SessionManager, signed_url::SignedUrlService,
    tools::ToolHandler,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Word Roundup server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let word_repository = Arc::new(WordRepository::new(db.clone()));
    let session_repository = Arc::new(SessionRepository::new(db.clone()));
    let leaderboard_repository = Arc::new(LeaderboardRepository::new(db));

    match word_repository.word_count().await {
        Ok(count) => info!("Word pool holds {} words", count),
        Err(e) => tracing::warn!("Could not count the word pool: {}", e),
    }

    if config.elevenlabs_api_key.is_none() || config.elevenlabs_agent_id.is_none() {
        tracing::warn!(
            "ELEVENLABS_API_KEY / ELEVENLABS_AGENT_ID not set; /signed-url will return errors"
        );
    }

    let session_manager = Arc::new(SessionManager::new());
    let tool_handler = Arc::new(ToolHandler::new(
        word_repository,
        session_repository,
        leaderboard_repository.clone(),
    ));
    let signed_url_service = Arc::new(SignedUrlService::new(
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_agent_id.clone(),
    ));

    let routes = create_routes(
        session_manager,
        tool_handler,
        leaderboard_repository,
        signed_url_service,
    );

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config
            .host
            .parse::<std::net::IpAddr>()
            .expect("Invalid HOST"),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
