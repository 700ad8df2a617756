use serde::Deserialize;
use std::sync::Arc;
use warp::Filter;

pub mod config;
pub mod session;
pub mod signed_url;
pub mod tools;
pub mod websocket;

use game_persistence::repositories::LeaderboardRepository;
use game_types::LeaderboardSubmission;
use session::SessionManager;
use signed_url::SignedUrlService;
use tools::ToolHandler;

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<u64>,
}

pub fn create_routes(
    session_manager: Arc<SessionManager>,
    tool_handler: Arc<ToolHandler>,
    leaderboard_repository: Arc<LeaderboardRepository>,
    signed_url_service: Arc<SignedUrlService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let session_manager_filter = warp::any().map({
        let session_manager = session_manager.clone();
        move || session_manager.clone()
    });

    let tool_handler_filter = warp::any().map({
        let tool_handler = tool_handler.clone();
        move || tool_handler.clone()
    });

    let leaderboard_filter = warp::any().map({
        let leaderboard_repository = leaderboard_repository.clone();
        move || leaderboard_repository.clone()
    });

    let signed_url_filter = warp::any().map({
        let signed_url_service = signed_url_service.clone();
        move || signed_url_service.clone()
    });

    // WebSocket endpoint carrying the relayed tool calls
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(session_manager_filter)
        .and(tool_handler_filter)
        .map(|ws: warp::ws::Ws, sessions, tools| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, sessions, tools))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Signed-URL proxy for the voice transport
    let signed_url = warp::path("signed-url")
        .and(warp::get())
        .and(signed_url_filter)
        .and_then(handle_signed_url_request);

    // Leaderboard endpoints
    let leaderboard_get = warp::path("leaderboard")
        .and(warp::get())
        .and(warp::query::<LeaderboardQuery>())
        .and(leaderboard_filter.clone())
        .and_then(handle_leaderboard_request);

    let leaderboard_post = warp::path("leaderboard")
        .and(warp::post())
        .and(warp::body::json())
        .and(leaderboard_filter)
        .and_then(handle_leaderboard_submission);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    websocket
        .or(health)
        .or(signed_url)
        .or(leaderboard_get)
        .or(leaderboard_post)
        .with(cors)
        .with(warp::log("word_roundup"))
}

async fn handle_signed_url_request(
    service: Arc<SignedUrlService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match service.fetch_signed_url().await {
        Ok(url) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "url": url })),
            warp::http::StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("Failed to fetch signed URL: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Failed to fetch signed URL"
                })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_leaderboard_request(
    query: LeaderboardQuery,
    leaderboard_repository: Arc<LeaderboardRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let limit = query.limit.unwrap_or(20).min(100); // Default 20, max 100

    match leaderboard_repository.top_entries(limit).await {
        Ok(entries) => Ok(warp::reply::with_status(
            warp::reply::json(&entries),
            warp::http::StatusCode::OK,
        )),
        Err(err) => {
            tracing::error!("Failed to fetch leaderboard: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Failed to fetch leaderboard"
                })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_leaderboard_submission(
    submission: LeaderboardSubmission,
    leaderboard_repository: Arc<LeaderboardRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if submission.player_name.trim().is_empty() {
        return Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({
                "error": "Player name must not be empty"
            })),
            warp::http::StatusCode::BAD_REQUEST,
        ));
    }

    match leaderboard_repository.insert_entry(&submission).await {
        Ok(entry) => Ok(warp::reply::with_status(
            warp::reply::json(&entry),
            warp::http::StatusCode::CREATED,
        )),
        Err(err) => {
            tracing::error!("Failed to record leaderboard entry: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Failed to record leaderboard entry"
                })),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
