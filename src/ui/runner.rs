//! Server runner: router assembly, listener bind and graceful shutdown.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::domain::RoomStore;
use crate::infrastructure::repository::InMemoryRoomStore;
use crate::ui::handler::{
    get_room_detail, get_rooms, health_check, reset_room, websocket_handler,
};
use crate::ui::signal::shutdown_signal;
use crate::ui::state::AppState;

/// Build the router. Exposed separately from [`run`] so tests can mount it
/// on an ephemeral port with a pre-seeded store.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .route("/api/rooms/{room_id}/reset", post(reset_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the room server until ctrl-c / SIGTERM.
pub async fn run(host: &str, port: u16) -> Result<(), std::io::Error> {
    let store: Arc<dyn RoomStore> = Arc::new(InMemoryRoomStore::new());
    let state = Arc::new(AppState::new(store));
    let app = app_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Room server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
