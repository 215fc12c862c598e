//! Test fixtures shared by the integration tests.

use std::sync::Arc;
use std::time::Duration;

use tictac_rooms_rs::domain::{ClientId, RoomId, RoomOptions, RoomStore};
use tictac_rooms_rs::infrastructure::repository::InMemoryRoomStore;
use tictac_rooms_rs::ui::app_router;
use tictac_rooms_rs::ui::state::AppState;

/// An HTTP/WebSocket server bound to a local port for the duration of a test.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Start the server on the given port with a pre-seeded store and wait
    /// until it answers health checks.
    pub async fn start(port: u16, store: Arc<InMemoryRoomStore>) -> Self {
        let state = Arc::new(AppState::new(store));
        let app = app_router(state);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind test port");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        let server = Self { port };
        server.wait_until_ready().await;
        server
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    async fn wait_until_ready(&self) {
        let client = reqwest::Client::new();
        let url = format!("{}/api/health", self.base_url());
        for _ in 0..50 {
            if let Ok(response) = client.get(&url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Test server did not become ready");
    }
}

/// Create a store holding one room with two seated players.
pub async fn seeded_store(room: &str) -> Arc<InMemoryRoomStore> {
    let store = Arc::new(InMemoryRoomStore::new());
    let room_id = RoomId::new(room.to_string()).expect("valid room id");
    store.create_room(room_id.clone(), RoomOptions::default()).await;
    for conn in ["conn-a", "conn-b"] {
        let conn_id = ClientId::new(conn.to_string()).expect("valid client id");
        store
            .add_player(&room_id, conn_id, None)
            .await
            .expect("room has free seats");
    }
    store
}
