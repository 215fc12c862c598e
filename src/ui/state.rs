//! Server state and connection management.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::domain::{ClientId, RoomId, RoomStore};
use crate::infrastructure::dto::websocket::ServerEvent;

/// Client connection information
pub struct ClientInfo {
    /// Message sender channel
    pub sender: mpsc::UnboundedSender<String>,
}

/// Shared application state
pub struct AppState {
    /// RoomStore（データアクセス層の抽象化）
    pub store: Arc<dyn RoomStore>,
    /// WebSocket sender channels for broadcasting
    pub connected_clients: Mutex<HashMap<ClientId, ClientInfo>>,
    /// Room id -> connections subscribed to its broadcasts
    subscriptions: Mutex<HashMap<RoomId, HashSet<ClientId>>>,
    /// Connection -> the room it currently occupies
    client_rooms: Mutex<HashMap<ClientId, RoomId>>,
    /// Per-room event locks, held across an event's store mutations and
    /// broadcasts so clients observe updates in application order
    room_locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self {
            store,
            connected_clients: Mutex::new(HashMap::new()),
            subscriptions: Mutex::new(HashMap::new()),
            client_rooms: Mutex::new(HashMap::new()),
            room_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Lock handle serializing events for one room.
    ///
    /// A handler holds the lock from its first store call until its last
    /// broadcast, so an event's mutations and its fan-out form one atomic
    /// step per room, the same run-to-completion ordering a single-threaded
    /// event loop gives every event.
    pub async fn room_lock(&self, room_id: &RoomId) -> Arc<Mutex<()>> {
        let mut locks = self.room_locks.lock().await;
        locks.entry(room_id.clone()).or_default().clone()
    }

    /// Drop a destroyed room's lock entry unless another event still holds
    /// a handle to it.
    pub async fn discard_room_lock(&self, room_id: &RoomId) {
        let mut locks = self.room_locks.lock().await;
        if let Some(lock) = locks.get(room_id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(room_id);
            }
        }
    }

    /// Register a freshly connected client's outbound channel.
    pub async fn register(&self, client_id: ClientId, sender: mpsc::UnboundedSender<String>) {
        let mut clients = self.connected_clients.lock().await;
        clients.insert(client_id, ClientInfo { sender });
    }

    /// Drop a client's outbound channel after disconnect.
    pub async fn unregister(&self, client_id: &ClientId) {
        let mut clients = self.connected_clients.lock().await;
        clients.remove(client_id);
    }

    /// Subscribe a client to a room's broadcasts and remember the mapping.
    pub async fn track(&self, client_id: &ClientId, room_id: &RoomId) {
        {
            let mut subscriptions = self.subscriptions.lock().await;
            subscriptions
                .entry(room_id.clone())
                .or_default()
                .insert(client_id.clone());
        }
        let mut client_rooms = self.client_rooms.lock().await;
        client_rooms.insert(client_id.clone(), room_id.clone());
    }

    /// Unsubscribe a client from its room. Returns the room it was in.
    pub async fn untrack(&self, client_id: &ClientId) -> Option<RoomId> {
        let room_id = {
            let mut client_rooms = self.client_rooms.lock().await;
            client_rooms.remove(client_id)?
        };
        let mut subscriptions = self.subscriptions.lock().await;
        if let Some(members) = subscriptions.get_mut(&room_id) {
            members.remove(client_id);
            if members.is_empty() {
                subscriptions.remove(&room_id);
            }
        }
        Some(room_id)
    }

    /// The room a client currently occupies, if any.
    pub async fn current_room(&self, client_id: &ClientId) -> Option<RoomId> {
        let client_rooms = self.client_rooms.lock().await;
        client_rooms.get(client_id).cloned()
    }

    /// Send an event to a single client. Failures are logged, not fatal:
    /// a closed channel just means the client is mid-disconnect.
    pub async fn send_to(&self, client_id: &ClientId, event: &ServerEvent) {
        let Some(json) = encode(event) else {
            return;
        };
        let clients = self.connected_clients.lock().await;
        if let Some(info) = clients.get(client_id) {
            if info.sender.send(json).is_err() {
                tracing::warn!("Failed to send event to client '{}'", client_id);
            }
        }
    }

    /// Broadcast an event to every client subscribed to a room.
    pub async fn broadcast(&self, room_id: &RoomId, event: &ServerEvent) {
        self.broadcast_inner(room_id, None, event).await;
    }

    /// Broadcast an event to a room, skipping the originating client.
    pub async fn broadcast_except(
        &self,
        room_id: &RoomId,
        except: &ClientId,
        event: &ServerEvent,
    ) {
        self.broadcast_inner(room_id, Some(except), event).await;
    }

    async fn broadcast_inner(
        &self,
        room_id: &RoomId,
        except: Option<&ClientId>,
        event: &ServerEvent,
    ) {
        let Some(json) = encode(event) else {
            return;
        };
        let members: Vec<ClientId> = {
            let subscriptions = self.subscriptions.lock().await;
            match subscriptions.get(room_id) {
                Some(members) => members.iter().cloned().collect(),
                None => return,
            }
        };
        let clients = self.connected_clients.lock().await;
        for member in members {
            if except == Some(&member) {
                continue;
            }
            if let Some(info) = clients.get(&member) {
                if info.sender.send(json.clone()).is_err() {
                    tracing::warn!("Failed to send event to client '{}'", member);
                }
            }
        }
    }
}

fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize server event: {}", e);
            None
        }
    }
}
