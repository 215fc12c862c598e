//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, PlayerName, RoomId, RoomOptions, Symbol},
    infrastructure::dto::websocket::{ChatMessageDto, ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::{
        JoinRoomUseCase, LeaveRoomUseCase, PlayMoveUseCase, ResetRoomUseCase, SendChatUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Connection identity is server-assigned, one per socket
    let client_id = ClientId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, client_id: ClientId) {
    tracing::info!("Socket connected: {}", client_id);

    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.register(client_id.clone(), tx).await;

    // Spawn a task to receive events addressed to this client and push them
    // down the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Spawn a task to receive events from this client
    let client_id_clone = client_id.clone();
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&state_clone, &client_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect implies leaving whatever room the client occupied
    handle_departure(&state, &client_id).await;
    state.unregister(&client_id).await;
    tracing::info!("Socket disconnected: {}", client_id);
}

async fn dispatch_event(state: &Arc<AppState>, client_id: &ClientId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event from '{}': {}", client_id, e);
            let error = ServerEvent::Error {
                message: "Invalid event payload".to_string(),
            };
            state.send_to(client_id, &error).await;
            return;
        }
    };

    match event {
        ClientEvent::Join {
            room,
            size,
            win_len,
            name,
        } => {
            handle_join(state, client_id, room, RoomOptions { size, win_len }, name).await;
        }
        ClientEvent::Move {
            room,
            index,
            symbol,
        } => {
            handle_move(state, client_id, room, index, symbol).await;
        }
        ClientEvent::Reset { room } => {
            handle_reset(state, client_id, room).await;
        }
        ClientEvent::ChatMessage {
            sender,
            text,
            media_url,
        } => {
            handle_chat(state, client_id, sender, text, media_url).await;
        }
        ClientEvent::Leave { .. } => {
            handle_departure(state, client_id).await;
        }
    }
}

async fn handle_join(
    state: &Arc<AppState>,
    client_id: &ClientId,
    room: Option<String>,
    options: RoomOptions,
    name: Option<String>,
) {
    let room_id = match RoomId::from_payload(room) {
        Ok(id) => id,
        Err(e) => {
            let error = ServerEvent::JoinError {
                message: e.to_string(),
            };
            state.send_to(client_id, &error).await;
            return;
        }
    };

    let name = match name.filter(|n| !n.trim().is_empty()) {
        Some(raw) => match PlayerName::new(raw) {
            Ok(name) => Some(name),
            Err(e) => {
                let error = ServerEvent::JoinError {
                    message: e.to_string(),
                };
                state.send_to(client_id, &error).await;
                return;
            }
        },
        None => None,
    };

    // A connection occupies one room at a time: joining a different room
    // first leaves the old one
    if let Some(previous) = state.current_room(client_id).await {
        if previous != room_id {
            handle_departure(state, client_id).await;
        }
    }

    let lock = state.room_lock(&room_id).await;
    let _guard = lock.lock().await;

    let usecase = JoinRoomUseCase::new(state.store.clone());
    match usecase
        .execute(room_id.clone(), client_id.clone(), name.clone(), options)
        .await
    {
        Ok(outcome) => {
            state.track(client_id, &room_id).await;

            state
                .send_to(client_id, &ServerEvent::joined(&outcome.room, outcome.symbol))
                .await;
            if !outcome.history.is_empty() {
                let history = ServerEvent::ChatHistory {
                    messages: outcome.history.iter().map(ChatMessageDto::from).collect(),
                };
                state.send_to(client_id, &history).await;
            }

            let joined = ServerEvent::PlayerJoined {
                id: client_id.to_string(),
                symbol: outcome.symbol,
                name: name.as_ref().map(|n| n.to_string()),
            };
            state.broadcast_except(&room_id, client_id, &joined).await;
            state
                .broadcast(&room_id, &ServerEvent::players_updated(&outcome.room))
                .await;

            tracing::info!(
                "Socket {} joined room {} as {}",
                client_id,
                room_id,
                outcome.symbol
            );
        }
        Err(e) => {
            tracing::warn!("join error for socket {}: {}", client_id, e);
            let error = ServerEvent::JoinError {
                message: e.to_string(),
            };
            state.send_to(client_id, &error).await;
        }
    }
}

async fn handle_move(
    state: &Arc<AppState>,
    client_id: &ClientId,
    room: Option<String>,
    index: i64,
    symbol: Symbol,
) {
    let room_id = match room.filter(|r| !r.trim().is_empty()).map(RoomId::new) {
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            let error = ServerEvent::Error {
                message: e.to_string(),
            };
            state.send_to(client_id, &error).await;
            return;
        }
        None => {
            let error = ServerEvent::Error {
                message: "Missing room id".to_string(),
            };
            state.send_to(client_id, &error).await;
            return;
        }
    };

    let lock = state.room_lock(&room_id).await;
    let _guard = lock.lock().await;

    let usecase = PlayMoveUseCase::new(state.store.clone());
    match usecase.execute(&room_id, client_id, index, symbol).await {
        Ok(outcome) => {
            state
                .broadcast(&room_id, &ServerEvent::board_update(&outcome.room))
                .await;
            if let Some(ended) = ServerEvent::game_ended(&outcome.room, &outcome.verdict) {
                state.broadcast(&room_id, &ended).await;
                state
                    .broadcast(&room_id, &ServerEvent::players_updated(&outcome.room))
                    .await;
            }
        }
        Err(e) => {
            tracing::warn!("move error for socket {}: {}", client_id, e);
            let error = ServerEvent::Error {
                message: e.to_string(),
            };
            state.send_to(client_id, &error).await;
        }
    }
}

async fn handle_reset(state: &Arc<AppState>, client_id: &ClientId, room: Option<String>) {
    // Fall back to the tracked room, then the default room
    let room_id = match room.filter(|r| !r.trim().is_empty()).map(RoomId::new) {
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            let error = ServerEvent::Error {
                message: e.to_string(),
            };
            state.send_to(client_id, &error).await;
            return;
        }
        None => match state.current_room(client_id).await {
            Some(id) => id,
            None => match RoomId::from_payload(None) {
                Ok(id) => id,
                Err(_) => return,
            },
        },
    };

    let lock = state.room_lock(&room_id).await;
    let _guard = lock.lock().await;

    let usecase = ResetRoomUseCase::new(state.store.clone());
    match usecase.execute(&room_id, client_id).await {
        Ok(room) => {
            state
                .broadcast(&room_id, &ServerEvent::board_update(&room))
                .await;
            state
                .broadcast(&room_id, &ServerEvent::players_updated(&room))
                .await;
        }
        Err(e) => {
            tracing::warn!("reset error for socket {}: {}", client_id, e);
            let error = ServerEvent::Error {
                message: e.to_string(),
            };
            state.send_to(client_id, &error).await;
        }
    }
}

async fn handle_chat(
    state: &Arc<AppState>,
    client_id: &ClientId,
    sender: Option<String>,
    text: Option<String>,
    media_url: Option<String>,
) {
    let Some(room_id) = state.current_room(client_id).await else {
        let error = ServerEvent::Error {
            message: "Join a room before chatting".to_string(),
        };
        state.send_to(client_id, &error).await;
        return;
    };

    let lock = state.room_lock(&room_id).await;
    let _guard = lock.lock().await;

    let usecase = SendChatUseCase::new(state.store.clone());
    match usecase
        .execute(&room_id, client_id, sender, text, media_url)
        .await
    {
        Ok(message) => {
            let dto = ChatMessageDto::from(&message);
            state
                .broadcast_except(&room_id, client_id, &ServerEvent::ChatMessage(dto.clone()))
                .await;
            state
                .send_to(client_id, &ServerEvent::ChatMessageAck(dto))
                .await;
        }
        Err(e) => {
            tracing::warn!("chat error for socket {}: {}", client_id, e);
            let error = ServerEvent::Error {
                message: e.to_string(),
            };
            state.send_to(client_id, &error).await;
        }
    }
}

/// Shared by the `leave` event and the disconnect path: unsubscribe the
/// client, remove its seat and notify whoever is still in the room.
async fn handle_departure(state: &Arc<AppState>, client_id: &ClientId) {
    let Some(room_id) = state.current_room(client_id).await else {
        return;
    };

    let lock = state.room_lock(&room_id).await;
    let guard = lock.lock().await;

    // Leave and disconnect can both reach here; the second caller finds
    // the client already untracked
    if state.untrack(client_id).await.is_none() {
        return;
    }

    let usecase = LeaveRoomUseCase::new(state.store.clone());
    let survivor = usecase.execute(&room_id, client_id).await;

    let left = ServerEvent::PlayerLeft {
        id: client_id.to_string(),
    };
    state.broadcast(&room_id, &left).await;

    let destroyed = survivor.is_none();
    match survivor {
        Some(room) => {
            state
                .broadcast(&room_id, &ServerEvent::players_updated(&room))
                .await;
        }
        None => {
            tracing::info!("Room {} removed (empty)", room_id);
        }
    }

    drop(guard);
    drop(lock);
    if destroyed {
        state.discard_room_lock(&room_id).await;
    }
}
