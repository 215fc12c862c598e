//! WebSocket game server implementation.

mod handler;
mod runner;
mod signal;
pub mod state; // テストとバイナリからアクセスするため public

pub use runner::{app_router, run};
