//! Real-time room coordinator for a turn-based grid game with attached chat.
//!
//! This library provides the server implementation: an authoritative in-memory
//! model of game rooms (player/symbol assignment, turn and move validation,
//! win detection, scoring) plus the WebSocket event protocol that keeps every
//! connected client's view consistent.

pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run as run_server;
