//! Infrastructure layer: concrete store implementations and wire DTOs.

pub mod dto;
pub mod repository;
