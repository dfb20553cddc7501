//! Infrastructure layer: storage, repositories, outbound delivery and DTOs.

pub mod dto;
pub mod message_pusher;
pub mod persistence;
pub mod repository;
