//! Domain layer: entities, enumerations and pure validation helpers.

pub mod entities;
pub mod error;
pub mod slug;
pub mod types;
pub mod videos;
