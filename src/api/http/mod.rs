// src/api/http/mod.rs

pub mod assistant;
pub mod handlers;
pub mod router;
pub mod tasks;

pub use router::http_router;
