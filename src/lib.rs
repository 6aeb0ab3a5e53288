// src/lib.rs

pub mod api;
pub mod assistant;
pub mod config;
pub mod llm;
pub mod models;
pub mod state;
pub mod store;
