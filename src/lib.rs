//! # Lineup Lens
//!
//! Football lineup analytics over per-player per-game teamsheet records.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (lineup records, position ordering)
//! - **repository**: In-memory lineup table with filtered views
//! - **analyze**: Co-starter mining, formation profiles, frequent position
//!   patterns, player profiling
//! - **ingest**: CSV loading and schema normalization
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod analyze;
pub mod api;
pub mod config;
pub mod ingest;
pub mod models;
pub mod repository;

pub use models::*;
