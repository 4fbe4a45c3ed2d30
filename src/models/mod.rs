//! Core data models for the lineup engine.

mod position;
mod record;

pub use position::*;
pub use record::*;
