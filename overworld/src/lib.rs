//! # Overworld
//!
//! World data for the overworld runtime: chunk descriptions and the stores that
//! resolve them, character definitions with their placed instances and
//! interaction tables, story flags, and workspace configuration.
//!
//! This crate never mutates live game state. It only describes and loads data;
//! `game_core` owns everything that changes frame to frame.

pub mod chunk;
pub mod config;
pub mod directory;
pub mod entities;
pub mod error;
pub mod flags;
pub mod position;

pub use chunk::*;
pub use config::*;
pub use entities::*;
pub use error::*;
pub use flags::*;
pub use position::*;
