//! Harmonies - a hexagonal tile-placement board game engine
//!
//! This crate provides the rules engine for a single player board, including:
//! - Hex grid topology with doubled coordinates and 60° rotation
//! - Terrain tokens and the stacks they build
//! - Animal cards with rotatable shape requirements
//! - Game state machine with atomic turn validation
//! - Board scoring
//!
//! # Architecture
//!
//! The engine is synchronous and deterministic apart from token and card
//! draws, which take an explicit random source. `GameState` is a plain value:
//! cloning it gives an independent copy for speculative search.
//!
//! # Modules
//!
//! - [`grid`]: Cell positions, adjacency and rotation
//! - [`tokens`]: Tokens, stacks and the placement table
//! - [`board`]: Per-cell stacks and cubes
//! - [`cards`]: Animal card deck and shape matching
//! - [`actions`]: Turn actions and events
//! - [`game`]: Game state and turn engine
//! - [`score`]: Scoring categories

pub mod actions;
pub mod board;
pub mod cards;
pub mod game;
pub mod grid;
pub mod score;
pub mod tokens;

// Re-export commonly used types
pub use actions::{Action, TurnEvent};
pub use board::Board;
pub use cards::{Animal, AnimalCard, Placement, Shape};
pub use game::{GameError, GameState};
pub use grid::{InvalidPosition, Offset, Position, GRID_SIZE};
pub use score::{score_board, Score};
pub use tokens::{Stack, StackSet, Terrain, Token};
