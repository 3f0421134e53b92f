//! Board representation.
//!
//! The board is a fixed array of 23 cells. Each cell holds a terrain `Stack`
//! and may carry one animal cube. Stacks only ever grow along the placement
//! table and cubes are never removed.

use crate::grid::{Position, GRID_SIZE};
use crate::tokens::{Stack, Token};
use serde::{Deserialize, Serialize};

/// The shared player board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Board {
    /// Terrain of each cell
    stacks: [Stack; GRID_SIZE],
    /// Cells holding an animal cube
    cubes: [bool; GRID_SIZE],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Terrain at a cell
    pub fn stack(&self, pos: Position) -> Stack {
        self.stacks[pos.index()]
    }

    /// All stacks in position order
    pub fn stacks(&self) -> &[Stack; GRID_SIZE] {
        &self.stacks
    }

    /// Whether a cube sits on a cell
    pub fn has_cube(&self, pos: Position) -> bool {
        self.cubes[pos.index()]
    }

    /// Cube flags in position order
    pub fn cubes(&self) -> &[bool; GRID_SIZE] {
        &self.cubes
    }

    /// The stack a token would produce at a cell, if the placement is legal
    pub fn placement_result(&self, token: Token, pos: Position) -> Option<Stack> {
        self.stack(pos).successor(token)
    }

    /// Place a token, advancing the cell's stack.
    ///
    /// Returns the new stack, or `None` (leaving the board untouched) if the
    /// token cannot go there.
    pub fn place_token(&mut self, token: Token, pos: Position) -> Option<Stack> {
        let next = self.placement_result(token, pos)?;
        self.stacks[pos.index()] = next;
        Some(next)
    }

    /// Mark a cell as holding a cube. Returns false if one was already there.
    pub fn place_cube(&mut self, pos: Position) -> bool {
        let cell = &mut self.cubes[pos.index()];
        if *cell {
            return false;
        }
        *cell = true;
        true
    }

    /// Cells whose stack accepts `token`
    pub fn placeable_positions(&self, token: Token) -> Vec<Position> {
        Position::all()
            .filter(|&pos| self.stack(pos).accepts(token))
            .collect()
    }

    /// Number of cells with no token
    pub fn empty_cells(&self) -> usize {
        self.stacks.iter().filter(|s| **s == Stack::Empty).count()
    }

    /// Cells paired with their stacks
    pub fn iter(&self) -> impl Iterator<Item = (Position, Stack)> + '_ {
        Position::all().map(move |pos| (pos, self.stack(pos)))
    }
}
