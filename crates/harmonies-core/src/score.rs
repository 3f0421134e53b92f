//! End-of-game scoring.
//!
//! Each terrain category is scored independently from the board contents:
//! - Trees: fixed value per tree height
//! - Mountains: same values, but only mountains touching another mountain count
//! - Fields: 5 per connected group of at least two field cells
//! - Buildings: 5 per finished (two-high) building touching at least three
//!   token colors
//! - Water: table lookup on the longest river
//!
//! Card points are banked as cubes are placed and are added by the game state.

use crate::board::Board;
use crate::grid::{Position, GRID_SIZE};
use crate::tokens::{Stack, Terrain, Token};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Points for a tree or mountain of height 1, 2 and 3
const HEIGHT_POINTS: [u32; 3] = [1, 3, 7];

/// Points per connected field group
const FIELD_GROUP_POINTS: u32 = 5;

/// Minimum size of a scoring field group
const MIN_FIELD_GROUP: usize = 2;

/// Points per building with enough neighbor colors
const BUILDING_POINTS: u32 = 5;

/// Only buildings of this height score
const FINISHED_BUILDING: Stack = Stack::Building2;

/// Distinct neighbor colors a building needs
const MIN_BUILDING_COLORS: usize = 3;

/// Points by river length (in cells)
const WATER_POINTS: [u32; 7] = [0, 0, 2, 5, 8, 11, 15];

/// Extra points per cell beyond the end of `WATER_POINTS`
const WATER_POINTS_STEP: u32 = 4;

/// Score broken down by category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    pub trees: u32,
    pub mountains: u32,
    pub fields: u32,
    pub buildings: u32,
    pub water: u32,
    /// Points banked from animal cubes
    pub cards: u32,
}

impl Score {
    /// Sum of every category
    pub fn total(&self) -> u32 {
        self.trees + self.mountains + self.fields + self.buildings + self.water + self.cards
    }
}

/// Score the terrain of a board. `cards` is left at zero.
pub fn score_board(board: &Board) -> Score {
    Score {
        trees: score_trees(board),
        mountains: score_mountains(board),
        fields: score_fields(board),
        buildings: score_buildings(board),
        water: water_points(longest_river(board)),
        cards: 0,
    }
}

fn height_points(stack: Stack) -> u32 {
    HEIGHT_POINTS[stack.height() - 1]
}

fn score_trees(board: &Board) -> u32 {
    board
        .iter()
        .filter(|(_, stack)| stack.terrain() == Some(Terrain::Tree))
        .map(|(_, stack)| height_points(stack))
        .sum()
}

fn score_mountains(board: &Board) -> u32 {
    board
        .iter()
        .filter(|(_, stack)| stack.terrain() == Some(Terrain::Mountain))
        .filter(|(pos, _)| {
            pos.neighbors()
                .iter()
                .any(|&n| board.stack(n).top() == Some(Token::Gray))
        })
        .map(|(_, stack)| height_points(stack))
        .sum()
}

fn score_fields(board: &Board) -> u32 {
    let groups = components(board, Terrain::Field)
        .into_iter()
        .filter(|group| group.len() >= MIN_FIELD_GROUP)
        .count() as u32;
    groups * FIELD_GROUP_POINTS
}

fn score_buildings(board: &Board) -> u32 {
    board
        .iter()
        .filter(|(_, stack)| *stack == FINISHED_BUILDING)
        .filter(|(pos, _)| {
            let colors: HashSet<Token> = pos
                .neighbors()
                .iter()
                .filter_map(|&n| board.stack(n).top())
                .collect();
            colors.len() >= MIN_BUILDING_COLORS
        })
        .count() as u32
        * BUILDING_POINTS
}

/// Points for a river of `length` cells
pub fn water_points(length: usize) -> u32 {
    match WATER_POINTS.get(length) {
        Some(&points) => points,
        None => {
            let last = WATER_POINTS.len() - 1;
            WATER_POINTS[last] + WATER_POINTS_STEP * (length - last) as u32
        }
    }
}

/// Maximal connected groups of cells with the given terrain
pub fn components(board: &Board, terrain: Terrain) -> Vec<Vec<Position>> {
    let mut seen = [false; GRID_SIZE];
    let mut groups = Vec::new();

    for (start, stack) in board.iter() {
        if seen[start.index()] || stack.terrain() != Some(terrain) {
            continue;
        }
        seen[start.index()] = true;
        let mut group = vec![start];
        let mut stack_of_cells = vec![start];
        while let Some(pos) = stack_of_cells.pop() {
            for &n in pos.neighbors() {
                if !seen[n.index()] && board.stack(n).terrain() == Some(terrain) {
                    seen[n.index()] = true;
                    group.push(n);
                    stack_of_cells.push(n);
                }
            }
        }
        group.sort();
        groups.push(group);
    }

    groups
}

/// Length in cells of the longest river on the board.
///
/// A river's length is the number of cells on the shortest route between its
/// two farthest-apart water cells. Every water cell is tried as a start.
pub fn longest_river(board: &Board) -> usize {
    board
        .iter()
        .filter(|(_, stack)| stack.terrain() == Some(Terrain::Water))
        .map(|(start, _)| farthest_water_distance(board, start) + 1)
        .max()
        .unwrap_or(0)
}

/// Breadth-first search through water cells, returning the largest step count
fn farthest_water_distance(board: &Board, start: Position) -> usize {
    let mut distance = [usize::MAX; GRID_SIZE];
    distance[start.index()] = 0;
    let mut queue = VecDeque::from([start]);
    let mut farthest = 0;

    while let Some(pos) = queue.pop_front() {
        let d = distance[pos.index()];
        farthest = farthest.max(d);
        for &n in pos.neighbors() {
            if distance[n.index()] == usize::MAX && board.stack(n).terrain() == Some(Terrain::Water)
            {
                distance[n.index()] = d + 1;
                queue.push_back(n);
            }
        }
    }

    farthest
}
