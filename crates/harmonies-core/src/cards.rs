//! Animal cards and their shape requirements.
//!
//! An animal card asks for a small pattern of terrain around an anchor cell.
//! The anchor must hold the card's `base` stack and every other cell of the
//! pattern must hold one of the card's `reqs`. Patterns may be rotated in any
//! of the six directions.
//!
//! Which rotations fit on the board depends only on the shape and the anchor,
//! so all of them are computed once up front and matching a card is a scan
//! over at most six short lists.

use crate::board::Board;
use crate::grid::{Offset, Position, GRID_SIZE};
use crate::tokens::Stack;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Spatial pattern of an animal card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Anchor plus one neighbor
    Pair,
    /// Three mutually touching cells
    Triangle,
    /// Anchor plus three consecutive neighbors
    Spread,
    /// Anchor plus two neighbors a third of a turn apart
    Boomerang,
    /// Three cells in a straight line
    Line,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Pair,
        Shape::Triangle,
        Shape::Spread,
        Shape::Boomerang,
        Shape::Line,
    ];

    /// Cells of the unrotated pattern relative to the anchor, each with the
    /// index of the card requirement it must satisfy
    pub const fn offsets(self) -> &'static [(Offset, usize)] {
        match self {
            Shape::Pair => &PAIR,
            Shape::Triangle => &TRIANGLE,
            Shape::Spread => &SPREAD,
            Shape::Boomerang => &BOOMERANG,
            Shape::Line => &LINE,
        }
    }

    /// Number of distinct requirement stacks the shape uses
    pub const fn requirement_count(self) -> usize {
        match self {
            Shape::Line => 2,
            _ => 1,
        }
    }

    /// Rotations of this shape that stay on the board when anchored at `anchor`
    pub fn placements(self, anchor: Position) -> &'static [Placement] {
        &PLACEMENTS[self as usize][anchor.index()]
    }
}

const PAIR: [(Offset, usize); 1] = [(Offset::new(2, 0), 0)];
const TRIANGLE: [(Offset, usize); 2] = [(Offset::new(2, 0), 0), (Offset::new(1, 1), 0)];
const SPREAD: [(Offset, usize); 3] = [
    (Offset::new(2, 0), 0),
    (Offset::new(1, 1), 0),
    (Offset::new(-1, 1), 0),
];
const BOOMERANG: [(Offset, usize); 2] = [(Offset::new(2, 0), 0), (Offset::new(-1, 1), 0)];
const LINE: [(Offset, usize); 2] = [(Offset::new(2, 0), 0), (Offset::new(4, 0), 1)];

/// One rotation of a shape anchored on a board cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Sixths of a turn applied to the base pattern
    pub rotation: u8,
    /// Covered cells (excluding the anchor) and their requirement index
    pub targets: Vec<(Position, usize)>,
}

fn placements_for(shape: Shape, anchor: Position) -> Vec<Placement> {
    (0..6)
        .filter_map(|rotation| {
            let targets = shape
                .offsets()
                .iter()
                .map(|&(offset, slot)| {
                    Position::from_offset(anchor.doubled() + offset.rotate_by(rotation))
                        .map(|pos| (pos, slot))
                })
                .collect::<Option<Vec<_>>>()?;
            Some(Placement { rotation, targets })
        })
        .collect()
}

/// In-bounds rotations indexed by `[shape][anchor]`
static PLACEMENTS: LazyLock<[[Vec<Placement>; GRID_SIZE]; 5]> = LazyLock::new(|| {
    Shape::ALL.map(|shape| {
        std::array::from_fn(|index| {
            Position::new(index as u8)
                .map(|anchor| placements_for(shape, anchor))
                .unwrap_or_default()
        })
    })
});

/// Every animal in the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Animal {
    Meerkat,
    Bat,
    Eagle,
    Squirrel,
    Boar,
    Koala,
    Duck,
    Frog,
    Fish,
    Butterfly,
    Monkey,
    Hedgehog,
    Bear,
    Parrot,
    Wolf,
    Stingray,
    Flamingo,
    Bee,
    Raccoon,
    Penguin,
    Peacock,
    Mouse,
    Kingfisher,
    WhiteWolf,
    Crow,
    Fox,
    Lizard,
    Rabbit,
    Otter,
    Crocodile,
    Panther,
    Llama,
}

/// Number of cards in the deck
pub const DECK_SIZE: usize = 32;

impl Animal {
    /// Every animal, in deck order
    pub fn all() -> impl Iterator<Item = Animal> {
        DECK.iter().map(|card| card.animal)
    }

    /// The card for this animal
    pub fn card(self) -> &'static AnimalCard {
        &DECK[self as usize]
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An immutable animal objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AnimalCard {
    pub animal: Animal,
    pub shape: Shape,
    /// Stack required under the cube
    pub base: Stack,
    /// Stacks required by the other cells of the shape, by requirement index
    pub reqs: &'static [Stack],
    /// Points for each cube placed, first cube first
    pub rewards: &'static [u8],
}

impl AnimalCard {
    const fn new(
        animal: Animal,
        shape: Shape,
        base: Stack,
        reqs: &'static [Stack],
        rewards: &'static [u8],
    ) -> Self {
        Self {
            animal,
            shape,
            base,
            reqs,
            rewards,
        }
    }

    /// Total cubes this card can grant
    pub fn num_cubes(&self) -> u8 {
        self.rewards.len() as u8
    }

    /// Whether a cube for this card could sit on `pos` given the board terrain.
    ///
    /// Ignores cubes already on the board; the turn engine checks those.
    pub fn matches(&self, board: &Board, pos: Position) -> bool {
        board.stack(pos) == self.base
            && self.shape.placements(pos).iter().any(|placement| {
                placement
                    .targets
                    .iter()
                    .all(|&(target, slot)| board.stack(target) == self.reqs[slot])
            })
    }
}

const M1: Stack = Stack::Mountain1;
const M2: Stack = Stack::Mountain2;
const M3: Stack = Stack::Mountain3;
const B: Stack = Stack::Building2;
const T1: Stack = Stack::Tree1;
const T2: Stack = Stack::Tree2;
const T3: Stack = Stack::Tree3;
const W: Stack = Stack::Water1;
const F: Stack = Stack::Field1;

use Animal as A;
use Shape::{Boomerang, Line, Pair, Spread, Triangle};

/// The full deck, indexed by `Animal` discriminant
pub static DECK: [AnimalCard; DECK_SIZE] = [
    AnimalCard::new(A::Meerkat, Pair, M1, &[F], &[14, 9, 5, 2]),
    AnimalCard::new(A::Bat, Pair, M1, &[T3], &[15, 10, 6, 3]),
    AnimalCard::new(A::Eagle, Pair, M3, &[F], &[11, 5]),
    AnimalCard::new(A::Squirrel, Pair, B, &[T3], &[15, 9, 4]),
    AnimalCard::new(A::Boar, Pair, T2, &[B], &[13, 8, 4]),
    AnimalCard::new(A::Koala, Pair, T2, &[T1], &[15, 10, 6, 3]),
    AnimalCard::new(A::Duck, Pair, W, &[B], &[13, 8, 4, 2]),
    AnimalCard::new(A::Frog, Pair, W, &[T1], &[15, 10, 6, 4, 2]),
    AnimalCard::new(A::Fish, Pair, W, &[M3], &[16, 10, 6, 3]),
    AnimalCard::new(A::Butterfly, Pair, F, &[T1], &[17, 12, 8, 5, 2]),
    AnimalCard::new(A::Monkey, Triangle, M2, &[W], &[11, 5]),
    AnimalCard::new(A::Hedgehog, Triangle, B, &[T2], &[12, 5]),
    AnimalCard::new(A::Bear, Triangle, T1, &[M2], &[11, 5]),
    AnimalCard::new(A::Parrot, Triangle, T2, &[W], &[14, 9, 4]),
    AnimalCard::new(A::Wolf, Triangle, T3, &[F], &[16, 10, 4]),
    AnimalCard::new(A::Stingray, Triangle, W, &[M1], &[16, 10, 4]),
    AnimalCard::new(A::Flamingo, Triangle, W, &[F], &[16, 10, 4]),
    AnimalCard::new(A::Bee, Spread, T2, &[F], &[18, 8]),
    AnimalCard::new(A::Raccoon, Spread, F, &[W], &[12, 6]),
    AnimalCard::new(A::Penguin, Boomerang, M1, &[W], &[16, 10, 4]),
    AnimalCard::new(A::Peacock, Boomerang, B, &[W], &[17, 10, 5]),
    AnimalCard::new(A::Mouse, Boomerang, B, &[F], &[17, 10, 5]),
    AnimalCard::new(A::Kingfisher, Boomerang, T3, &[W], &[18, 11, 5]),
    AnimalCard::new(A::WhiteWolf, Boomerang, F, &[T2], &[17, 10, 5]),
    AnimalCard::new(A::Crow, Boomerang, F, &[B], &[9, 4]),
    AnimalCard::new(A::Fox, Line, M1, &[M1, F], &[16, 9, 4]),
    AnimalCard::new(A::Lizard, Line, B, &[F, F], &[16, 10, 5]),
    AnimalCard::new(A::Rabbit, Line, T1, &[T1, B], &[17, 10, 5]),
    AnimalCard::new(A::Otter, Line, W, &[T1, T1], &[16, 10, 5]),
    AnimalCard::new(A::Crocodile, Line, W, &[W, T3], &[15, 9, 4]),
    AnimalCard::new(A::Panther, Line, F, &[T2, T2], &[11, 5]),
    AnimalCard::new(A::Llama, Line, F, &[F, M2], &[12, 5]),
];
