//! Terrain tokens and the stacks they build.
//!
//! Each cell holds a `Stack`, a terrain at some height. Placing a `Token` on a
//! stack either advances it along a fixed table of legal placements or is
//! refused. The table is a small DAG rooted at `Stack::Empty`:
//!
//! ```text
//! Empty ─gray─> Mountain1 ─gray─> Mountain2 ─gray─> Mountain3
//!   │              └─red──> Building2
//!   ├─red──> Building1 ─red─> Building2
//!   ├─brown> Trunk1 ─red──> Building2
//!   │          ├──brown> Trunk2 ─green─> Tree3
//!   │          └──green> Tree2
//!   ├─green> Tree1
//!   ├─blue─> Water1
//!   └─yellow> Field1
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A terrain token drawn from the supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    Gray,
    Red,
    Brown,
    Green,
    Blue,
    Yellow,
}

impl Token {
    /// All token kinds in canonical order
    pub const ALL: [Token; 6] = [
        Token::Gray,
        Token::Red,
        Token::Brown,
        Token::Green,
        Token::Blue,
        Token::Yellow,
    ];

    /// Fill and edge colors as 0xRRGGBB, for renderers
    pub fn colors(&self) -> (u32, u32) {
        match self {
            Token::Gray => (0x9E9E9E, 0x616161),
            Token::Red => (0xE53935, 0xB71C1C),
            Token::Brown => (0x8D6E63, 0x5D4037),
            Token::Green => (0x43A047, 0x1B5E20),
            Token::Blue => (0x1E88E5, 0x0D47A1),
            Token::Yellow => (0xFDD835, 0xF9A825),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Terrain family of a non-empty stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Mountain,
    Building,
    Trunk,
    Tree,
    Water,
    Field,
}

/// The terrain state of one cell.
///
/// Identity is the level name alone: a `Building2` built on a mountain and one
/// built on a trunk are the same stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Stack {
    #[default]
    Empty,
    Mountain1,
    Building1,
    Trunk1,
    Tree1,
    Water1,
    Field1,
    Mountain2,
    Building2,
    Trunk2,
    Tree2,
    Mountain3,
    Tree3,
}

/// Number of distinct stacks
pub const STACK_COUNT: usize = 13;

impl Stack {
    /// All stacks, roots before the stacks built on them
    pub const ALL: [Stack; STACK_COUNT] = [
        Stack::Empty,
        Stack::Mountain1,
        Stack::Building1,
        Stack::Trunk1,
        Stack::Tree1,
        Stack::Water1,
        Stack::Field1,
        Stack::Mountain2,
        Stack::Building2,
        Stack::Trunk2,
        Stack::Tree2,
        Stack::Mountain3,
        Stack::Tree3,
    ];

    /// The stack produced by placing `token` here, or `None` if not placeable
    pub const fn successor(self, token: Token) -> Option<Stack> {
        use Stack::*;
        use Token::*;
        match (self, token) {
            (Empty, Gray) => Some(Mountain1),
            (Empty, Red) => Some(Building1),
            (Empty, Brown) => Some(Trunk1),
            (Empty, Green) => Some(Tree1),
            (Empty, Blue) => Some(Water1),
            (Empty, Yellow) => Some(Field1),
            (Mountain1, Gray) => Some(Mountain2),
            (Mountain1, Red) => Some(Building2),
            (Building1, Red) => Some(Building2),
            (Trunk1, Red) => Some(Building2),
            (Trunk1, Brown) => Some(Trunk2),
            (Trunk1, Green) => Some(Tree2),
            (Mountain2, Gray) => Some(Mountain3),
            (Trunk2, Green) => Some(Tree3),
            _ => None,
        }
    }

    /// Whether `token` can be placed on this stack
    pub const fn accepts(self, token: Token) -> bool {
        self.successor(token).is_some()
    }

    /// Canonical tokens of this stack, bottom to top
    pub const fn components(self) -> &'static [Token] {
        use Token::*;
        match self {
            Stack::Empty => &[],
            Stack::Mountain1 => &[Gray],
            Stack::Mountain2 => &[Gray, Gray],
            Stack::Mountain3 => &[Gray, Gray, Gray],
            Stack::Building1 => &[Red],
            Stack::Building2 => &[Red, Red],
            Stack::Trunk1 => &[Brown],
            Stack::Trunk2 => &[Brown, Brown],
            Stack::Tree1 => &[Green],
            Stack::Tree2 => &[Brown, Green],
            Stack::Tree3 => &[Brown, Brown, Green],
            Stack::Water1 => &[Blue],
            Stack::Field1 => &[Yellow],
        }
    }

    /// Every token sequence that builds this stack from `Empty`
    pub fn histories(self) -> Vec<Vec<Token>> {
        let mut histories = Vec::new();
        collect_histories(Stack::Empty, self, &mut Vec::new(), &mut histories);
        histories
    }

    /// Number of tokens in the stack
    pub const fn height(self) -> usize {
        self.components().len()
    }

    /// The token on top, identical for every history
    pub fn top(self) -> Option<Token> {
        self.components().last().copied()
    }

    /// Terrain family, `None` for an empty cell
    pub const fn terrain(self) -> Option<Terrain> {
        match self {
            Stack::Empty => None,
            Stack::Mountain1 | Stack::Mountain2 | Stack::Mountain3 => Some(Terrain::Mountain),
            Stack::Building1 | Stack::Building2 => Some(Terrain::Building),
            Stack::Trunk1 | Stack::Trunk2 => Some(Terrain::Trunk),
            Stack::Tree1 | Stack::Tree2 | Stack::Tree3 => Some(Terrain::Tree),
            Stack::Water1 => Some(Terrain::Water),
            Stack::Field1 => Some(Terrain::Field),
        }
    }

    /// Earlier stacks that can still grow into this one (including itself)
    pub fn compatibility(self) -> StackSet {
        COMPATIBILITY[self as usize]
    }
}

fn collect_histories(
    current: Stack,
    target: Stack,
    path: &mut Vec<Token>,
    out: &mut Vec<Vec<Token>>,
) {
    if current == target {
        out.push(path.clone());
        return;
    }
    for token in Token::ALL {
        if let Some(next) = current.successor(token) {
            path.push(token);
            collect_histories(next, target, path, out);
            path.pop();
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A set of stacks, stored as a bit per `Stack` discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StackSet(u16);

impl StackSet {
    /// The empty set
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a stack to the set
    pub fn insert(&mut self, stack: Stack) {
        self.0 |= 1 << stack as u16;
    }

    /// Whether the set holds `stack`
    pub const fn contains(&self, stack: Stack) -> bool {
        self.0 & (1 << stack as u16) != 0
    }

    /// Union of two sets
    pub const fn union(self, other: StackSet) -> StackSet {
        StackSet(self.0 | other.0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in `Stack::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = Stack> + '_ {
        Stack::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Stack> for StackSet {
    fn from_iter<I: IntoIterator<Item = Stack>>(iter: I) -> Self {
        let mut set = StackSet::new();
        for stack in iter {
            set.insert(stack);
        }
        set
    }
}

/// Reflexive-transitive closure of the inverse placement relation
static COMPATIBILITY: LazyLock<[StackSet; STACK_COUNT]> = LazyLock::new(|| {
    let mut table = [StackSet::new(); STACK_COUNT];
    // `Stack::ALL` lists every stack after its predecessors
    for stack in Stack::ALL {
        let mut set = StackSet::new();
        set.insert(stack);
        for before in Stack::ALL {
            if Token::ALL.iter().any(|&t| before.successor(t) == Some(stack)) {
                set = set.union(table[before as usize]);
            }
        }
        table[stack as usize] = set;
    }
    table
});
