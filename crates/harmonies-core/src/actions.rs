//! Turn actions and the events they produce.
//!
//! A turn is an ordered list of `Action`s submitted together. Applying a turn
//! yields the `TurnEvent`s describing what changed, in order.

use crate::cards::Animal;
use crate::grid::Position;
use crate::tokens::{Stack, Token};
use serde::{Deserialize, Serialize};

/// Everything a player can do within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Place one token of the chosen display group on a cell
    PlaceToken(Token, Position),
    /// Take an animal card from the display into hand
    TakeCard(Animal),
    /// Remove an animal card from the display without taking it
    DiscardCard(Animal),
    /// Put a cube from a held card on the anchor cell of its pattern
    PlaceCube(Animal, Position),
}

impl Action {
    /// Whether this is a take or discard of a display card
    pub fn is_card_action(&self) -> bool {
        matches!(self, Action::TakeCard(_) | Action::DiscardCard(_))
    }
}

/// Events that occur as a result of a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A token advanced a cell's stack
    TokenPlaced {
        token: Token,
        position: Position,
        stack: Stack,
    },

    /// A display card moved into hand
    CardTaken { animal: Animal, cubes: u8 },

    /// A display card was thrown away
    CardDiscarded { animal: Animal },

    /// A cube was placed and its reward banked
    CubePlaced {
        animal: Animal,
        position: Position,
        reward: u8,
        /// Cubes left on the card afterwards
        remaining: u8,
    },

    /// A consumed display group was redrawn from the supply
    TokensRefilled { group: usize, tokens: Vec<Token> },

    /// The card display was topped up from the supply
    CardsRefilled { drawn: Vec<Animal> },
}
