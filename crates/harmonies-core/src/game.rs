//! Core game state machine.
//!
//! This module contains the `GameState` aggregate and the turn engine. A turn
//! is an ordered list of actions that is either applied in full or rejected
//! with the first rule it breaks, leaving the state untouched.

use crate::actions::{Action, TurnEvent};
use crate::board::Board;
use crate::cards::Animal;
use crate::grid::Position;
use crate::score::{score_board, Score};
use crate::tokens::{Stack, Token};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Tokens of each kind in the supply at the start of a game
pub const INITIAL_SUPPLY: [(Token, u32); 6] = [
    (Token::Gray, 23),
    (Token::Red, 15),
    (Token::Brown, 21),
    (Token::Green, 19),
    (Token::Blue, 23),
    (Token::Yellow, 19),
];

/// Number of token groups on display
pub const DISPLAY_GROUPS: usize = 3;

/// Tokens per display group
pub const GROUP_SIZE: usize = 3;

/// Animal cards on display
pub const DISPLAY_CARDS: usize = 4;

/// Most animal cards a player may hold at once
pub const MAX_HELD_CARDS: usize = 4;

/// Rule violations that reject a turn.
///
/// `index` is the position of the offending action in the submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Placed tokens {placed:?} do not match any displayed group")]
    TokenMismatch { placed: Vec<Token> },

    #[error("Only one card may be taken or discarded per turn")]
    TooManyCardActions,

    #[error("Action {index}: {animal} is not on display")]
    CardNotAvailable { index: usize, animal: Animal },

    #[error("Action {index}: hand already holds four cards")]
    HandFull { index: usize },

    #[error("Action {index}: cannot place {token} on {stack} at {position}")]
    InvalidPlacement {
        index: usize,
        token: Token,
        position: Position,
        stack: Stack,
    },

    #[error("Action {index}: {animal} is not held")]
    CardNotHeld { index: usize, animal: Animal },

    #[error("Action {index}: {animal} has no cubes left")]
    NoCubesLeft { index: usize, animal: Animal },

    #[error("Action {index}: a cube already sits at {position}")]
    CellOccupied { index: usize, position: Position },

    #[error("Action {index}: {animal} pattern is not satisfied at {position}")]
    RequirementNotMet {
        index: usize,
        animal: Animal,
        position: Position,
    },
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Undrawn tokens by kind
    supply_tokens: BTreeMap<Token, u32>,
    /// Undrawn animal cards
    supply_cards: Vec<Animal>,
    /// Token groups on offer
    display_tokens: [Vec<Token>; DISPLAY_GROUPS],
    /// Animal cards on offer
    display_cards: Vec<Animal>,
    /// Held cards and the cubes still on them
    held_cards: BTreeMap<Animal, u8>,
    /// Cards whose last cube has been placed
    completed_cards: Vec<Animal>,
    /// Terrain and cubes
    board: Board,
    /// Points earned from placed cubes
    banked_rewards: u32,
    /// Completed turns
    turn_number: u32,
}

impl GameState {
    /// Create a new game, drawing the opening displays from `rng`
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut state = Self {
            supply_tokens: INITIAL_SUPPLY.into_iter().collect(),
            supply_cards: Animal::all().collect(),
            display_tokens: Default::default(),
            display_cards: Vec::with_capacity(DISPLAY_CARDS),
            held_cards: BTreeMap::new(),
            completed_cards: Vec::new(),
            board: Board::new(),
            banked_rewards: 0,
            turn_number: 0,
        };

        for group in 0..DISPLAY_GROUPS {
            state.draw_group(group, rng);
        }
        state.refill_cards(rng);
        state
    }

    /// The board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cube flags in position order
    pub fn cubes(&self) -> &[bool] {
        self.board.cubes()
    }

    /// Token groups on offer
    pub fn display_tokens(&self) -> &[Vec<Token>; DISPLAY_GROUPS] {
        &self.display_tokens
    }

    /// Animal cards on offer, in draw order
    pub fn display_cards(&self) -> &[Animal] {
        &self.display_cards
    }

    /// Held cards and their remaining cubes
    pub fn held_cards(&self) -> &BTreeMap<Animal, u8> {
        &self.held_cards
    }

    /// Cards whose cubes have all been placed
    pub fn completed_cards(&self) -> &[Animal] {
        &self.completed_cards
    }

    /// Undrawn tokens by kind
    pub fn supply_tokens(&self) -> &BTreeMap<Token, u32> {
        &self.supply_tokens
    }

    /// Undrawn animal cards
    pub fn supply_cards(&self) -> &[Animal] {
        &self.supply_cards
    }

    /// Total undrawn tokens
    pub fn tokens_remaining(&self) -> u32 {
        self.supply_tokens.values().sum()
    }

    /// Cells with no token yet
    pub fn empty_cells(&self) -> usize {
        self.board.empty_cells()
    }

    /// Points banked from cubes so far
    pub fn banked_rewards(&self) -> u32 {
        self.banked_rewards
    }

    /// Number of turns applied
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Current score, including banked card points
    pub fn score(&self) -> Score {
        Score {
            cards: self.banked_rewards,
            ..score_board(&self.board)
        }
    }

    /// Whether the terrain around `pos` satisfies the card for `animal`.
    ///
    /// Does not look at held cards or cubes already placed.
    pub fn could_place_cube(&self, animal: Animal, pos: Position) -> bool {
        animal.card().matches(&self.board, pos)
    }

    /// Validate and apply a full turn.
    ///
    /// On success the consumed token group and the card display are refilled
    /// from the supply and the events are returned in order. On failure the
    /// state is unchanged and nothing is drawn from `rng`.
    pub fn submit_turn<R: Rng + ?Sized>(
        &mut self,
        actions: &[Action],
        rng: &mut R,
    ) -> Result<Vec<TurnEvent>, GameError> {
        let mut next = self.clone();
        let (consumed, mut events) = match next.apply_actions(actions) {
            Ok(applied) => applied,
            Err(err) => {
                debug!(turn = self.turn_number, error = %err, "turn rejected");
                return Err(err);
            }
        };

        if let Some(group) = consumed {
            events.push(next.draw_group(group, rng));
        }
        let drawn = next.refill_cards(rng);
        if !drawn.is_empty() {
            events.push(TurnEvent::CardsRefilled { drawn });
        }
        next.turn_number += 1;

        debug!(
            turn = next.turn_number,
            group = ?consumed,
            banked = next.banked_rewards,
            events = events.len(),
            "turn applied"
        );
        *self = next;
        Ok(events)
    }

    /// Apply every action in order, returning the consumed display group
    fn apply_actions(
        &mut self,
        actions: &[Action],
    ) -> Result<(Option<usize>, Vec<TurnEvent>), GameError> {
        let consumed = self.match_token_group(actions)?;
        if actions.iter().filter(|a| a.is_card_action()).count() > 1 {
            return Err(GameError::TooManyCardActions);
        }

        let mut events = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let event = match *action {
                Action::PlaceToken(token, position) => self.place_token(index, token, position)?,
                Action::TakeCard(animal) => self.take_card(index, animal)?,
                Action::DiscardCard(animal) => self.discard_card(index, animal)?,
                Action::PlaceCube(animal, position) => self.place_cube(index, animal, position)?,
            };
            events.push(event);
        }

        if let Some(group) = consumed {
            self.display_tokens[group].clear();
        }
        Ok((consumed, events))
    }

    /// Find the display group the turn's tokens come from
    fn match_token_group(&self, actions: &[Action]) -> Result<Option<usize>, GameError> {
        let mut placed: Vec<Token> = actions
            .iter()
            .filter_map(|action| match action {
                Action::PlaceToken(token, _) => Some(*token),
                _ => None,
            })
            .collect();
        if placed.is_empty() {
            return Ok(None);
        }
        placed.sort();

        self.display_tokens
            .iter()
            .position(|group| {
                let mut group = group.clone();
                group.sort();
                !group.is_empty() && group == placed
            })
            .map(Some)
            .ok_or(GameError::TokenMismatch { placed })
    }

    fn place_token(
        &mut self,
        index: usize,
        token: Token,
        position: Position,
    ) -> Result<TurnEvent, GameError> {
        let stack = self
            .board
            .place_token(token, position)
            .ok_or(GameError::InvalidPlacement {
                index,
                token,
                position,
                stack: self.board.stack(position),
            })?;
        Ok(TurnEvent::TokenPlaced {
            token,
            position,
            stack,
        })
    }

    fn take_card(&mut self, index: usize, animal: Animal) -> Result<TurnEvent, GameError> {
        if self.held_cards.len() >= MAX_HELD_CARDS {
            return Err(GameError::HandFull { index });
        }
        self.remove_from_display(index, animal)?;

        let cubes = animal.card().num_cubes();
        self.held_cards.insert(animal, cubes);
        Ok(TurnEvent::CardTaken { animal, cubes })
    }

    fn discard_card(&mut self, index: usize, animal: Animal) -> Result<TurnEvent, GameError> {
        self.remove_from_display(index, animal)?;
        Ok(TurnEvent::CardDiscarded { animal })
    }

    fn remove_from_display(&mut self, index: usize, animal: Animal) -> Result<(), GameError> {
        let slot = self
            .display_cards
            .iter()
            .position(|&a| a == animal)
            .ok_or(GameError::CardNotAvailable { index, animal })?;
        self.display_cards.remove(slot);
        Ok(())
    }

    fn place_cube(
        &mut self,
        index: usize,
        animal: Animal,
        position: Position,
    ) -> Result<TurnEvent, GameError> {
        let remaining = match self.held_cards.get(&animal) {
            Some(&remaining) => remaining,
            None if self.completed_cards.contains(&animal) => {
                return Err(GameError::NoCubesLeft { index, animal })
            }
            None => return Err(GameError::CardNotHeld { index, animal }),
        };
        if remaining == 0 {
            return Err(GameError::NoCubesLeft { index, animal });
        }
        if self.board.has_cube(position) {
            return Err(GameError::CellOccupied { index, position });
        }
        if !self.could_place_cube(animal, position) {
            return Err(GameError::RequirementNotMet {
                index,
                animal,
                position,
            });
        }

        let card = animal.card();
        let reward = card.rewards[(card.num_cubes() - remaining) as usize];
        let remaining = remaining - 1;
        self.board.place_cube(position);
        self.banked_rewards += u32::from(reward);
        if remaining == 0 {
            self.held_cards.remove(&animal);
            self.completed_cards.push(animal);
        } else {
            self.held_cards.insert(animal, remaining);
        }

        Ok(TurnEvent::CubePlaced {
            animal,
            position,
            reward,
            remaining,
        })
    }

    /// Refill one display group with up to `GROUP_SIZE` tokens
    fn draw_group<R: Rng + ?Sized>(&mut self, group: usize, rng: &mut R) -> TurnEvent {
        let tokens: Vec<Token> = (0..GROUP_SIZE)
            .map_while(|_| self.draw_token(rng))
            .collect();
        self.display_tokens[group] = tokens.clone();
        TurnEvent::TokensRefilled { group, tokens }
    }

    /// Top up the card display, returning the cards drawn
    fn refill_cards<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Animal> {
        let mut drawn = Vec::new();
        while self.display_cards.len() < DISPLAY_CARDS {
            match self.draw_card(rng) {
                Some(animal) => {
                    self.display_cards.push(animal);
                    drawn.push(animal);
                }
                None => break,
            }
        }
        drawn
    }

    /// Draw one token, weighted by how many of each kind remain
    fn draw_token<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Token> {
        let weights: Vec<u32> = Token::ALL
            .iter()
            .map(|token| self.supply_tokens.get(token).copied().unwrap_or(0))
            .collect();
        // Fails only when the supply is empty
        let distribution = WeightedIndex::new(&weights).ok()?;
        let token = Token::ALL[distribution.sample(rng)];
        if let Some(count) = self.supply_tokens.get_mut(&token) {
            *count -= 1;
        }
        trace!(%token, "token drawn");
        Some(token)
    }

    /// Draw one card uniformly from the supply
    fn draw_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Animal> {
        if self.supply_cards.is_empty() {
            return None;
        }
        let animal = self.supply_cards.remove(rng.gen_range(0..self.supply_cards.len()));
        trace!(%animal, "card drawn");
        Some(animal)
    }
}
