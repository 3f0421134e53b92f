//! Integration tests for the turn engine.
//!
//! These tests play whole games through the public API with seeded random
//! sources and check the state invariants after every turn.

use harmonies_core::game::{DISPLAY_CARDS, MAX_HELD_CARDS};
use harmonies_core::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Pick a display group and legal cells for each of its tokens
fn choose_token_actions(game: &GameState, rng: &mut StdRng) -> Option<Vec<Action>> {
    let mut groups: Vec<&Vec<Token>> = game
        .display_tokens()
        .iter()
        .filter(|g| !g.is_empty())
        .collect();
    groups.shuffle(rng);

    'groups: for group in groups {
        let mut board = game.board().clone();
        let mut actions = Vec::new();
        for &token in group {
            let Some(&target) = board.placeable_positions(token).choose(rng) else {
                continue 'groups;
            };
            board.place_token(token, target);
            actions.push(Action::PlaceToken(token, target));
        }
        return Some(actions);
    }
    None
}

/// Cube placements that hold on the board after `actions`
fn choose_cube_actions(game: &GameState, actions: &[Action]) -> Vec<Action> {
    let mut board = game.board().clone();
    for action in actions {
        if let Action::PlaceToken(token, pos) = *action {
            board.place_token(token, pos);
        }
    }

    let mut cubes = Vec::new();
    for (&animal, &remaining) in game.held_cards() {
        let mut left = remaining;
        for pos in Position::all() {
            if left == 0 {
                break;
            }
            if !board.has_cube(pos) && animal.card().matches(&board, pos) {
                board.place_cube(pos);
                cubes.push(Action::PlaceCube(animal, pos));
                left -= 1;
            }
        }
    }
    cubes
}

/// Play random legal turns until the tokens run out or nothing fits
fn play_random_game(seed: u64) -> GameState {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = GameState::new(&mut rng);

    for _ in 0..200 {
        let Some(mut actions) = choose_token_actions(&game, &mut rng) else {
            break;
        };
        if game.held_cards().len() < MAX_HELD_CARDS && rng.gen_bool(0.5) {
            if let Some(&animal) = game.display_cards().first() {
                actions.push(Action::TakeCard(animal));
            }
        }
        let cubes = choose_cube_actions(&game, &actions);
        actions.extend(cubes);

        let before = game.clone();
        game.submit_turn(&actions, &mut rng)
            .unwrap_or_else(|err| panic!("legal turn rejected: {err}"));
        check_turn_invariants(&before, &game);
    }

    game
}

fn check_turn_invariants(before: &GameState, after: &GameState) {
    for pos in Position::all() {
        let (old, new) = (before.board().stack(pos), after.board().stack(pos));
        assert!(new.height() >= old.height(), "stack at {pos} shrank");
        assert!(new.compatibility().contains(old), "{old} cannot grow into {new}");
        if before.board().has_cube(pos) {
            assert!(after.board().has_cube(pos), "cube at {pos} removed");
        }
    }
    for (token, &count) in after.supply_tokens() {
        assert!(count <= before.supply_tokens()[token]);
    }
    assert!(after.held_cards().len() <= MAX_HELD_CARDS);
    assert!(after.held_cards().values().all(|&n| n > 0));
    assert!(after.display_cards().len() <= DISPLAY_CARDS);
    assert!(after.supply_cards().len() <= before.supply_cards().len());
    assert!(after.banked_rewards() >= before.banked_rewards());
    assert_eq!(after.turn_number(), before.turn_number() + 1);
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..20 {
        let game = play_random_game(seed);
        let score = game.score();
        assert_eq!(score.cards, game.banked_rewards());
        assert_eq!(score.total(), score_board(game.board()).total() + game.banked_rewards());
        assert!(game.turn_number() > 0);
    }
}

#[test]
fn test_clone_is_independent() {
    let mut rng = StdRng::seed_from_u64(3);
    let game = GameState::new(&mut rng);
    let mut branch = game.clone();
    let actions = choose_token_actions(&branch, &mut rng).unwrap();
    branch.submit_turn(&actions, &mut rng).unwrap();

    assert_ne!(game, branch);
    assert_eq!(game.turn_number(), 0);
    assert_eq!(game.empty_cells(), GRID_SIZE);
}

#[test]
fn test_same_seed_same_game() {
    let a = play_random_game(11);
    let b = play_random_game(11);
    assert_eq!(a, b);
}

#[test]
fn test_state_snapshot_serializes() {
    let game = play_random_game(5);
    let json = serde_json::to_string(&game).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, game);
}

#[test]
fn test_position_rejects_out_of_range_json() {
    assert!(serde_json::from_str::<Position>("22").is_ok());
    assert!(serde_json::from_str::<Position>("23").is_err());
}

fn arb_action() -> impl Strategy<Value = Action> {
    let token = prop::sample::select(Token::ALL.to_vec());
    let animal = prop::sample::select(Animal::all().collect::<Vec<_>>());
    let pos = (0u8..GRID_SIZE as u8).prop_map(|i| Position::new(i).unwrap());
    prop_oneof![
        3 => (token, pos.clone()).prop_map(|(t, p)| Action::PlaceToken(t, p)),
        1 => animal.clone().prop_map(Action::TakeCard),
        1 => animal.clone().prop_map(Action::DiscardCard),
        1 => (animal, pos).prop_map(|(a, p)| Action::PlaceCube(a, p)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_rejected_turns_change_nothing(
        seed in any::<u64>(),
        actions in prop::collection::vec(arb_action(), 0..8),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = GameState::new(&mut rng);
        let before = game.clone();

        match game.submit_turn(&actions, &mut rng) {
            Ok(_) => {
                prop_assert_eq!(game.turn_number(), 1);
            }
            Err(_) => {
                prop_assert_eq!(game, before);
            }
        }
    }
}
