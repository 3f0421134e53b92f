//! Scoring fixtures.
//!
//! Each case lists finished stacks by position; stacks are built token by
//! token through the placement table before scoring.

use harmonies_core::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn pos(index: u8) -> Position {
    Position::new(index).unwrap()
}

fn board_with(cells: &[(Stack, u8)]) -> Board {
    let mut board = Board::new();
    for &(stack, index) in cells {
        for &token in stack.components() {
            board
                .place_token(token, pos(index))
                .unwrap_or_else(|| panic!("cannot build {stack} at {index}"));
        }
    }
    board
}

fn water(cells: &[u8]) -> Vec<(Stack, u8)> {
    cells.iter().map(|&i| (Stack::Water1, i)).collect()
}

fn total(cells: &[(Stack, u8)]) -> u32 {
    score_board(&board_with(cells)).total()
}

#[test]
fn test_empty_board() {
    assert_eq!(score_board(&Board::new()), Score::default());
    assert_eq!(total(&[]), 0);
}

#[test]
fn test_trees() {
    assert_eq!(total(&[(Stack::Trunk1, 0)]), 0);
    assert_eq!(total(&[(Stack::Trunk2, 0)]), 0);
    assert_eq!(total(&[(Stack::Tree1, 0)]), 1);
    assert_eq!(total(&[(Stack::Tree2, 0)]), 3);
    assert_eq!(total(&[(Stack::Tree3, 0)]), 7);
    assert_eq!(score_board(&board_with(&[(Stack::Tree3, 0)])).trees, 7);
}

#[test]
fn test_mountains() {
    assert_eq!(total(&[(Stack::Mountain1, 0)]), 0);
    assert_eq!(total(&[(Stack::Mountain1, 0), (Stack::Mountain1, 2)]), 0);
    assert_eq!(total(&[(Stack::Mountain1, 0), (Stack::Mountain1, 1)]), 2);
    assert_eq!(total(&[(Stack::Mountain1, 0), (Stack::Mountain2, 1)]), 4);
    assert_eq!(total(&[(Stack::Mountain1, 0), (Stack::Mountain3, 1)]), 8);

    let score = score_board(&board_with(&[(Stack::Mountain1, 0), (Stack::Mountain1, 1)]));
    assert_eq!(score.mountains, 2);
}

#[test]
fn test_fields() {
    assert_eq!(total(&[(Stack::Field1, 0)]), 0);
    assert_eq!(total(&[(Stack::Field1, 0), (Stack::Field1, 1)]), 5);
    assert_eq!(
        total(&[
            (Stack::Field1, 0),
            (Stack::Field1, 1),
            (Stack::Field1, 2),
            (Stack::Field1, 3)
        ]),
        5
    );

    let two_pairs = board_with(&[
        (Stack::Field1, 0),
        (Stack::Field1, 1),
        (Stack::Field1, 3),
        (Stack::Field1, 4),
    ]);
    assert_eq!(score_board(&two_pairs).fields, 10);
}

#[test]
fn test_buildings() {
    assert_eq!(total(&[(Stack::Building2, 0)]), 0);
    assert_eq!(
        total(&[
            (Stack::Building2, 1),
            (Stack::Trunk1, 5),
            (Stack::Building1, 6),
            (Stack::Building1, 2)
        ]),
        0
    );

    let three_colors = board_with(&[
        (Stack::Building2, 1),
        (Stack::Trunk1, 5),
        (Stack::Building1, 6),
        (Stack::Mountain1, 2),
    ]);
    assert_eq!(score_board(&three_colors).buildings, 5);
    assert_eq!(score_board(&three_colors).total(), 5);

    assert_eq!(
        total(&[
            (Stack::Building2, 1),
            (Stack::Building2, 2),
            (Stack::Trunk1, 5),
            (Stack::Mountain1, 6),
            (Stack::Trunk1, 7),
        ]),
        10
    );
}

#[test]
fn test_water_chain_lengths() {
    let chain = [0, 1, 2, 3, 8, 12, 17, 21];
    let expected = [0, 2, 5, 8, 11, 15, 19, 23];
    for (len, points) in (1..=chain.len()).zip(expected) {
        assert_eq!(total(&water(&chain[..len])), points, "first {len} cells");
    }
    assert_eq!(score_board(&board_with(&water(&chain))).water, 23);
}

#[test]
fn test_water_clusters() {
    assert_eq!(total(&water(&[0, 1, 5])), 2);
    assert_eq!(total(&water(&[0, 1, 5, 6, 10])), 5);
    assert_eq!(total(&water(&[1, 2, 7, 11, 10, 5])), 8);
}

#[test]
fn test_categories_add_up() {
    let board = board_with(&[
        (Stack::Tree3, 0),
        (Stack::Mountain1, 9),
        (Stack::Mountain2, 10),
        (Stack::Field1, 20),
        (Stack::Field1, 21),
        (Stack::Water1, 3),
        (Stack::Water1, 4),
    ]);
    let score = score_board(&board);
    assert_eq!(
        score,
        Score {
            trees: 7,
            mountains: 4,
            fields: 5,
            buildings: 0,
            water: 2,
            cards: 0,
        }
    );
    assert_eq!(score.total(), 18);
}

fn arb_placements() -> impl Strategy<Value = Vec<(Token, u8)>> {
    prop::collection::vec(
        (prop::sample::select(Token::ALL.to_vec()), 0u8..GRID_SIZE as u8),
        0..60,
    )
}

proptest! {
    #[test]
    fn prop_score_depends_only_on_contents(placements in arb_placements()) {
        let mut forward = Board::new();
        for (token, index) in placements {
            forward.place_token(token, pos(index));
        }

        // Rebuild the same stacks visiting cells in reverse order
        let mut reverse = Board::new();
        for (position, stack) in forward.iter().collect::<Vec<_>>().into_iter().rev() {
            for &token in stack.components() {
                reverse.place_token(token, position);
            }
        }

        prop_assert_eq!(forward.stacks(), reverse.stacks());
        prop_assert_eq!(score_board(&forward), score_board(&reverse));
    }
}
