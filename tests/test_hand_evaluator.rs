use std::cmp::Ordering;

use subgame_solver::cards::*;
use subgame_solver::hand_evaluator::*;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

#[test]
fn test_royal_flush() {
    let hole = vec![c("As"), c("Ks")];
    let board = parse_board("QsTsJs2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::RoyalFlush);
    let king_high = evaluate_hand(&[c("Ks"), c("9s")], &board).unwrap();
    assert_eq!(king_high.category, HandCategory::StraightFlush);
    assert!(result.rank() < king_high.rank());
}

#[test]
fn test_straight_flush() {
    let hole = vec![c("9h"), c("8h")];
    let board = parse_board("7h6h5hAcKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::StraightFlush);
    assert_eq!(result.kickers, vec![9]);
}

#[test]
fn test_four_of_a_kind() {
    let hole = vec![c("Ks"), c("Kh")];
    let board = parse_board("KdKc5s2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FourOfAKind);
    assert_eq!(result.kickers, vec![13, 5]);
}

#[test]
fn test_full_house() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_board("AdKsKh2c3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FullHouse);
    assert_eq!(result.kickers, vec![14, 13]);
}

#[test]
fn test_full_house_from_two_trips() {
    let hole = vec![c("9s"), c("9h")];
    let board = parse_board("9d5s5h5c2d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FullHouse);
    assert_eq!(result.kickers, vec![9, 5]);
}

#[test]
fn test_flush() {
    let hole = vec![c("As"), c("Ts")];
    let board = parse_board("8s5s2sKdQh").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Flush);
    assert_eq!(result.kickers, vec![14, 10, 8, 5, 2]);
}

#[test]
fn test_straight() {
    let hole = vec![c("9s"), c("8h")];
    let board = parse_board("7d6c5sAhKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![9]);
}

#[test]
fn test_wheel() {
    let hole = vec![c("As"), c("2h")];
    let board = parse_board("3d4c5sKhQd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![5]);
}

#[test]
fn test_three_of_a_kind() {
    let hole = vec![c("Qs"), c("Qh")];
    let board = parse_board("Qd7s3h2cKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::ThreeOfAKind);
    assert_eq!(result.kickers, vec![12, 13, 7]);
}

#[test]
fn test_two_pair() {
    let hole = vec![c("As"), c("Kh")];
    let board = parse_board("AdKs5c2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::TwoPair);
    assert_eq!(result.kickers, vec![14, 13, 5]);
}

#[test]
fn test_one_pair() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_board("Kd7s3c2h5d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::OnePair);
    assert_eq!(result.kickers, vec![14, 13, 7, 5]);
}

#[test]
fn test_high_card() {
    let hole = vec![c("As"), c("Kh")];
    let board = parse_board("Qd9s3c2h5d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::HighCard);
    assert_eq!(result.kickers, vec![14, 13, 12, 9, 5]);
}

#[test]
fn test_not_enough_cards() {
    assert!(evaluate_hand(&[c("As"), c("Kh")], &[c("Qd")]).is_err());
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

#[test]
fn test_flush_beats_straight() {
    let board = parse_board("7s6s5s4dAh").unwrap();
    assert_eq!(
        compare_hands(&[c("As"), c("2s")], &[c("8h"), c("9h")], &board).unwrap(),
        Ordering::Greater
    );
}

#[test]
fn test_higher_pair_wins() {
    let board = parse_board("2s5d8cTh3d").unwrap();
    assert_eq!(
        compare_hands(&[c("Ks"), c("Kh")], &[c("As"), c("Ah")], &board).unwrap(),
        Ordering::Less
    );
}

#[test]
fn test_kicker_decides() {
    let board = parse_board("As5d8cTh3d").unwrap();
    assert_eq!(
        compare_hands(&[c("Ad"), c("Kh")], &[c("Ah"), c("Qd")], &board).unwrap(),
        Ordering::Greater
    );
}

#[test]
fn test_board_plays_is_a_tie() {
    let board = parse_board("AsKdQhJsTs").unwrap();
    assert_eq!(
        compare_hands(&[c("2h"), c("3d")], &[c("4h"), c("5d")], &board).unwrap(),
        Ordering::Equal
    );
}

#[test]
fn test_two_pair_kicker() {
    let board = parse_board("AsAd5s5d2c").unwrap();
    let r = compare_hands(&[c("Kh"), c("3c")], &[c("Qh"), c("3d")], &board).unwrap();
    assert_eq!(r, Ordering::Greater);
}

// ---------------------------------------------------------------------------
// Numeric ranks
// ---------------------------------------------------------------------------

#[test]
fn test_rank_lower_is_stronger() {
    let eval = SevenCardEvaluator;
    let board = parse_board("Ks9d5c3h2s").unwrap();
    let cards_for = |hole: &str| {
        let mut cards = board.clone();
        let hand = parse_hand(hole).unwrap();
        cards.extend(hand.cards());
        eval.rank(&cards)
    };
    let set = cards_for("5s5d");
    let top_pair = cards_for("KhQh");
    let air = cards_for("8h7h");
    assert!(set < top_pair);
    assert!(top_pair < air);
}

#[test]
fn test_rank_matches_result_order() {
    let board = parse_board("Jh8d4c3s2h").unwrap();
    let strong = evaluate_hand(&[c("Js"), c("Jd")], &board).unwrap();
    let weak = evaluate_hand(&[c("Ah"), c("Kd")], &board).unwrap();
    assert!(strong > weak);
    assert!(strong.rank() < weak.rank());
}

#[test]
fn test_equal_hands_equal_rank() {
    let eval = SevenCardEvaluator;
    let board = parse_board("AsKdQhJsTs").unwrap();
    let mut a = board.clone();
    a.extend([c("2h"), c("3d")]);
    let mut b = board.clone();
    b.extend([c("4h"), c("5d")]);
    assert_eq!(eval.rank(&a), eval.rank(&b));
}
