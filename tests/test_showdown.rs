//! Linear showdown and fold equity checked against all-pairs oracles on
//! random boards, ranges and reach vectors.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use subgame_solver::cards::*;
use subgame_solver::hand_evaluator::{HandEvaluator, SevenCardEvaluator};
use subgame_solver::node::{NodeState, Player};
use subgame_solver::ranges::{parse_range, Combo, Range};
use subgame_solver::river_cache::RiverEvaluationCache;
use subgame_solver::showdown_node::{showdown_utility_naive, ShowdownNode};
use subgame_solver::terminal_node::TerminalNode;
use subgame_solver::traversal::{Discount, Traversal};

const WIDE: &str = "22+, A2+, K2+, Q2+, J2+, T2+, 92+, 82+, 72+, 62+, 52+, 42+, 32";

fn random_board(rng: &mut StdRng, size: usize) -> Vec<Card> {
    let mut deck = Deck::new(None);
    deck.shuffle(rng);
    deck.deal(size).unwrap()
}

/// Random subset of all hands with random weights, board cards removed.
fn random_range(rng: &mut StdRng, board: &[Card], keep: f64) -> Range {
    let mut combos = Vec::new();
    for combo in &parse_range(WIDE).unwrap() {
        if rng.gen_bool(keep) {
            combos.push(Combo {
                hand: combo.hand,
                weight: rng.gen_range(0.05..1.0),
            });
        }
    }
    Range::from_combos(combos).remove_conflicts(board)
}

fn random_reach(rng: &mut StdRng, range: &Range) -> Vec<f64> {
    range.iter().map(|c| c.weight * rng.gen::<f64>()).collect()
}

/// Direct evaluation of every hand pair on `board`.
fn brute_force_showdown(
    ours: &Range,
    theirs: &Range,
    opponent_reach: &[f64],
    board: &[Card],
    win: f64,
) -> Vec<f64> {
    let eval = SevenCardEvaluator;
    let rank = |hand: Hand| {
        let mut cards = board.to_vec();
        cards.extend(hand.cards());
        eval.rank(&cards)
    };
    ours.iter()
        .map(|mine| {
            let my_rank = rank(mine.hand);
            theirs
                .iter()
                .zip(opponent_reach)
                .filter(|(other, _)| !other.hand.overlaps(&mine.hand))
                .map(|(other, &p)| match rank(other.hand).cmp(&my_rank) {
                    std::cmp::Ordering::Greater => p * win,
                    std::cmp::Ordering::Less => -p * win,
                    std::cmp::Ordering::Equal => 0.0,
                })
                .sum()
        })
        .collect()
}

#[test]
fn showdown_matches_all_pairs_on_random_boards() {
    let mut rng = StdRng::seed_from_u64(20240611);
    for _ in 0..6 {
        let board = random_board(&mut rng, 5);
        let oop = random_range(&mut rng, &board, 0.25);
        let ip = random_range(&mut rng, &board, 0.25);

        let mut cache = RiverEvaluationCache::new(oop.clone(), ip.clone());
        let id = cache.insert(&board).unwrap();
        let pot = rng.gen_range(2.0..200.0);
        let node = ShowdownNode::new(NodeState::new(pot, [50.0, 50.0]), Player::IP, board.clone(), id);

        let mut traversal = Traversal::new([&oop, &ip], &cache, Discount::default());
        for traverser in [Player::OOP, Player::IP] {
            traversal.traverser = traverser;
            let (ours, theirs) = match traverser {
                Player::OOP => (&oop, &ip),
                Player::IP => (&ip, &oop),
            };
            let reach = random_reach(&mut rng, theirs);

            let linear = node.showdown_utility(&traversal, &reach);
            let naive = showdown_utility_naive(&traversal, cache.get(id), &reach, node.win_utility());
            let brute = brute_force_showdown(ours, theirs, &reach, &board, pot / 2.0);

            assert_eq!(linear.len(), ours.len());
            for h in 0..ours.len() {
                assert_relative_eq!(linear[h], naive[h], epsilon = 1e-9, max_relative = 1e-9);
                assert_relative_eq!(linear[h], brute[h], epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }
}

#[test]
fn showdown_ignores_ties_and_blocked_hands() {
    let board = parse_board("AsKdQh7c2s").unwrap();
    // Same two hands on both sides: each matchup is a blocked pair or a tie.
    let range = parse_range("JhTh, JdTd").unwrap();
    let mut cache = RiverEvaluationCache::new(range.clone(), range.clone());
    let id = cache.insert(&board).unwrap();
    let node = ShowdownNode::new(NodeState::new(10.0, [0.0, 0.0]), Player::IP, board.clone(), id);
    let traversal = Traversal::new([&range, &range], &cache, Discount::default());

    let utility = node.showdown_utility(&traversal, &[1.0, 1.0]);
    assert_eq!(utility, vec![0.0, 0.0]);
}

#[test]
fn showdown_simple_nuts_versus_air() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let qq = parse_range("QQ").unwrap();
    let nn = parse_range("99").unwrap();
    let mut cache = RiverEvaluationCache::new(qq.clone(), nn.clone());
    let id = cache.insert(&board).unwrap();
    let node = ShowdownNode::new(NodeState::new(20.0, [0.0, 0.0]), Player::OOP, board, id);

    let mut traversal = Traversal::new([&qq, &nn], &cache, Discount::default());
    let utility = node.showdown_utility(&traversal, &nn.weights());
    // Six unblocked 99 combos, each losing 10 to every QQ.
    for u in utility {
        assert_relative_eq!(u, 60.0);
    }

    traversal.traverser = Player::IP;
    for u in node.showdown_utility(&traversal, &qq.weights()) {
        assert_relative_eq!(u, -60.0);
    }
}

// ---------------------------------------------------------------------------
// Fold equity
// ---------------------------------------------------------------------------

#[test]
fn fold_matches_all_pairs_on_random_boards() {
    let mut rng = StdRng::seed_from_u64(99);
    for size in [3, 4, 5] {
        let board = random_board(&mut rng, size);
        let oop = random_range(&mut rng, &board, 0.3);
        let ip = random_range(&mut rng, &board, 0.3);
        let cache = RiverEvaluationCache::new(oop.clone(), ip.clone());

        for winner in [Player::OOP, Player::IP] {
            let node = TerminalNode::new(NodeState::new(30.0, [85.0, 85.0]), winner, board.clone());
            let mut traversal = Traversal::new([&oop, &ip], &cache, Discount::default());
            for traverser in [Player::OOP, Player::IP] {
                traversal.traverser = traverser;
                let reach = random_reach(&mut rng, traversal.opponent_range());
                let linear = node.fold_utility(&traversal, &reach);
                let naive = node.fold_utility_naive(&traversal, &reach);
                for (a, b) in linear.iter().zip(&naive) {
                    assert_relative_eq!(*a, *b, epsilon = 1e-9, max_relative = 1e-9);
                }
            }
        }
    }
}

#[test]
fn fold_adds_back_identical_hand() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let ours = parse_range("QsQh").unwrap();
    let theirs = parse_range("QsQh, QdQc, 9s9h").unwrap();
    let cache = RiverEvaluationCache::new(ours.clone(), theirs.clone());
    let node = TerminalNode::new(NodeState::new(10.0, [95.0, 95.0]), Player::OOP, board);
    let traversal = Traversal::new([&ours, &theirs], &cache, Discount::default());

    // QsQh is blocked, QdQc and 9s9h are not: 2 combos times 5.
    let utility = node.fold_utility(&traversal, &theirs.weights());
    assert_relative_eq!(utility[0], 10.0);
}
