use subgame_solver::cards::{parse_board, parse_card, Card};
use subgame_solver::config::SolverConfig;
use subgame_solver::error::SolverError;
use subgame_solver::game_tree::{path_label, BettingConfig, GameTree, TreeParams};
use subgame_solver::node::{Action, Node, Player, Street};
use subgame_solver::ranges::{parse_range, Range};

fn build(board: &[Card], oop: &Range, ip: &Range, pot: f64, stack: f64) -> Result<GameTree, SolverError> {
    GameTree::build(&TreeParams {
        starting_pot: pot,
        starting_stack: stack,
        board,
        betting: &BettingConfig::uniform(vec![1.0]),
        oop_range: oop,
        ip_range: ip,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn rejects_non_positive_pot_and_stack() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let range = parse_range("QQ").unwrap();
    assert!(matches!(
        build(&board, &range, &range, 0.0, 100.0),
        Err(SolverError::NonPositiveAmount { name: "pot", .. })
    ));
    assert!(matches!(
        build(&board, &range, &range, 10.0, -5.0),
        Err(SolverError::NonPositiveAmount { name: "stack", .. })
    ));
}

#[test]
fn rejects_duplicate_board_card() {
    let ks = parse_card("Ks").unwrap();
    let board = vec![parse_card("2c").unwrap(), ks, parse_card("7h").unwrap(), ks];
    let range = parse_range("QQ").unwrap();
    assert!(matches!(
        build(&board, &range, &range, 10.0, 10.0),
        Err(SolverError::DuplicateCard(_))
    ));
}

#[test]
fn rejects_board_of_wrong_size() {
    let board = vec![parse_card("2c").unwrap(), parse_card("Ks").unwrap()];
    let range = parse_range("QQ").unwrap();
    assert!(matches!(
        build(&board, &range, &range, 10.0, 10.0),
        Err(SolverError::InvalidBoardSize(2))
    ));
}

#[test]
fn rejects_range_emptied_by_board() {
    let board = parse_board("AsAh7d").unwrap();
    let blocked = parse_range("AsAd, AhAc").unwrap();
    let fine = parse_range("QQ").unwrap();
    assert!(matches!(
        build(&board, &blocked, &fine, 10.0, 10.0),
        Err(SolverError::EmptyRange(Player::OOP))
    ));
    assert!(matches!(
        build(&board, &fine, &blocked, 10.0, 10.0),
        Err(SolverError::EmptyRange(Player::IP))
    ));
}

#[test]
fn rejects_non_positive_bet_size() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let range = parse_range("QQ").unwrap();
    let result = GameTree::build(&TreeParams {
        starting_pot: 10.0,
        starting_stack: 100.0,
        board: &board,
        betting: &BettingConfig::uniform(vec![0.5, 0.0]),
        oop_range: &range,
        ip_range: &range,
    });
    assert!(matches!(result, Err(SolverError::InvalidBetSize { .. })));
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

#[test]
fn conflicting_combos_are_removed() {
    let board = parse_board("Qs5d7hJsKs").unwrap();
    let range = parse_range("QQ, 99").unwrap();
    let tree = build(&board, &range, &range, 10.0, 10.0).unwrap();
    assert_eq!(tree.range(Player::OOP).len(), 3 + 6);
    assert_eq!(tree.street(), Street::River);
}

#[test]
fn flop_tree_counts() {
    let board = parse_board("2h7c9d").unwrap();
    let oop = parse_range("AsKs").unwrap();
    let ip = parse_range("QdQc").unwrap();
    let tree = build(&board, &oop, &ip, 10.0, 10.0).unwrap();
    let stats = tree.stats();

    // Every street is a four-decision shove-or-check subtree.
    let rivers = 49 * 48;
    assert_eq!(stats.decision, 4 + 49 * 4 + rivers * 4);
    assert_eq!(stats.chance, 1 + 49);
    assert_eq!(stats.terminal, 2 + 49 * 2 + rivers * 2);
    assert_eq!(stats.showdown, rivers * 3);
    assert_eq!(stats.all_in, 2 + 49 * 2);
    // Showdowns and runouts share the same completed boards.
    assert_eq!(stats.cache_entries, 49 * 48 / 2);
}

#[test]
fn flop_shove_call_is_an_allin_showdown() {
    let board = parse_board("2h7c9d").unwrap();
    let oop = parse_range("AsKs").unwrap();
    let ip = parse_range("QdQc").unwrap();
    let tree = build(&board, &oop, &ip, 10.0, 10.0).unwrap();
    match tree.node_at(&[1, 0]) {
        Some(Node::AllInShowdown(node)) => {
            assert_eq!(node.street, Street::Flop);
            assert_eq!(node.state.pot, 30.0);
            assert_eq!(node.runouts().len(), 1176);
        }
        _ => panic!("expected an all-in showdown after shove and call"),
    }
    match tree.node_at(&[0, 0]) {
        Some(Node::Chance(chance)) => {
            assert_eq!(chance.street, Street::Flop);
            assert_eq!(chance.next_cards().len(), 49);
        }
        _ => panic!("expected a chance node after check-check"),
    }
}

#[test]
fn fold_leaves_bettor_with_the_pot_before_the_bet() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let range = parse_range("QQ").unwrap();
    let tree = build(&board, &range, &range, 10.0, 10.0).unwrap();
    match tree.node_at(&[1, 1]) {
        Some(Node::Terminal(fold)) => {
            assert_eq!(fold.winner, Player::OOP);
            assert_eq!(fold.state.pot, 10.0);
            assert_eq!(fold.win_utility(), 5.0);
        }
        _ => panic!("expected a fold terminal"),
    }
}

#[test]
fn path_labels_follow_actions() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let range = parse_range("QQ").unwrap();
    let tree = build(&board, &range, &range, 10.0, 10.0).unwrap();
    assert_eq!(path_label(&tree, &[]), "root");
    assert_eq!(path_label(&tree, &[0, 1]), "check/all-in 10.0");
    let facing = tree.node_at(&[0, 1]).and_then(Node::as_decision).unwrap();
    assert_eq!(facing.actions(), &[Action::Call, Action::Fold]);
}

#[test]
fn path_label_stops_at_unknown_action() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let range = parse_range("QQ").unwrap();
    let tree = build(&board, &range, &range, 10.0, 10.0).unwrap();
    assert_eq!(path_label(&tree, &[7]), "root");
    assert_eq!(path_label(&tree, &[0, 9]), "check");
}

fn root_actions_with_cutoff(cutoff: f64) -> Vec<Action> {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let range = parse_range("QQ").unwrap();
    let betting = BettingConfig {
        all_in_cutoff: cutoff,
        ..BettingConfig::uniform(vec![0.25, 0.5])
    };
    let tree = GameTree::build(&TreeParams {
        starting_pot: 10.0,
        starting_stack: 12.0,
        board: &board,
        betting: &betting,
        oop_range: &range,
        ip_range: &range,
    })
    .unwrap();
    tree.root_decision().unwrap().actions().to_vec()
}

#[test]
fn small_bets_collapse_to_all_in_near_the_stack() {
    // 10 * 1.5 covers the 12 stack, so the menu is replaced by a shove.
    assert_eq!(root_actions_with_cutoff(1.5), vec![Action::Check, Action::AllIn(12.0)]);
}

#[test]
fn small_bets_survive_below_the_cutoff() {
    assert_eq!(
        root_actions_with_cutoff(1.0),
        vec![Action::Check, Action::Bet(2.5), Action::Bet(5.0)]
    );
}

#[test]
fn describe_outlines_the_tree() {
    let board = parse_board("2c5d7hJsKs").unwrap();
    let range = parse_range("QQ, 99").unwrap();
    let tree = build(&board, &range, &range, 10.0, 10.0).unwrap();
    let outline = tree.describe();
    assert!(outline.starts_with("Decision OOP"));
    assert!(outline.contains("[all-in 10.0]"));
    assert!(outline.contains("Showdown | pot 30.0"));
    assert!(outline.contains("Fold | OOP wins 5.0"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_builds_a_solver() {
    let cfg = SolverConfig::from_json_str(
        r#"{
            "board": "2c5d7hJsKs",
            "oop_range": "QQ, 99",
            "ip_range": "QQ, 99",
            "starting_pot": 10,
            "starting_stack": 10,
            "iterations": 5,
            "betting": { "river": { "oop": [[1.0]], "ip": [[1.0]] } }
        }"#,
    )
    .unwrap();
    let solver = cfg.build_solver().unwrap();
    assert_eq!(solver.tree().stats().decision, 4);
}

#[test]
fn config_rejects_zero_iterations() {
    let cfg = SolverConfig {
        iterations: 0,
        ..SolverConfig::default()
    };
    assert!(matches!(cfg.build_solver(), Err(SolverError::InvalidValue(_))));
}

#[test]
fn config_rejects_bad_board() {
    let cfg = SolverConfig {
        board: "AsAsKd".to_string(),
        ..SolverConfig::default()
    };
    assert!(matches!(cfg.build_solver(), Err(SolverError::DuplicateCard(_))));
}

#[test]
fn config_rejects_non_finite_discount() {
    let mut cfg = SolverConfig {
        board: "2c5d7hJsKs".to_string(),
        oop_range: "QQ".to_string(),
        ip_range: "99".to_string(),
        ..SolverConfig::default()
    };
    cfg.discount.alpha = f64::NAN;
    assert!(matches!(cfg.build_solver(), Err(SolverError::InvalidValue(_))));
}
