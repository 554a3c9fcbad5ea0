//! Integration tests for the Clobber engine
//!
//! Tests the full stack through the public API: game rules, evaluators,
//! alpha-beta search (sequential and root-split), players and matches.

use clobber_core::{
    eval::{mobility, stone_weight},
    play_game, play_match, AlphaBeta, AlphaBetaPlayer, ClobberHeuristic, ClobberMove,
    ClobberState, Connect4State, Evaluator, GameState, GreedyPlayer, Player, RandomPlayer,
    SearchConfig, Side, Status, SystematicPlayer, WIN_VALUE,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// A fixed 20-stone middle-game board
fn twenty_stone_board() -> ClobberState {
    let text = "
        xoxo.x
        o..oxo
        x.xox.
        oxo..o
        x.o..o
    ";
    ClobberState::parse(text, Side::Home, 10).unwrap()
}

/// Reachable positions from random play
fn reachable_positions(seed: u64, count: usize) -> Vec<ClobberState> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut positions = Vec::new();

    while positions.len() < count {
        let mut state = ClobberState::new();
        let plies = rng.gen_range(0..24);
        for _ in 0..plies {
            match state.legal_moves().choose(&mut rng) {
                Some(&mv) => state.apply(mv),
                None => break,
            }
        }
        positions.push(state);
    }

    positions
}

fn search(state: &ClobberState, depth: usize, pruning: bool, seed: u64) -> (f64, u64) {
    let config = SearchConfig::depth_limited(depth).with_pruning(pruning).with_seed(seed);
    let mut engine = AlphaBeta::new(config, ClobberHeuristic::Mobility);
    let result = engine.search(&mut state.clone(), false);
    (result.score(), result.stats.nodes)
}

// ============================================================================
// BOARD PROPERTIES
// ============================================================================

#[test]
fn test_apply_undo_is_identity() {
    for state in reachable_positions(1, 30) {
        let mut board = state.clone();
        for mv in state.legal_moves() {
            let prior = board.who();
            board.apply(mv);
            board.undo(mv, prior);
            assert_eq!(board, state);
        }
    }
}

#[test]
fn test_status_reflects_legal_moves() {
    for state in reachable_positions(2, 60) {
        let home_stuck = !state.has_any_move(Side::Home);
        let away_stuck = !state.has_any_move(Side::Away);
        match state.who() {
            Side::Home => assert_eq!(state.status() == Status::AwayWin, home_stuck),
            Side::Away => assert_eq!(state.status() == Status::HomeWin, away_stuck),
        }
    }
}

#[test]
fn test_mobility_antisymmetric_under_swap() {
    for state in reachable_positions(3, 40) {
        assert_eq!(mobility(&state.swapped()), -mobility(&state));
        assert_eq!(stone_weight(&state.swapped()), -stone_weight(&state));
    }
}

#[test]
fn test_evaluator_is_idempotent() {
    let state = twenty_stone_board();
    for heuristic in [ClobberHeuristic::Mobility, ClobberHeuristic::StoneWeight] {
        assert_eq!(heuristic.evaluate(&state), heuristic.evaluate(&state));
    }
}

// ============================================================================
// SEARCH PROPERTIES
// ============================================================================

#[test]
fn test_two_stone_board_depth_one() {
    let text = "
        ......
        ......
        ..xoo.
        ......
        ......
    ";
    let state = ClobberState::parse(text, Side::Home, 0).unwrap();
    let mut player = AlphaBetaPlayer::clobber(SearchConfig::depth_limited(1).with_seed(1));
    let mv = player.get_move(&state, None).unwrap();
    assert_eq!(mv, ClobberMove::new(2, 2, 2, 3).unwrap());
    assert!(player.last_result().unwrap().score().is_finite());
}

#[test]
fn test_no_legal_moves_gives_no_move() {
    let text = "
        x.....
        ......
        ...o..
        ......
        ......
    ";
    let state = ClobberState::parse(text, Side::Away, 0).unwrap();
    assert_eq!(state.status(), Status::HomeWin);
    let mut player = AlphaBetaPlayer::clobber(SearchConfig::default().with_seed(1));
    assert_eq!(player.get_move(&state, None), None);
}

#[test]
fn test_pruning_matches_unpruned_at_depth_four() {
    let state = twenty_stone_board();
    let (pruned_score, pruned_nodes) = search(&state, 4, true, 11);
    let (full_score, full_nodes) = search(&state, 4, false, 12);
    assert_eq!(pruned_score, full_score);
    assert!(pruned_nodes <= full_nodes);
    assert!(pruned_nodes < full_nodes, "pruning should skip some nodes");
}

#[test]
fn test_pruning_never_exceeds_minimax() {
    for (i, state) in reachable_positions(4, 12).iter().enumerate() {
        let (pruned, _) = search(state, 3, true, i as u64);
        let (full, _) = search(state, 3, false, i as u64);
        assert_eq!(pruned, full, "position {} differs", i);
    }
}

#[test]
fn test_parallel_player_matches_sequential() {
    let state = twenty_stone_board();
    let config = SearchConfig::depth_limited(3).with_seed(21);
    let mut single = AlphaBetaPlayer::clobber(config.clone());
    let mut split = AlphaBetaPlayer::clobber(config.with_threads(4));
    assert_eq!(single.search(&state).score(), split.search(&state).score());
}

#[test]
fn test_seeded_players_are_reproducible() {
    let config = SearchConfig::depth_limited(2).with_seed(99);
    let play = || {
        let mut home = AlphaBetaPlayer::clobber(config.clone());
        let mut away = RandomPlayer::new(Some(5));
        play_game(ClobberState::new(), &mut home, &mut away).moves
    };
    assert_eq!(play(), play());
}

#[test]
fn test_endgame_full_depth_is_exact() {
    let text = "
        xo....
        .x....
        ..oxo.
        ......
        ....xo
    ";
    let state = ClobberState::parse(text, Side::Home, 20).unwrap();
    let mut player = AlphaBetaPlayer::clobber(SearchConfig::default().with_seed(2));
    player.get_move(&state, None);
    let result = player.last_result().unwrap();
    assert!(result.full_depth);
    assert!(result.score() == WIN_VALUE || result.score() == -WIN_VALUE);
    assert_eq!(result.stats.evaluations, 0);
}

// ============================================================================
// MATCHES
// ============================================================================

#[test]
fn test_alpha_beta_beats_random() {
    let mut first = AlphaBetaPlayer::clobber(SearchConfig::depth_limited(2).with_seed(1));
    let mut second = RandomPlayer::new(Some(2));
    let summary = play_match(&ClobberState::new(), &mut first, &mut second, 6, |_, _| {});
    assert_eq!(summary.games, 6);
    assert!(summary.first_wins > summary.second_wins);
}

#[test]
fn test_every_player_finishes_a_game() {
    let mut players: Vec<Box<dyn Player<ClobberState>>> = vec![
        Box::new(AlphaBetaPlayer::clobber(SearchConfig::depth_limited(1).with_seed(1))),
        Box::new(RandomPlayer::new(Some(1))),
        Box::new(SystematicPlayer),
        Box::new(GreedyPlayer::new(Some(1))),
    ];

    for i in 0..players.len() {
        let (left, right) = players.split_at_mut(i + 1);
        let home = left[i].as_mut();
        let away = match right.first_mut() {
            Some(p) => p.as_mut(),
            None => continue,
        };
        let outcome = play_game(ClobberState::new(), home, away);
        assert!(outcome.status.is_terminal());
        assert_eq!(outcome.forfeit, None);
    }
}

#[test]
fn test_connect4_match() {
    let mut first = AlphaBetaPlayer::connect4(SearchConfig::depth_limited(2).with_seed(3));
    let mut second = RandomPlayer::new(Some(4));
    let summary = play_match(&Connect4State::new(), &mut first, &mut second, 2, |_, outcome| {
        assert!(outcome.status.is_terminal());
        assert!(outcome.num_moves() <= 42);
    });
    assert_eq!(summary.games, 2);
    assert_eq!(summary.forfeits, 0);
}
