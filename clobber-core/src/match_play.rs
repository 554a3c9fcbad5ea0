//! Match harness: drives two players over an authoritative board
//!
//! The harness owns the real game state. It asks the side to move for a
//! move, validates it with `make_move` and relays its text to the next
//! player. A missing or illegal move forfeits the game.

use serde::Serialize;

use crate::game::{GameState, Side, Status};
use crate::player::Player;

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// Final status; a forfeit is scored as a win for the opponent
    pub status: Status,
    /// Move history in text notation
    pub moves: Vec<String>,
    /// Side that failed to produce a legal move
    pub forfeit: Option<Side>,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Side> {
        self.status.winner()
    }

    pub fn is_draw(&self) -> bool {
        self.status == Status::Draw
    }

    pub fn num_moves(&self) -> usize {
        self.moves.len()
    }
}

/// Play one game from `initial` to a terminal status or a forfeit
pub fn play_game<'a, G: GameState>(
    initial: G,
    home: &'a mut dyn Player<G>,
    away: &'a mut dyn Player<G>,
) -> GameOutcome {
    home.start_game();
    away.start_game();

    let mut state = initial;
    let mut moves: Vec<String> = Vec::new();

    while !state.status().is_terminal() {
        let side = state.who();
        let player = match side {
            Side::Home => &mut *home,
            Side::Away => &mut *away,
        };

        let last = moves.last().map(String::as_str);
        let Some(mv) = player.get_move(&state, last) else {
            tracing::warn!(player = player.name(), %side, "no move offered, forfeit");
            return forfeit(side, moves);
        };

        if let Err(err) = state.make_move(mv) {
            tracing::warn!(player = player.name(), %side, %err, "illegal move, forfeit");
            return forfeit(side, moves);
        }
        moves.push(mv.to_string());
    }

    GameOutcome {
        status: state.status(),
        moves,
        forfeit: None,
    }
}

fn forfeit(side: Side, moves: Vec<String>) -> GameOutcome {
    GameOutcome {
        status: side.opponent().win_status(),
        moves,
        forfeit: Some(side),
    }
}

// ============================================================================
// MATCHES
// ============================================================================

/// Aggregate results of a match between two players
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    pub games: u32,
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
    pub forfeits: u32,
    pub total_moves: u64,
}

impl MatchSummary {
    /// Count one game; `first_was_home` says which colour the first player had
    pub fn record(&mut self, outcome: &GameOutcome, first_was_home: bool) {
        self.games += 1;
        self.total_moves += outcome.num_moves() as u64;
        if outcome.forfeit.is_some() {
            self.forfeits += 1;
        }
        match outcome.winner() {
            Some(side) if (side == Side::Home) == first_was_home => self.first_wins += 1,
            Some(_) => self.second_wins += 1,
            None => self.draws += 1,
        }
    }

    pub fn first_win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.first_wins as f64 / self.games as f64
    }

    pub fn average_length(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games as f64
    }
}

/// Play `games` games, swapping colours every game (first player is HOME in
/// even-numbered games). `on_game` sees each outcome as it finishes.
pub fn play_match<G, F>(
    initial: &G,
    first: &mut dyn Player<G>,
    second: &mut dyn Player<G>,
    games: u32,
    mut on_game: F,
) -> MatchSummary
where
    G: GameState,
    F: FnMut(u32, &GameOutcome),
{
    let mut summary = MatchSummary::default();

    for game in 0..games {
        let first_is_home = game % 2 == 0;
        let outcome = if first_is_home {
            play_game(initial.clone(), &mut *first, &mut *second)
        } else {
            play_game(initial.clone(), &mut *second, &mut *first)
        };
        summary.record(&outcome, first_is_home);
        on_game(game, &outcome);
    }

    tracing::info!(
        games = summary.games,
        first = first.name(),
        first_wins = summary.first_wins,
        second = second.name(),
        second_wins = summary.second_wins,
        draws = summary.draws,
        "match finished"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clobber::{ClobberMove, ClobberState};
    use crate::config::SearchConfig;
    use crate::connect4::{Connect4Move, Connect4State};
    use crate::player::{AlphaBetaPlayer, GreedyPlayer, RandomPlayer, SystematicPlayer};

    /// Always answers with the same move
    struct Stubborn(Option<ClobberMove>);

    impl Player<ClobberState> for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn get_move(&mut self, _state: &ClobberState, _last: Option<&str>) -> Option<ClobberMove> {
            self.0
        }
    }

    #[test]
    fn test_random_game_reaches_terminal() {
        let mut home = RandomPlayer::new(Some(1));
        let mut away = RandomPlayer::new(Some(2));
        let outcome = play_game(ClobberState::new(), &mut home, &mut away);
        assert!(outcome.status.is_terminal());
        assert!(outcome.winner().is_some());
        assert_eq!(outcome.forfeit, None);
        assert!(outcome.num_moves() > 0);
    }

    #[test]
    fn test_move_history_replays() {
        let mut home = SystematicPlayer;
        let mut away = GreedyPlayer::new(Some(3));
        let outcome = play_game(ClobberState::new(), &mut home, &mut away);

        let mut replay = ClobberState::new();
        for text in &outcome.moves {
            let mv: ClobberMove = text.parse().unwrap();
            replay.make_move(mv).unwrap();
        }
        assert_eq!(replay.status(), outcome.status);
    }

    #[test]
    fn test_no_move_forfeits() {
        let mut home = Stubborn(None);
        let mut away = RandomPlayer::new(Some(1));
        let outcome = play_game(ClobberState::new(), &mut home, &mut away);
        assert_eq!(outcome.forfeit, Some(Side::Home));
        assert_eq!(outcome.status, Status::AwayWin);
        assert!(outcome.moves.is_empty());
    }

    #[test]
    fn test_illegal_move_forfeits() {
        // (0, 1) holds an AWAY stone at the start
        let mut home = Stubborn(Some(ClobberMove::new(0, 1, 0, 2).unwrap()));
        let mut away = RandomPlayer::new(Some(1));
        let outcome = play_game(ClobberState::new(), &mut home, &mut away);
        assert_eq!(outcome.forfeit, Some(Side::Home));
        assert_eq!(outcome.winner(), Some(Side::Away));
    }

    #[test]
    fn test_players_borrowed_for_different_scopes() {
        let mut away = GreedyPlayer::new(Some(5));
        let away: &mut dyn Player<ClobberState> = &mut away;
        let outcome = {
            let mut home = SystematicPlayer;
            play_game(ClobberState::new(), &mut home, away)
        };
        assert!(outcome.status.is_terminal());
        assert_eq!(outcome.forfeit, None);
    }

    #[test]
    fn test_unchecked_capture_forfeits() {
        // Non-adjacent cells, built without ClobberMove::new
        let far = ClobberMove { row1: 0, col1: 0, row2: 4, col2: 5 };
        let mut home = Stubborn(Some(far));
        let mut away = RandomPlayer::new(Some(1));
        let outcome = play_game(ClobberState::new(), &mut home, &mut away);
        assert_eq!(outcome.forfeit, Some(Side::Home));
        assert!(outcome.moves.is_empty());
    }

    #[test]
    fn test_connect4_game() {
        let mut home = AlphaBetaPlayer::connect4(SearchConfig::depth_limited(3).with_seed(1));
        let mut away = RandomPlayer::new(Some(7));
        let outcome = play_game(Connect4State::new(), &mut home, &mut away);
        assert!(outcome.status.is_terminal());
        assert!(outcome.num_moves() <= 42);
        assert!(outcome.moves.iter().all(|m| m.parse::<Connect4Move>().is_ok()));
    }

    #[test]
    fn test_summary_record() {
        let win = |status| GameOutcome {
            status,
            moves: vec!["0".into(); 3],
            forfeit: None,
        };
        let mut summary = MatchSummary::default();
        summary.record(&win(Status::HomeWin), true);
        summary.record(&win(Status::HomeWin), false);
        summary.record(&win(Status::AwayWin), false);
        summary.record(&win(Status::Draw), true);
        assert_eq!(summary.games, 4);
        assert_eq!(summary.first_wins, 2);
        assert_eq!(summary.second_wins, 1);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.total_moves, 12);
        assert_eq!(summary.first_win_rate(), 0.5);
    }

    #[test]
    fn test_match_alternates_colours() {
        let mut first = RandomPlayer::new(Some(1));
        let mut second = RandomPlayer::new(Some(2));
        let mut homes = Vec::new();
        let summary = play_match(&ClobberState::new(), &mut first, &mut second, 4, |game, outcome| {
            homes.push(game % 2 == 0);
            assert!(outcome.status.is_terminal());
        });
        assert_eq!(homes, vec![true, false, true, false]);
        assert_eq!(summary.games, 4);
        assert_eq!(summary.first_wins + summary.second_wins, 4);
    }
}
