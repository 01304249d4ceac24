use banchess::config::Config;
use banchess::game::{Action, BanError, Game, MoveError, Phase, TerminalStatus};
use banchess::perft::perft;
use banchess::rules::{Player, Rules};
use itertools::Itertools;
use pretty_assertions::assert_eq;

fn candidates(game: &Game) -> Vec<String> {
    game.legal_candidates()
        .expect("shakmaty generates moves for the side to move")
        .iter()
        .map(|m| game.rules().move_to_uci(m))
        .sorted()
        .collect()
}

fn parse(game: &Game, input: &str) -> shakmaty::Move {
    game.rules()
        .parse_move(game.position(), game.side_to_move(), input)
        .expect("test moves are legal for the side to move")
}

/// Plays the given plies (bans and moves alternating) from the starting
/// position.
fn replay(plies: &[&str]) -> Game {
    let mut game = Game::starting(Config::default());
    for ply in plies {
        let _ = game
            .play_uci(ply)
            .unwrap_or_else(|e| panic!("ply {ply} should be accepted: {e:#}"));
    }
    game
}

/// Snapshot of everything an action could change.
fn snapshot(game: &Game) -> (u32, Option<String>, String, usize) {
    (
        game.ply(),
        game.banned_move().map(|m| game.rules().move_to_uci(m)),
        game.fen(),
        game.history().len(),
    )
}

#[test]
fn phase_follows_ply_parity() {
    let mut game = Game::starting(Config::default());
    let plies = [
        "d2d4", "e2e4", "d7d5", "e7e5", "g1f3", "d2d4", "b8c6", "g8f6", "f1c4", "f1b5",
    ];
    for ply in plies {
        assert_eq!(game.phase(), Phase::from_ply(game.ply()));
        assert_eq!(game.is_ban_phase(), game.ply() % 2 == 1);
        assert_eq!(game.is_move_phase(), game.ply() % 2 == 0);
        let before = game.ply();
        let _ = game.play_uci(ply).unwrap();
        assert_eq!(game.ply(), before + 1);
    }
    assert_eq!(game.ply(), 11);
    assert_eq!(game.phase(), Phase::Ban);
}

#[test]
fn phase_follows_ply_parity_on_every_reachable_state() {
    // Walk the full tree to depth 4 and check the invariants in every node.
    fn walk(game: &Game, depth: u8) {
        assert_eq!(game.phase(), Phase::from_ply(game.ply()));
        if game.is_ban_phase() {
            assert_eq!(game.banned_move(), None);
            assert_eq!(game.actor(), !game.side_to_move());
        } else {
            assert!(game.banned_move().is_some());
            assert_eq!(game.actor(), game.side_to_move());
        }
        if depth == 0 {
            return;
        }
        for candidate in game.legal_candidates().unwrap() {
            let mut next = game.clone();
            next.submit(Action::for_phase(game.phase(), candidate))
                .unwrap();
            assert_eq!(next.ply(), game.ply() + 1);
            walk(&next, depth - 1);
        }
    }
    walk(&Game::starting(Config::default()), 3);
}

#[test]
fn classify_is_idempotent() {
    let games = [
        Game::starting(Config::default()),
        replay(&["e2e4", "d2d4"]),
        Game::from_fen(Config::default(), "k7/3N4/1K6/8/8/8/8/8 b - - 0 1").unwrap(),
    ];
    for game in &games {
        let first = game.classify().unwrap();
        for _ in 0..3 {
            assert_eq!(game.classify().unwrap(), first);
        }
    }
}

#[test]
fn ban_is_excluded_then_cleared() {
    let mut game = Game::starting(Config::default());
    for banned in ["e2e4", "g1f3", "b1c3"] {
        let mut attempt = game.clone();
        attempt.submit_ban(parse(&attempt, banned)).unwrap();
        assert!(!candidates(&attempt).contains(&banned.to_string()));
        assert_eq!(candidates(&attempt).len(), 19);
    }

    game.submit_ban(parse(&game, "e2e4")).unwrap();
    let ply = game.ply();
    assert_eq!(ply % 2, 0);
    game.submit_move(parse(&game, "c2c4")).unwrap();
    assert_eq!(game.ply(), ply + 1);
    assert_eq!(game.banned_move(), None);
    // Black's moves are unrestricted for the next ban.
    assert_eq!(candidates(&game).len(), 20);
}

#[test]
fn forced_mate_by_ban() {
    // 1. e4 e6 2. Qh5 a5 3. Qxf7+ with a ban before every move.
    let mut game = replay(&[
        "d2d4", "e2e4", // 1. e4
        "d7d5", "e7e6", // 1... e6
        "a2a3", "d1h5", // 2. Qh5
        "b7b6", "a7a5", // 2... a5
        "h5h6", "h5f7", // 3. Qxf7+
    ]);
    assert_eq!(game.ply(), 11);
    assert_eq!(game.phase(), Phase::Ban);
    assert_eq!(game.side_to_move(), Player::Black);
    assert_eq!(game.actor(), Player::White);
    // Black has a single reply, White is about to ban it.
    assert_eq!(candidates(&game), vec!["e8f7"]);
    assert_eq!(game.classify().unwrap(), TerminalStatus::Checkmate);

    game.submit_ban(parse(&game, "e8f7")).unwrap();
    assert_eq!(game.phase(), Phase::Move);
    assert!(candidates(&game).is_empty());
    assert_eq!(game.classify().unwrap(), TerminalStatus::Checkmate);
    assert!(game.is_over().unwrap());
}

#[test]
fn single_reply_in_standard_chess_is_not_mate() {
    let game = Game::from_fen(
        Config::new(banchess::config::Variant::Standard),
        "rnbqkbnr/1ppp1Qpp/4p3/p7/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 0 3",
    )
    .unwrap();
    assert_eq!(candidates(&game), vec!["e8f7"]);
    assert_eq!(game.classify().unwrap(), TerminalStatus::Ongoing);
}

#[test]
fn ban_on_side_with_two_replies() {
    let mut game = Game::from_fen(Config::default(), "k7/3N3p/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(game.phase(), Phase::Ban);
    assert_eq!(candidates(&game), vec!["h7h5", "h7h6"]);
    assert_eq!(game.classify().unwrap(), TerminalStatus::Ongoing);

    game.submit_ban(parse(&game, "h7h5")).unwrap();
    assert_eq!(candidates(&game), vec!["h7h6"]);
    assert_eq!(game.classify().unwrap(), TerminalStatus::Ongoing);
}

#[test]
fn single_reply_without_check_is_ongoing() {
    let mut game = Game::from_fen(Config::default(), "k7/3N3p/1K6/7P/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(candidates(&game), vec!["h7h6"]);
    assert_eq!(game.classify().unwrap(), TerminalStatus::Ongoing);

    // Banning the only move leaves Black without moves, but not in check.
    game.submit_ban(parse(&game, "h7h6")).unwrap();
    assert!(candidates(&game).is_empty());
    assert_eq!(game.classify().unwrap(), TerminalStatus::Stalemate);
}

#[test]
fn stalemate_independent_of_ban() {
    let mut game = Game::from_fen(Config::default(), "k7/3N4/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(game.phase(), Phase::Ban);
    assert!(candidates(&game).is_empty());
    assert_eq!(game.classify().unwrap(), TerminalStatus::Stalemate);

    // There is nothing to ban.
    let white_move = game
        .rules()
        .parse_move(game.position(), Player::White, "b6b5")
        .unwrap();
    assert!(matches!(
        game.submit_ban(white_move),
        Err(BanError::IllegalBan(_))
    ));
    assert_eq!(game.ply(), 1);
}

#[test]
fn checkmate_independent_of_ban() {
    let game = Game::from_fen(Config::default(), "k7/1Q6/1K6/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(game.phase(), Phase::Ban);
    assert!(candidates(&game).is_empty());
    assert_eq!(game.classify().unwrap(), TerminalStatus::Checkmate);
}

#[test]
fn two_replies_in_check_is_ongoing() {
    // Black king on a8 is checked by the rook on a1 and can go to b7 or b8.
    let game = Game::from_fen(Config::default(), "k7/8/8/8/8/8/8/R6K b - - 0 1").unwrap();
    assert_eq!(candidates(&game), vec!["a8b7", "a8b8"]);
    assert_eq!(game.classify().unwrap(), TerminalStatus::Ongoing);
}

#[test]
fn invalid_phase_leaves_state_unchanged() {
    let mut game = Game::starting(Config::default());
    let before = snapshot(&game);
    let e4 = parse(&game, "e2e4");
    assert!(matches!(
        game.submit_move(e4.clone()),
        Err(MoveError::InvalidPhase)
    ));
    assert_eq!(snapshot(&game), before);

    game.submit_ban(e4).unwrap();
    let before = snapshot(&game);
    assert!(matches!(
        game.submit_ban(parse(&game, "d2d4")),
        Err(BanError::InvalidPhase)
    ));
    assert_eq!(snapshot(&game), before);
}

#[test]
fn illegal_ban_leaves_state_unchanged() {
    let mut game = replay(&["e2e4", "d2d4"]);
    let before = snapshot(&game);
    // White's own move can not be banned by White.
    let white_move = game
        .rules()
        .parse_move(game.position(), Player::White, "c2c4")
        .unwrap();
    assert!(matches!(
        game.submit_ban(white_move),
        Err(BanError::IllegalBan(banned)) if banned == "c2c4"
    ));
    assert_eq!(snapshot(&game), before);
    assert!(game.play_uci("e7e4").is_err());
    assert_eq!(snapshot(&game), before);
}

#[test]
fn illegal_move_leaves_state_unchanged() {
    let mut game = replay(&["e2e4"]);
    let before = snapshot(&game);
    let banned = parse(&game, "e2e4");
    assert!(matches!(
        game.submit_move(banned),
        Err(MoveError::IllegalMove(_))
    ));
    assert_eq!(snapshot(&game), before);
}

#[test]
fn move_of_wrong_side_is_rejected() {
    let mut game = replay(&["e2e4"]);
    let before = snapshot(&game);
    // White is to move, Black's reply is not a candidate.
    let black_move = game
        .rules()
        .parse_move(game.position(), Player::Black, "e7e5")
        .unwrap();
    assert!(matches!(
        game.submit_move(black_move),
        Err(MoveError::IllegalMove(played)) if played == "e7e5"
    ));
    assert_eq!(snapshot(&game), before);
}

#[test]
fn perft_counts_plies() {
    let game = Game::starting(Config::default());
    assert_eq!(perft(&game, 4).unwrap(), 20 * 19 * 20 * 19);
}
