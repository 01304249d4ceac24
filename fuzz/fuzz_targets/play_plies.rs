#![no_main]
use banchess::config::Config;
use banchess::game::{Game, Phase};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// Feeds arbitrary whitespace-separated plies to a game: rejected input must
// leave the game untouched and accepted input must advance it by one ply.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut game = Game::starting(Config::default());
    for ply in input.split_whitespace() {
        let before = (game.ply(), game.fen(), game.banned_move().cloned());
        match game.play_uci(ply) {
            Ok(_) => assert_eq!(game.ply(), before.0 + 1),
            Err(_) => assert_eq!((game.ply(), game.fen(), game.banned_move().cloned()), before),
        }
        assert_eq!(game.phase(), Phase::from_ply(game.ply()));
        if game.is_ban_phase() {
            assert_eq!(game.banned_move(), None);
        }
    }
});
