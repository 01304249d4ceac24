//! Rules of Ban Chess, a chess variant in which every move is preceded by the
//! opponent banning one of the mover's legal moves.
//!
//! The crate does not implement chess itself: board representation, move
//! generation and move application come from the [`rules::Rules`]
//! implementation ([`rules::ShakmatyRules`] by default). On top of it,
//! [`game::Game`] tracks the alternation of ban and move plies, decides which
//! moves may be banned or played and detects checkmate and stalemate,
//! including the mates that are forced by banning the only way out of check.
//!
//! ```
//! use banchess::config::Config;
//! use banchess::game::{Action, Game, Phase, TerminalStatus};
//!
//! let mut game = Game::starting(Config::default());
//! assert_eq!(game.phase(), Phase::Ban);
//! // Black bans 1. e4, White plays 1. d4 instead.
//! assert!(matches!(game.play_uci("e2e4"), Ok(Action::Ban(_))));
//! assert!(matches!(game.play_uci("d2d4"), Ok(Action::Move(_))));
//! assert_eq!(game.ply(), 3);
//! assert_eq!(game.classify().unwrap(), TerminalStatus::Ongoing);
//! ```

// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]

pub mod config;
pub mod game;
pub mod perft;
pub mod rules;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the engine version, author and GitHub repository
/// on engine startup.
pub fn print_engine_info() {
    println!("Ban Chess engine {}", engine_version());
    println!("<{}>", env!("CARGO_PKG_REPOSITORY"));
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
