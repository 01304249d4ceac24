//! Parsing of the line-based protocol understood by [`crate::Engine`].
//!
//! The command set is a small subset of the [Universal Chess Interface] (`uci`,
//! `isready`, `setoption`, `ucinewgame`, `position`, `quit`) extended with the
//! commands needed to drive a Ban Chess game by hand or from a test harness:
//!
//! - `ban <move>`: ban a move of the side about to move.
//! - `move <move>`: play a move.
//! - `candidates`: list the moves the acting player can choose from.
//! - `status`: ply, phase, acting player, active ban and game result.
//! - `d`: print the current game.
//! - `perft <depth>`: count the ply tree leaves.
//!
//! In `position ... moves ...` the moves are plies: bans and moves alternate
//! the same way they do in the game (`position startpos moves e2e4 d2d4` bans
//! 1. e4 and plays 1. d4 instead).
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI

use crate::config::Variant;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    Uci,
    IsReady,
    SetOption {
        option: EngineOption,
        value: OptionValue,
    },
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    NewGame,
    Ban(String),
    Move(String),
    Candidates,
    Status,
    Display,
    Perft {
        depth: u8,
    },
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum EngineOption {
    Variant,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum OptionValue {
    Variant(Variant),
}

fn parse_setoption(parts: &[&str]) -> Command {
    if parts.len() > 3 && parts[1] == "name" {
        let name_end = parts
            .iter()
            .position(|&x| x == "value")
            .unwrap_or(parts.len());
        let option = parts[2..name_end].join(" ");
        let option = match option.as_str() {
            "UCI_Variant" => EngineOption::Variant,
            _ => return Command::Unknown(parts.join(" ")),
        };
        let value = if name_end + 1 < parts.len() {
            match option {
                EngineOption::Variant => parts[name_end + 1]
                    .parse::<Variant>()
                    .ok()
                    .map(OptionValue::Variant),
            }
        } else {
            None
        };
        if let Some(value) = value {
            Command::SetOption { option, value }
        } else {
            Command::Unknown(parts.join(" "))
        }
    } else {
        Command::Unknown(parts.join(" "))
    }
}

fn parse_setposition(parts: &[&str]) -> Command {
    let fen_index = parts.iter().position(|&x| x == "fen");
    let moves_index = parts.iter().position(|&x| x == "moves");
    // The FEN, if any, must come before the plies.
    if let (Some(fen_index), Some(moves_index)) = (fen_index, moves_index) {
        if moves_index < fen_index {
            return Command::Unknown(parts.join(" "));
        }
    }
    let fen = fen_index.map(|index| parts[index + 1..moves_index.unwrap_or(parts.len())].join(" "));
    let moves = moves_index.map_or_else(Vec::new, |moves_index| {
        parts[moves_index + 1..]
            .iter()
            .map(ToString::to_string)
            .collect()
    });
    Command::SetPosition { fen, moves }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return Self::Unknown(input.to_string());
        }

        match parts[0] {
            "uci" => Self::Uci,
            "isready" => Self::IsReady,
            "setoption" => parse_setoption(&parts),
            "position" => parse_setposition(&parts),
            "ucinewgame" => Self::NewGame,
            "ban" if parts.len() == 2 => Self::Ban(parts[1].to_string()),
            "move" if parts.len() == 2 => Self::Move(parts[1].to_string()),
            "candidates" => Self::Candidates,
            "status" => Self::Status,
            "d" => Self::Display,
            "perft" if parts.len() == 2 => parts[1]
                .parse()
                .map_or_else(|_| Self::Unknown(input.to_string()), |depth| Self::Perft {
                    depth,
                }),
            "quit" => Self::Quit,
            _ => Self::Unknown(input.to_string()),
        }
    }
}
