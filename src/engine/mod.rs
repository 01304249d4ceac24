//! The engine connects the Ban Chess rules to the outside world: it reads
//! commands from the input stream, drives a [`Game`] and reports back to the
//! output stream. The protocol is a small UCI subset extended with Ban Chess
//! commands (`ban`, `move`, `candidates`, `status`, `d`, `perft`).
//!
//! [`Engine::uci_loop`] is the "main loop" of the engine.

use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::config::Config;
use crate::engine::uci::{Command, EngineOption, OptionValue};
use crate::game::Game;
use crate::perft::divide;
use crate::rules::Rules;

mod uci;

/// The Engine handles commands sent by the client, including I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    game: Game,
    /// Settings for the next game. Changing them does not affect the game in
    /// progress.
    config: Config,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with a Ban Chess game from the
    /// starting position and provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        let config = Config::default();
        Self {
            game: Game::starting(config),
            config,
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes commands until "quit"
    /// is sent or the input is closed.
    ///
    /// Invalid commands, positions and actions are reported as `info string`
    /// lines and skipped; they never change the game.
    ///
    /// # Errors
    ///
    /// Fails only when reading the input or writing the output fails.
    pub fn uci_loop(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            match Command::parse(&line) {
                Command::Uci => self.handle_uci()?,
                Command::IsReady => self.handle_isready()?,
                Command::SetOption { option, value } => self.handle_setoption(&option, value)?,
                Command::SetPosition { fen, moves } => self.handle_position(fen.as_deref(), &moves)?,
                Command::NewGame => self.handle_ucinewgame(),
                Command::Ban(banned) => self.handle_ban(&banned)?,
                Command::Move(next_move) => self.handle_move(&next_move)?,
                Command::Candidates => self.handle_candidates()?,
                Command::Status => self.handle_status()?,
                Command::Display => self.handle_display()?,
                Command::Perft { depth } => self.handle_perft(depth)?,
                Command::Quit => break,
                Command::Unknown(command) => writeln!(
                    self.output,
                    "info string Unsupported command: {}",
                    command.trim()
                )?,
            }
        }
        Ok(())
    }

    /// Responds to the `uci` handshake command by identifying the engine and
    /// listing the supported options.
    fn handle_uci(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(
            self.output,
            "option name UCI_Variant type combo default banchess var banchess var chess"
        )?;
        writeln!(self.output, "uciok")?;
        Ok(())
    }

    /// Syncs with the client by responding with `readyok`.
    fn handle_isready(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "readyok")?;
        Ok(())
    }

    /// Updates the settings used for the next game (`ucinewgame` or
    /// `position`).
    fn handle_setoption(&mut self, option: &EngineOption, value: OptionValue) -> anyhow::Result<()> {
        match (option, value) {
            (EngineOption::Variant, OptionValue::Variant(variant)) => {
                self.config = Config::new(variant);
                writeln!(
                    self.output,
                    "info string UCI_Variant set to {variant} for the next game"
                )?;
            },
        }
        Ok(())
    }

    fn handle_ucinewgame(&mut self) {
        self.game = Game::starting(self.config);
    }

    /// Starts a new game from the given position and replays the plies. The
    /// game in progress is only replaced when the whole command is valid.
    fn handle_position(&mut self, fen: Option<&str>, moves: &[String]) -> anyhow::Result<()> {
        let mut game = match fen {
            None => Game::starting(self.config),
            Some(fen) => match Game::from_fen(self.config, fen) {
                Ok(game) => game,
                Err(e) => {
                    writeln!(self.output, "info string {e}")?;
                    return Ok(());
                },
            },
        };
        for next in moves {
            if let Err(e) = game.play_uci(next) {
                writeln!(
                    self.output,
                    "info string Can not replay ply {} ({next}): {e:#}",
                    game.ply()
                )?;
                return Ok(());
            }
        }
        self.game = game;
        Ok(())
    }

    fn handle_ban(&mut self, input: &str) -> anyhow::Result<()> {
        let banned = self.game.rules().parse_move(
            self.game.position(),
            self.game.side_to_move(),
            input,
        );
        let result = match banned {
            Ok(banned) => self.game.submit_ban(banned).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            writeln!(self.output, "info string Rejected ban {input}: {e}")?;
        }
        Ok(())
    }

    fn handle_move(&mut self, input: &str) -> anyhow::Result<()> {
        let next_move = self.game.rules().parse_move(
            self.game.position(),
            self.game.side_to_move(),
            input,
        );
        let result = match next_move {
            Ok(next_move) => self.game.submit_move(next_move).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            writeln!(self.output, "info string Rejected move {input}: {e}")?;
        }
        Ok(())
    }

    /// Lists the current candidates in UCI notation, sorted.
    fn handle_candidates(&mut self) -> anyhow::Result<()> {
        match self.game.legal_candidates() {
            Ok(candidates) => {
                let rules = self.game.rules();
                writeln!(
                    self.output,
                    "candidates {} {}",
                    self.game.phase(),
                    candidates
                        .iter()
                        .map(|m| rules.move_to_uci(m))
                        .sorted()
                        .join(" ")
                )?;
            },
            Err(e) => writeln!(self.output, "info string {e}")?,
        }
        Ok(())
    }

    fn handle_status(&mut self) -> anyhow::Result<()> {
        let result = match self.game.classify() {
            Ok(status) => status.to_string(),
            Err(e) => {
                writeln!(self.output, "info string {e}")?;
                return Ok(());
            },
        };
        let banned = self
            .game
            .banned_move()
            .map_or_else(|| "-".to_string(), |m| self.game.rules().move_to_uci(m));
        writeln!(
            self.output,
            "status ply {} phase {} actor {} banned {} result {}",
            self.game.ply(),
            self.game.phase(),
            self.game.actor(),
            banned,
            result
        )?;
        Ok(())
    }

    fn handle_display(&mut self) -> anyhow::Result<()> {
        let rules = self.game.rules();
        writeln!(self.output, "fen {}", self.game.fen())?;
        writeln!(self.output, "variant {}", self.game.config().variant)?;
        writeln!(
            self.output,
            "plies {}",
            self.game
                .history()
                .iter()
                .map(|action| rules.move_to_uci(action.chess_move()))
                .join(" ")
        )?;
        self.handle_status()
    }

    /// Prints the number of leaves under every candidate followed by the total.
    fn handle_perft(&mut self, depth: u8) -> anyhow::Result<()> {
        if depth == 0 {
            writeln!(self.output, "nodes 1")?;
            return Ok(());
        }
        match divide(&self.game, depth) {
            Ok(split) => {
                let mut nodes = 0;
                for (first, count) in split {
                    writeln!(self.output, "{first}: {count}")?;
                    nodes += count;
                }
                writeln!(self.output, "nodes {nodes}")?;
            },
            Err(e) => writeln!(self.output, "info string {e}")?,
        }
        Ok(())
    }
}
