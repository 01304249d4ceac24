//! Per-game settings. A [`Config`] is handed to [`crate::game::Game::new`] and
//! stays fixed for the lifetime of that game; there is no process-wide variant
//! switch.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// Which set of rules the game follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variant {
    /// Every move is preceded by the opponent banning one of the mover's legal
    /// moves.
    #[default]
    BanChess,
    /// Regular chess: every ply is a move ply and bans are rejected.
    Standard,
}

impl TryFrom<&str> for Variant {
    type Error = anyhow::Error;

    fn try_from(name: &str) -> anyhow::Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "banchess" => Ok(Self::BanChess),
            "chess" | "standard" => Ok(Self::Standard),
            _ => bail!("variant should be 'banchess' or 'chess', got '{name}'"),
        }
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::try_from(s)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BanChess => "banchess",
            Self::Standard => "chess",
        })
    }
}

/// Game settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[allow(missing_docs)]
    pub variant: Variant,
}

impl Config {
    /// Settings for a game of the given variant.
    #[must_use]
    pub const fn new(variant: Variant) -> Self {
        Self { variant }
    }

    /// Whether moves are preceded by bans.
    #[must_use]
    pub const fn bans_enabled(&self) -> bool {
        matches!(self.variant, Variant::BanChess)
    }
}
