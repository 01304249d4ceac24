//! [Perft] (*per*formance *t*esting) adapted to Ban Chess: every ply is either
//! a ban or a move, so a full traditional move corresponds to two levels of the
//! tree. It exercises candidate generation, bans and move application together
//! and is the main tool for checking the state machine over many reachable
//! states.
//!
//! With [`crate::config::Variant::Standard`] the counts are the regular chess
//! perft numbers.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::game::{Action, Game};
use crate::rules::Rules;

/// Counts the leaf nodes of the ply tree of the given depth. Finished games
/// have no children: a ban phase without candidates (the side about to move is
/// already mated or stalemated) and a move phase without candidates both stop
/// the branch.
///
/// # Errors
///
/// Propagates failures of the rules implementation.
pub fn perft<R: Rules + Clone>(game: &Game<R>, depth: u8) -> anyhow::Result<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let candidates = game.legal_candidates()?;
    if depth == 1 {
        return Ok(candidates.len() as u64);
    }
    let phase = game.phase();
    let mut nodes = 0;
    for candidate in candidates {
        let mut next = game.clone();
        next.submit(Action::for_phase(phase, candidate))?;
        nodes += perft(&next, depth - 1)?;
    }
    Ok(nodes)
}

/// Perft split by the first ply: the number of leaf nodes under each of the
/// current candidates, in UCI notation. Handy for finding the exact branch on
/// which two implementations disagree.
///
/// # Errors
///
/// Propagates failures of the rules implementation.
pub fn divide<R: Rules + Clone>(game: &Game<R>, depth: u8) -> anyhow::Result<Vec<(String, u64)>> {
    let phase = game.phase();
    let mut result = Vec::new();
    for candidate in game.legal_candidates()? {
        let notation = game.rules().move_to_uci(&candidate);
        let mut next = game.clone();
        next.submit(Action::for_phase(phase, candidate))?;
        let nodes = perft(&next, depth.saturating_sub(1))?;
        result.push((notation, nodes));
    }
    Ok(result)
}
