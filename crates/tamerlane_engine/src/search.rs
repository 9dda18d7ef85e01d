//! Minimax search with alpha-beta pruning and a capture-only quiescence
//! extension.
//!
//! The search mutates a single board in place and undoes every move
//! exactly before returning, so the caller's board is untouched. White is
//! the maximizing side throughout.

use log::debug;
use rand::Rng;
use thiserror::Error;

use tamerlane_core::rules::{self, RulesError};
use tamerlane_core::{Board, Color, Turn};

use crate::evaluation;

// Inner nodes only look at the most promising few moves.
const MAX_MOVES_PER_NODE: usize = 5;
// Quiescence recursion bound.
pub const QUIESCENCE_MAX_PLY: u8 = 3;
// Two scores within this distance of each other, after rounding to two
// decimals, are a tie.
const TIE_EPSILON: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The side to move has no legal moves at the search root. Terminal
    /// detection belongs to the caller; reaching the search in a finished
    /// position is a bug, so it fails loudly instead of inventing a move.
    #[error("no legal moves for {0} at the search root")]
    NoLegalMoves(Color),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

fn round_to_two_decimals(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn rounded_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < TIE_EPSILON
}

/// Stable partition: captures in front, quiet moves behind, original
/// order preserved within each group.
fn order_captures_first(moves: &mut [Turn]) {
    moves.sort_by_key(|turn| !turn.is_capture());
}

/// Root search. Returns the best move for `player` with its unrounded
/// score; ties at two-decimal resolution are broken uniformly at random
/// with the injected `rng`, so a seeded generator replays exactly.
#[allow(clippy::too_many_arguments)]
pub fn minmax(
    board: &mut Board,
    player: Color,
    turn_number: u32,
    alt: bool,
    depth: u8,
    mut alpha: f32,
    mut beta: f32,
    rng: &mut impl Rng,
) -> Result<Turn, SearchError> {
    let mut moves = rules::legal_turns(board, player, turn_number, alt)?;
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves(player));
    }
    order_captures_first(&mut moves);

    let maximizing = player == Color::White;
    let mut best_rounded = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };
    let mut best_value = best_rounded;
    let mut best_moves: Vec<Turn> = Vec::new();

    for turn in &moves {
        board.apply(turn);
        let value = if depth <= 1 {
            evaluation::evaluate_board(board)?
        } else {
            minmax_helper(
                board,
                player.opponent(),
                turn_number + 1,
                alt,
                depth - 1,
                alpha,
                beta,
            )?
        };
        board.undo(turn);

        let rounded = round_to_two_decimals(value);
        let improves = if maximizing {
            rounded > best_rounded
        } else {
            rounded < best_rounded
        };
        if improves {
            best_rounded = rounded;
            best_value = value;
            best_moves.clear();
            best_moves.push(*turn);
        } else if rounded_equal(rounded, best_rounded) {
            best_moves.push(*turn);
        }

        if maximizing {
            alpha = alpha.max(value);
        } else {
            beta = beta.min(value);
        }
        if beta <= alpha {
            break;
        }
    }

    if best_moves.is_empty() {
        // Every line scored at infinity (forced loss); any move does.
        best_moves.push(moves[0]);
    }
    let mut chosen = best_moves[rng.gen_range(0..best_moves.len())];
    chosen.score = best_value;
    debug!(
        "search depth {} for {}: {} root moves, {} tied at {:.2}",
        depth,
        player,
        moves.len(),
        best_moves.len(),
        best_rounded,
    );
    Ok(chosen)
}

/// Recursive minimax value of the current position for the side to move.
fn minmax_helper(
    board: &mut Board,
    player: Color,
    turn_number: u32,
    alt: bool,
    depth: u8,
    mut alpha: f32,
    mut beta: f32,
) -> Result<f32, SearchError> {
    if depth == 0 {
        return Ok(evaluation::evaluate_board(board)?);
    }

    let maximizing = player == Color::White;
    let mut best_value = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };

    let mut moves = rules::legal_turns(board, player, turn_number, alt)?;
    order_captures_first(&mut moves);

    for turn in moves.iter().take(MAX_MOVES_PER_NODE) {
        board.apply(turn);
        let value = minmax_helper(
            board,
            player.opponent(),
            turn_number + 1,
            alt,
            depth - 1,
            alpha,
            beta,
        )?;
        board.undo(turn);

        if maximizing {
            best_value = best_value.max(value);
            alpha = alpha.max(best_value);
        } else {
            best_value = best_value.min(value);
            beta = beta.min(best_value);
        }
        if beta <= alpha {
            break;
        }
    }

    Ok(best_value)
}

/// Capture-only search that stabilizes a leaf evaluation against
/// mid-exchange positions: stand pat against the window, then try each
/// capture in negamax convention down to `max_ply`.
pub fn quiescence(
    board: &mut Board,
    player: Color,
    mut alpha: f32,
    mut beta: f32,
    max_ply: u8,
) -> Result<f32, SearchError> {
    let stand_pat = evaluation::evaluate_board(board)?;

    if player == Color::White {
        alpha = alpha.max(stand_pat);
    } else {
        beta = beta.min(stand_pat);
    }
    if beta <= alpha {
        return Ok(stand_pat);
    }
    if max_ply == 0 {
        return Ok(stand_pat);
    }

    for capture in capture_turns(board, player)? {
        board.apply(&capture);
        let score = -quiescence(board, player.opponent(), -beta, -alpha, max_ply - 1)?;
        board.undo(&capture);

        if score >= beta {
            return Ok(beta);
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(alpha)
}

/// The legal capture moves for `player`, under the base ruleset.
pub fn capture_turns(board: &mut Board, player: Color) -> Result<Vec<Turn>, SearchError> {
    let turns = rules::legal_turns(board, player, 0, false)?;
    Ok(turns.into_iter().filter(Turn::is_capture).collect())
}
