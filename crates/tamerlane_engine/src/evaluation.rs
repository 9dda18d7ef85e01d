//! Static board evaluation: material plus positional heuristics.
//!
//! Scores are in pawn units, positive for white. Every positional term is
//! computed as a positive magnitude and negated for black pieces before it
//! is summed into the total.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use tamerlane_core::movegen;
use tamerlane_core::rules::{self, RulesError};
use tamerlane_core::{Board, Cell, Color, Piece, PieceKind, Square};

// Material values in pawn units.
static PIECE_VALUES: Lazy<HashMap<PieceKind, f32>> = Lazy::new(|| {
    HashMap::from([
        (PieceKind::Khan, 3.5),
        (PieceKind::Pawn, 1.0),
        (PieceKind::Mongol, 3.0),
        (PieceKind::Camel, 2.0),
        (PieceKind::Giraffe, 4.0),
        (PieceKind::Rook, 5.0),
        (PieceKind::Talia, 2.5),
        (PieceKind::Elephant, 1.5),
        (PieceKind::WarEngine, 2.0),
        (PieceKind::Vizier, 1.5),
        (PieceKind::Admin, 1.5),
    ])
});

// The center region of the 10x11 board and its bonuses.
const CENTER_COL_START: i32 = 3;
const CENTER_COL_END: i32 = 6;
const CENTER_ROW_START: i32 = 3;
const CENTER_ROW_END: i32 = 7;

pub fn piece_value(kind: PieceKind) -> f32 {
    PIECE_VALUES[&kind]
}

/// Evaluates the whole board, white positive. The board is mutated only
/// transiently by the mobility term's legality filtering and is restored
/// before returning.
pub fn evaluate_board(board: &mut Board) -> Result<f32, RulesError> {
    let mut score = 0.0;
    let pieces: Vec<(Square, Piece)> = board.pieces().collect();
    for (square, piece) in pieces {
        let value = piece_value(piece.kind);
        score += match piece.color {
            Color::White => value,
            Color::Black => -value,
        };
        score += evaluate_position(board, square, piece)?;
    }
    Ok(score)
}

/// Positional terms for one piece, signed by its color.
fn evaluate_position(board: &mut Board, square: Square, piece: Piece) -> Result<f32, RulesError> {
    let mut positional = 0.0;

    if piece.kind == PieceKind::Pawn {
        positional += pawn_structure(board, square, piece.color);
    }
    positional += mobility(board, square, piece)?;
    if piece.kind == PieceKind::Khan {
        positional += khan_safety(board, square, piece.color);
    }
    positional += center_control(square);

    Ok(match piece.color {
        Color::White => positional,
        Color::Black => -positional,
    })
}

/// Doubled and isolated pawns are penalized, advancement toward the far
/// rank and a defending pawn diagonally behind are rewarded.
fn pawn_structure(board: &Board, square: Square, color: Color) -> f32 {
    let mut score = 0.0;
    let is_own_pawn = |cell: Cell| {
        matches!(cell.piece(), Some(p) if p.color == color && p.kind == PieceKind::Pawn)
    };

    for row in 0..Board::ROWS as i32 {
        if row != square.row && is_own_pawn(board.get(Square::new(square.col, row))) {
            score -= 0.5;
        }
    }

    let mut isolated = true;
    'columns: for col in [square.col - 1, square.col + 1] {
        for row in 0..Board::ROWS as i32 {
            if is_own_pawn(board.get(Square::new(col, row))) {
                isolated = false;
                break 'columns;
            }
        }
    }
    if isolated {
        score -= 0.3;
    }

    // Progress toward the promotion rank.
    let advancement = match color {
        Color::White => (Board::ROWS as i32 - 1) - square.row,
        Color::Black => square.row,
    };
    score += 0.1 * advancement as f32;

    // A pawn diagonally behind defends this one.
    let behind = match color {
        Color::White => 1,
        Color::Black => -1,
    };
    if is_own_pawn(board.get(Square::new(square.col - 1, square.row + behind))) {
        score += 0.2;
    }

    score
}

/// Legal-move count scaled per kind, with forward pawn moves weighted
/// extra. Mobility is always measured under the base ruleset.
fn mobility(board: &mut Board, square: Square, piece: Piece) -> Result<f32, RulesError> {
    let player = piece.color;
    let pseudo = movegen::moves_for(board, square, piece.kind, player, false);
    let candidates = rules::filter_legal(board, &pseudo, square, piece, player, false)?;

    let count = candidates.len() as f32;
    let mut score = count * 0.1;
    score += match piece.kind {
        PieceKind::Rook | PieceKind::Giraffe => count * 0.05,
        PieceKind::Elephant | PieceKind::Camel => count * 0.03,
        PieceKind::Mongol | PieceKind::WarEngine => count * 0.04,
        PieceKind::Talia => count * 0.035,
        PieceKind::Khan => count * 0.01,
        PieceKind::Pawn => {
            let forward = candidates
                .iter()
                .filter(|to| match player {
                    Color::White => to.row < square.row,
                    Color::Black => to.row > square.row,
                })
                .count();
            forward as f32 * 0.15
        }
        PieceKind::Vizier | PieceKind::Admin => 0.0,
    };
    Ok(score)
}

/// Pawn shield ahead of the khan and nearby friendly pieces are rewarded;
/// enemies in the surrounding 5x5 are penalized, heavy attackers more.
fn khan_safety(board: &Board, square: Square, color: Color) -> f32 {
    let mut score = 0.0;
    let enemy = color.opponent();
    let ahead = color.pawn_direction();

    for dc in -1..=1 {
        let shield = board.get(Square::new(square.col + dc, square.row + ahead));
        if matches!(shield.piece(), Some(p) if p.color == color && p.kind == PieceKind::Pawn) {
            score += 0.5;
        }
    }

    for dc in -1..=1 {
        for dr in -1..=1 {
            if dc == 0 && dr == 0 {
                continue;
            }
            let neighbor = board.get(Square::new(square.col + dc, square.row + dr));
            if neighbor.color() == Some(color) {
                score += 0.2;
            }
        }
    }

    for dc in -2..=2 {
        for dr in -2..=2 {
            let cell = board.get(Square::new(square.col + dc, square.row + dr));
            let Some(piece) = cell.piece() else { continue };
            if piece.color != enemy {
                continue;
            }
            score -= 0.3;
            score -= match piece.kind {
                PieceKind::Rook | PieceKind::Giraffe | PieceKind::Elephant => 0.2,
                PieceKind::Mongol | PieceKind::Camel | PieceKind::WarEngine => 0.15,
                _ => 0.0,
            };
        }
    }

    score
}

/// Bonus scaled by proximity to the board's center, with extras for the
/// two most central squares and the central file and rank bands.
fn center_control(square: Square) -> f32 {
    let mut score = 0.0;
    let (col, row) = (square.col, square.row);

    if (CENTER_COL_START..=CENTER_COL_END).contains(&col)
        && (CENTER_ROW_START..=CENTER_ROW_END).contains(&row)
    {
        score += 0.5;
        let col_distance = (col - CENTER_COL_START).min(CENTER_COL_END - col);
        let row_distance = (row - CENTER_ROW_START).min(CENTER_ROW_END - row);
        score += 0.1 * (3 - col_distance) as f32 + 0.1 * (4 - row_distance) as f32;
        if (col == 4 || col == 5) && row == 5 {
            score += 0.3;
        }
    }

    if (3..=6).contains(&col) {
        score += 0.2;
    }
    if (4..=6).contains(&row) {
        score += 0.2;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(codes: &[(&str, i32, i32)]) -> Board {
        let mut board = Board::empty();
        for &(code, col, row) in codes {
            board.set(Square::new(col, row), Piece::from_code(code));
        }
        board
    }

    #[test]
    fn material_values_match_the_table() {
        assert_eq!(piece_value(PieceKind::Rook), 5.0);
        assert_eq!(piece_value(PieceKind::Giraffe), 4.0);
        assert_eq!(piece_value(PieceKind::Khan), 3.5);
        assert_eq!(piece_value(PieceKind::Pawn), 1.0);
    }

    #[test]
    fn center_control_is_exact_on_known_squares() {
        // Corner: outside every band.
        assert_eq!(center_control(Square::new(0, 0)), 0.0);
        // Central file band only.
        assert_eq!(center_control(Square::new(4, 0)), 0.2);
        // Most central square: 0.5 + 0.1*(3-1) + 0.1*(4-2) + 0.3 + 0.2 + 0.2.
        let best = center_control(Square::new(4, 5));
        assert!((best - 1.6).abs() < 1e-6, "got {best}");
    }

    #[test]
    fn doubled_and_isolated_pawns_are_penalized() {
        let board = board_with(&[("wp0", 4, 6), ("wpW", 4, 4), ("bKa", 0, 0), ("wKa", 10, 9)]);
        // Doubled (-0.5), isolated (-0.3), advancement 0.1 * 3.
        let structure = pawn_structure(&board, Square::new(4, 6), Color::White);
        assert!((structure - (-0.5 - 0.3 + 0.3)).abs() < 1e-6, "got {structure}");
    }

    #[test]
    fn a_defending_pawn_forms_a_chain() {
        let board = board_with(&[("wp0", 4, 5), ("wpW", 3, 6)]);
        let structure = pawn_structure(&board, Square::new(4, 5), Color::White);
        // Not isolated, chain bonus, advancement 0.1 * 4.
        assert!((structure - (0.2 + 0.4)).abs() < 1e-6, "got {structure}");
    }

    #[test]
    fn khan_safety_rewards_the_pawn_shield() {
        let shielded = board_with(&[
            ("wKa", 5, 8),
            ("wpA", 4, 7),
            ("wpK", 5, 7),
            ("wpV", 6, 7),
            ("bKa", 0, 0),
        ]);
        let bare = board_with(&[("wKa", 5, 8), ("bKa", 0, 0)]);
        let with_shield = khan_safety(&shielded, Square::new(5, 8), Color::White);
        let without = khan_safety(&bare, Square::new(5, 8), Color::White);
        // Three shield pawns are also three adjacent friends.
        assert!((with_shield - without - 3.0 * 0.7).abs() < 1e-6);
    }

    #[test]
    fn nearby_heavy_attackers_cost_more() {
        let rook_near = board_with(&[("wKa", 5, 8), ("bRk", 5, 6), ("bKa", 0, 0)]);
        let admin_near = board_with(&[("wKa", 5, 8), ("bAd", 5, 6), ("bKa", 0, 0)]);
        let rook = khan_safety(&rook_near, Square::new(5, 8), Color::White);
        let admin = khan_safety(&admin_near, Square::new(5, 8), Color::White);
        assert!(rook < admin, "rook {rook} should cost more than admin {admin}");
        assert!((admin - rook - 0.2).abs() < 1e-6);
    }

    #[test]
    fn capturing_material_raises_the_score() {
        let mut before = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("wRk", 2, 5), ("bGi", 2, 2)]);
        let mut after = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("wRk", 2, 2)]);
        let before_score = evaluate_board(&mut before).unwrap();
        let after_score = evaluate_board(&mut after).unwrap();
        assert!(
            after_score > before_score + 3.0,
            "capturing the giraffe should gain about its value: {before_score} -> {after_score}"
        );
    }

    #[test]
    fn evaluation_restores_the_board() {
        let mut board = Board::new();
        let before = board;
        evaluate_board(&mut board).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn mirrored_material_cancels_out() {
        let mut board = Board::new();
        let material: f32 = board
            .pieces()
            .map(|(_, p)| {
                let v = piece_value(p.kind);
                if p.color == Color::White {
                    v
                } else {
                    -v
                }
            })
            .sum();
        assert!((material).abs() < 1e-6);
        // The full evaluation still runs without error on the start position.
        evaluate_board(&mut board).unwrap();
    }
}
