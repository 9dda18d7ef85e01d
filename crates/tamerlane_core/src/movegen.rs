//! Pseudo-legal move generation.
//!
//! Every generator maps (origin, acting color) to the destinations a piece
//! could move to on the given board: in bounds, never onto an own piece,
//! with each kind's blocking rules applied. Leaving one's own khan in
//! check is not considered here; that is the legality filter's job.

use crate::board::Board;
use crate::piece::{Color, PieceKind};
use crate::square::Square;

pub const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
pub const DIAGONAL: [(i32, i32); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];

const ELEPHANT_LEAPS: [(i32, i32); 4] = [(-2, 2), (2, 2), (-2, -2), (2, -2)];
const WAR_ENGINE_LEAPS: [(i32, i32); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];
const MONGOL_LEAPS: [(i32, i32); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];
const CAMEL_LEAPS: [(i32, i32); 8] = [
    (1, 3),
    (1, -3),
    (-1, 3),
    (-1, -3),
    (3, 1),
    (3, -1),
    (-3, 1),
    (-3, -1),
];

// Alt-ruleset tables: the same pieces with a wider reach.
const ALT_WAR_ENGINE_LEAPS: [(i32, i32); 8] = [
    (0, -2),
    (0, 2),
    (-2, 0),
    (2, 0),
    (2, -2),
    (-2, 2),
    (-2, -2),
    (2, 2),
];
const ALT_ELEPHANT_LEAPS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-2, 2),
    (2, 2),
    (-2, -2),
    (2, -2),
];
const ALT_VIZIER_LEAPS: [(i32, i32); 8] = [
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-2, 2),
    (2, 2),
    (-2, -2),
    (2, -2),
];
const ALT_ADMIN_LEAPS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (0, -2),
    (0, 2),
    (-2, 0),
    (2, 0),
];

/// Dispatches to the generator for `kind` under the selected ruleset.
pub fn moves_for(
    board: &Board,
    from: Square,
    kind: PieceKind,
    player: Color,
    alt: bool,
) -> Vec<Square> {
    match kind {
        PieceKind::Rook => rook_moves(board, from, player),
        PieceKind::Talia => talia_moves(board, from, player),
        PieceKind::Khan => khan_moves(board, from, player),
        PieceKind::Mongol => mongol_moves(board, from, player),
        PieceKind::Camel => camel_moves(board, from, player),
        PieceKind::Giraffe => giraffe_moves(board, from, player),
        PieceKind::Pawn => {
            if alt {
                alt_pawn_moves(board, from, player)
            } else {
                pawn_moves(board, from, player)
            }
        }
        PieceKind::Elephant => {
            if alt {
                alt_elephant_moves(board, from, player)
            } else {
                elephant_moves(board, from, player)
            }
        }
        PieceKind::WarEngine => {
            if alt {
                alt_war_engine_moves(board, from, player)
            } else {
                war_engine_moves(board, from, player)
            }
        }
        PieceKind::Vizier => {
            if alt {
                alt_vizier_moves(board, from, player)
            } else {
                vizier_moves(board, from, player)
            }
        }
        PieceKind::Admin => {
            if alt {
                alt_admin_moves(board, from, player)
            } else {
                admin_moves(board, from, player)
            }
        }
    }
}

/// One forward step onto an empty square; the two forward diagonals are
/// capture-only. No double step and no en passant in the base rules.
pub fn pawn_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    let mut moves = Vec::new();
    let direction = player.pawn_direction();
    let enemy = player.opponent();

    let forward = from.offset(0, direction);
    if board.get(forward).is_empty() {
        moves.push(forward);
    }
    for dc in [-1, 1] {
        let capture = from.offset(dc, direction);
        if board.get(capture).color() == Some(enemy) {
            moves.push(capture);
        }
    }
    moves
}

/// Alt pawns may additionally advance two squares from their side's
/// starting rank, both squares empty.
pub fn alt_pawn_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    let mut moves = Vec::new();
    let direction = player.pawn_direction();
    let enemy = player.opponent();
    let first_move = match player {
        Color::White => from.row == 7,
        Color::Black => from.row == 2,
    };

    let forward = from.offset(0, direction);
    if board.get(forward).is_empty() {
        moves.push(forward);
        if first_move {
            let double = from.offset(0, 2 * direction);
            if board.get(double).is_empty() {
                moves.push(double);
            }
        }
    }
    for dc in [-1, 1] {
        let capture = from.offset(dc, direction);
        if board.get(capture).color() == Some(enemy) {
            moves.push(capture);
        }
    }
    moves
}

pub fn rook_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    let enemy = player.opponent();
    let mut moves = Vec::new();
    for &(dc, dr) in &ORTHOGONAL {
        for step in 1..Board::ROWS as i32 {
            let to = from.offset(dc * step, dr * step);
            if !board.is_valid(to) {
                break;
            }
            let target = board.get(to);
            if target.is_empty() {
                moves.push(to);
            } else if target.color() == Some(enemy) {
                moves.push(to);
                break;
            } else {
                break;
            }
        }
    }
    moves
}

/// Diagonal slider that cannot stop on the first square of a ray: any
/// occupant there, own or enemy, shuts the whole ray. Captures only from
/// the second square onward.
pub fn talia_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    let enemy = player.opponent();
    let mut moves = Vec::new();
    for &(dc, dr) in &DIAGONAL {
        for step in 1..Board::ROWS as i32 {
            let to = from.offset(dc * step, dr * step);
            let target = board.get(to);
            if step == 1 {
                if !target.is_empty() {
                    break;
                }
            } else if target.is_empty() {
                moves.push(to);
            } else if target.color() == Some(enemy) {
                moves.push(to);
                break;
            } else {
                break;
            }
        }
    }
    moves
}

pub fn elephant_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &ELEPHANT_LEAPS)
}

pub fn alt_elephant_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &ALT_ELEPHANT_LEAPS)
}

pub fn vizier_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &DIAGONAL)
}

pub fn alt_vizier_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &ALT_VIZIER_LEAPS)
}

pub fn khan_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    let mut moves = leaps(board, from, player, &ORTHOGONAL);
    moves.extend(leaps(board, from, player, &DIAGONAL));
    moves
}

pub fn war_engine_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &WAR_ENGINE_LEAPS)
}

pub fn alt_war_engine_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &ALT_WAR_ENGINE_LEAPS)
}

pub fn admin_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &ORTHOGONAL)
}

pub fn alt_admin_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &ALT_ADMIN_LEAPS)
}

pub fn mongol_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &MONGOL_LEAPS)
}

pub fn camel_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    leaps(board, from, player, &CAMEL_LEAPS)
}

/// Steps one square diagonally onto an empty square, then slides like a
/// rook along the two axes aligned with that diagonal, starting two
/// squares out. A piece on the first square past the turn blocks that
/// whole axis.
pub fn giraffe_moves(board: &Board, from: Square, player: Color) -> Vec<Square> {
    let enemy = player.opponent();
    let mut moves = Vec::new();

    for &(dc, dr) in &[(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let pivot = from.offset(dc, dr);
        if !board.is_valid(pivot) || !board.get(pivot).is_empty() {
            continue;
        }

        let blocked = |square: Square| board.is_valid(square) && !board.get(square).is_empty();
        let blocked_horizontal = blocked(pivot.offset(dc, 0));
        let blocked_vertical = blocked(pivot.offset(0, dr));

        if !blocked_horizontal {
            slide_from(board, pivot, (dc, 0), enemy, &mut moves);
        }
        if !blocked_vertical {
            slide_from(board, pivot, (0, dr), enemy, &mut moves);
        }
    }
    moves
}

/// Rook-style ray out of a giraffe pivot, starting at distance two.
fn slide_from(
    board: &Board,
    pivot: Square,
    (dc, dr): (i32, i32),
    enemy: Color,
    moves: &mut Vec<Square>,
) {
    for step in 2..Board::ROWS as i32 {
        let to = pivot.offset(dc * step, dr * step);
        if !board.is_valid(to) {
            break;
        }
        let target = board.get(to);
        if target.is_empty() {
            moves.push(to);
        } else if target.color() == Some(enemy) {
            moves.push(to);
            break;
        } else {
            break;
        }
    }
}

fn leaps(board: &Board, from: Square, player: Color, offsets: &[(i32, i32)]) -> Vec<Square> {
    offsets
        .iter()
        .map(|&(dc, dr)| from.offset(dc, dr))
        .filter(|&to| board.is_valid(to) && board.get(to).color() != Some(player))
        .collect()
}
