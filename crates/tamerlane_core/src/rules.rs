//! Legality filtering and the special rules: promotion, the pawn fork,
//! fortress draws, and terminal detection.

use log::{debug, info, warn};
use thiserror::Error;

use crate::board::{Board, Cell};
use crate::movegen;
use crate::moves::Turn;
use crate::piece::{Color, Piece, PieceKind, Variant};
use crate::square::Square;

/// Internal-consistency failures. A reachable game position always has
/// both khans on the board; losing one mid-computation means the board
/// was corrupted, so every path reports it as an error rather than
/// guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("no {0} khan on the board")]
    KhanMissing(Color),
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    Draw,
}

/// Whether `player`'s khan is attacked on `board`.
///
/// Enumerates every enemy piece's pseudo-legal destinations and tests them
/// against the khan's square. The first khan-kind piece in row-major order
/// is the one defended.
pub fn is_khan_in_check(board: &Board, player: Color, alt: bool) -> Result<bool, RulesError> {
    let khan_square = board
        .pieces()
        .find(|(_, piece)| piece.color == player && piece.kind == PieceKind::Khan)
        .map(|(square, _)| square)
        .ok_or(RulesError::KhanMissing(player))?;

    let enemy = player.opponent();
    for (square, piece) in board.pieces() {
        if piece.color == enemy
            && movegen::moves_for(board, square, piece.kind, enemy, alt).contains(&khan_square)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Keeps the candidates that do not leave `player`'s khan attacked.
///
/// Destinations holding a marked (untargetable) pawn are dropped before
/// simulation. Each surviving candidate is tried on the live board and the
/// snapshot is restored unconditionally afterward, so the board is
/// bit-identical on return.
pub fn filter_legal(
    board: &mut Board,
    candidates: &[Square],
    from: Square,
    piece: Piece,
    player: Color,
    alt: bool,
) -> Result<Vec<Square>, RulesError> {
    let snapshot = *board;
    let mut legal = Vec::with_capacity(candidates.len());

    for &to in candidates {
        if matches!(board.get(to).piece(), Some(target) if target.variant == Variant::Marked) {
            continue;
        }
        board.set(from, None);
        board.set(to, Some(piece));
        let in_check = is_khan_in_check(board, player, alt);
        *board = snapshot;
        if !in_check? {
            legal.push(to);
        }
    }
    Ok(legal)
}

/// True iff any of `player`'s pieces has at least one legal move.
pub fn has_legal_moves(board: &mut Board, player: Color, alt: bool) -> Result<bool, RulesError> {
    let own: Vec<(Square, Piece)> = board
        .pieces()
        .filter(|(_, piece)| piece.color == player)
        .collect();

    for (from, piece) in own {
        let candidates = movegen::moves_for(board, from, piece.kind, player, alt);
        if !filter_legal(board, &candidates, from, piece, player, alt)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Every legal turn for `player`, in board scan order, with the
/// destination's current occupant recorded as the capture.
pub fn legal_turns(
    board: &mut Board,
    player: Color,
    turn_number: u32,
    alt: bool,
) -> Result<Vec<Turn>, RulesError> {
    let own: Vec<(Square, Piece)> = board
        .pieces()
        .filter(|(_, piece)| piece.color == player)
        .collect();

    let mut turns = Vec::with_capacity(100);
    for (from, piece) in own {
        let candidates = movegen::moves_for(board, from, piece.kind, player, alt);
        for to in filter_legal(board, &candidates, from, piece, player, alt)? {
            turns.push(Turn::new(
                turn_number,
                player,
                from,
                to,
                piece,
                board.get(to).piece(),
            ));
        }
    }
    Ok(turns)
}

/// Resolves every pawn of `player` standing on its far rank.
///
/// Ordinary pawns promote in place to the piece they are named for (the
/// pawn of khans yields a promoted khan). The pawn of pawns parks in place
/// as the marked, untargetable pawn. A forked pawn relocates to the fixed
/// central square — or is removed outright if a khan already holds it.
/// The central pawn's last promotion yields the adventitious khan. A
/// marked pawn on the far rank re-runs the opponent's fork scan.
pub fn promote_pawns(board: &mut Board, player: Color) {
    let row = match player {
        Color::White => 0,
        Color::Black => (Board::ROWS - 1) as i32,
    };
    let enemy = player.opponent();

    for col in 0..Board::COLS as i32 {
        let square = Square::new(col, row);
        let Some(piece) = board.get(square).piece() else {
            continue;
        };
        if piece.kind != PieceKind::Pawn {
            continue;
        }

        match piece.variant {
            Variant::PawnOf(target) => {
                let variant = if target == PieceKind::Khan {
                    Variant::PromotedKhan
                } else {
                    Variant::None
                };
                let promoted = Piece::with_variant(player, target, variant);
                board.set(square, Some(promoted));
                info!("promoted {} to {} at {}", piece.code(), promoted.code(), square);
            }
            Variant::OfPawns => {
                let marked = Piece::with_variant(player, PieceKind::Pawn, Variant::Marked);
                board.set(square, Some(marked));
                info!("promoted {} to {} at {}", piece.code(), marked.code(), square);
            }
            Variant::Forked => {
                let central = Square::new(5, if player == Color::White { 7 } else { 2 });
                board.set(square, None);
                if matches!(board.get(central).piece(), Some(p) if p.kind == PieceKind::Khan) {
                    info!("central square {} held by a khan, pawn executed", central);
                } else {
                    let pawn = Piece::with_variant(player, PieceKind::Pawn, Variant::Central);
                    board.set(central, Some(pawn));
                    info!("relocated {} to the central square {}", pawn.code(), central);
                }
            }
            Variant::Central => {
                let khan = Piece::with_variant(player, PieceKind::Khan, Variant::AdventitiousKhan);
                board.set(square, Some(khan));
                info!("promoted {} to {} at {}", piece.code(), khan.code(), square);
            }
            Variant::Marked => {
                check_pawn_forks(board, enemy);
            }
            Variant::None | Variant::PromotedKhan | Variant::AdventitiousKhan => {
                warn!("unrecognized pawn variant {:?} at {}, skipped", piece.variant, square);
            }
        }
    }
}

/// Executes `player`'s pawn fork if one is available.
///
/// Scans row-major for two enemy pieces exactly two columns apart on one
/// row. The fork square lies one row below the pair, shifted one column
/// toward the board interior unless already at the edge. The first pair
/// whose fork square is empty or holds a non-khan enemy piece receives the
/// marked pawn, which re-enters play with the forked tag.
pub fn check_pawn_forks(board: &mut Board, player: Color) {
    let enemy = player.opponent();
    let marked = Piece::with_variant(player, PieceKind::Pawn, Variant::Marked);
    let Some(marked_square) = board
        .pieces()
        .find(|(_, piece)| *piece == marked)
        .map(|(square, _)| square)
    else {
        debug!("no marked pawn for {player}");
        return;
    };

    for row in 0..Board::ROWS as i32 {
        for col in 0..Board::COLS as i32 {
            let first = board.get(Square::new(col, row));
            let second = board.get(Square::new(col + 2, row));
            if first.color() != Some(enemy) || second.color() != Some(enemy) {
                continue;
            }

            let mut fork_col = col;
            let fork_row = row + 1;
            if player == Color::White && fork_col < Board::COLS as i32 - 1 {
                fork_col += 1;
            } else if player == Color::Black && fork_col > 0 {
                fork_col -= 1;
            }

            let fork_square = Square::new(fork_col, fork_row);
            let takeable = match board.get(fork_square) {
                Cell::Empty => true,
                Cell::Occupied(target) => {
                    target.color == enemy && target.kind != PieceKind::Khan
                }
                Cell::Invalid => false,
            };
            if takeable {
                board.set(marked_square, None);
                let forked = Piece::with_variant(player, PieceKind::Pawn, Variant::Forked);
                board.set(fork_square, Some(forked));
                info!("pawn fork: {} placed at {}", forked.code(), fork_square);
                return;
            }
        }
    }
    debug!("no valid pawn fork for {player}");
}

/// True iff `player`'s original khan currently sits on one of its three
/// fortress squares, enabling the draw trigger on its next move off the
/// board edge.
pub fn can_draw(board: &Board, player: Color) -> bool {
    let khan = Piece::new(player, PieceKind::Khan);
    let fortress: [Square; 3] = match player {
        Color::White => [Square::new(0, 0), Square::new(0, 1), Square::new(0, 2)],
        Color::Black => [Square::new(10, 7), Square::new(10, 8), Square::new(10, 9)],
    };
    fortress
        .iter()
        .any(|&square| board.get(square).piece() == Some(khan))
}

/// Terminal check after `mover` commits a move: if the opponent has no
/// legal reply, it is checkmate when their khan is attacked and stalemate
/// otherwise.
pub fn victory_state(
    board: &mut Board,
    mover: Color,
    alt: bool,
) -> Result<Option<Outcome>, RulesError> {
    let enemy = mover.opponent();
    if has_legal_moves(board, enemy, alt)? {
        return Ok(None);
    }
    if is_khan_in_check(board, enemy, alt)? {
        Ok(Some(Outcome::Checkmate { winner: mover }))
    } else {
        Ok(Some(Outcome::Stalemate))
    }
}

/// Stable text key for repetition tracking: every occupied square with its
/// piece code, plus the side to move.
pub fn position_hash(board: &Board, to_move: Color) -> String {
    let mut key = String::with_capacity(Board::ROWS * Board::COLS);
    for (square, piece) in board.pieces() {
        key.push_str(&format!("{},{}:{};", square.col, square.row, piece.code()));
    }
    key.push(match to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, code: &str, col: i32, row: i32) {
        board.set(Square::new(col, row), Some(Piece::from_code(code).unwrap()));
    }

    fn board_with(codes: &[(&str, i32, i32)]) -> Board {
        let mut board = Board::empty();
        for &(code, col, row) in codes {
            place(&mut board, code, col, row);
        }
        board
    }

    #[test]
    fn detects_a_rook_check() {
        let board = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("bRk", 5, 4)]);
        assert_eq!(is_khan_in_check(&board, Color::White, false), Ok(true));
        assert_eq!(is_khan_in_check(&board, Color::Black, false), Ok(false));
    }

    #[test]
    fn missing_khan_is_an_error_everywhere() {
        let mut board = board_with(&[("wRk", 3, 3), ("bKa", 5, 0)]);
        assert_eq!(
            is_khan_in_check(&board, Color::White, false),
            Err(RulesError::KhanMissing(Color::White))
        );

        let rook = Piece::from_code("wRk").unwrap();
        let candidates = movegen::rook_moves(&board, Square::new(3, 3), Color::White);
        let result = filter_legal(
            &mut board,
            &candidates,
            Square::new(3, 3),
            rook,
            Color::White,
            false,
        );
        assert_eq!(result, Err(RulesError::KhanMissing(Color::White)));
    }

    #[test]
    fn filter_restores_the_board_after_every_trial() {
        let mut board = board_with(&[("wKa", 5, 9), ("wRk", 5, 5), ("bKa", 5, 0), ("bRk", 0, 9)]);
        let before = board;
        let rook = Piece::from_code("wRk").unwrap();
        let candidates = movegen::rook_moves(&board, Square::new(5, 5), Color::White);
        filter_legal(&mut board, &candidates, Square::new(5, 5), rook, Color::White, false)
            .unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn pinned_piece_may_not_expose_its_khan() {
        // The white rook on (5, 5) shields its khan from the black rook.
        let mut board = board_with(&[("wKa", 5, 9), ("wRk", 5, 5), ("bKa", 0, 0), ("bRk", 5, 1)]);
        let rook = Piece::from_code("wRk").unwrap();
        let candidates = movegen::rook_moves(&board, Square::new(5, 5), Color::White);
        let legal = filter_legal(
            &mut board,
            &candidates,
            Square::new(5, 5),
            rook,
            Color::White,
            false,
        )
        .unwrap();

        assert!(legal.contains(&Square::new(5, 1)), "capturing the attacker is fine");
        assert!(legal.contains(&Square::new(5, 7)), "staying on the file is fine");
        assert!(!legal.contains(&Square::new(3, 5)), "leaving the file is not");
    }

    #[test]
    fn marked_pawns_are_untargetable() {
        let mut board = board_with(&[("wKa", 5, 9), ("wRk", 3, 4), ("bKa", 5, 0), ("bpx", 3, 1)]);
        let rook = Piece::from_code("wRk").unwrap();
        let candidates = movegen::rook_moves(&board, Square::new(3, 4), Color::White);
        assert!(candidates.contains(&Square::new(3, 1)), "generation still sees the square");

        let legal = filter_legal(
            &mut board,
            &candidates,
            Square::new(3, 4),
            rook,
            Color::White,
            false,
        )
        .unwrap();
        assert!(!legal.contains(&Square::new(3, 1)), "the filter drops it");
        assert!(legal.contains(&Square::new(3, 2)));
    }

    #[test]
    fn ordinary_pawns_promote_in_place() {
        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("wpR", 3, 0), ("wpC", 7, 0)]);
        promote_pawns(&mut board, Color::White);
        assert_eq!(
            board.get(Square::new(3, 0)).piece(),
            Some(Piece::from_code("wRk").unwrap())
        );
        assert_eq!(
            board.get(Square::new(7, 0)).piece(),
            Some(Piece::from_code("wCa").unwrap())
        );
    }

    #[test]
    fn pawn_of_khans_promotes_to_a_promoted_khan() {
        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("wpK", 2, 0)]);
        promote_pawns(&mut board, Color::White);
        assert_eq!(
            board.get(Square::new(2, 0)).piece(),
            Some(Piece::from_code("wK0").unwrap())
        );
    }

    #[test]
    fn pawn_of_pawns_parks_as_the_marked_pawn() {
        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("wp0", 4, 0)]);
        promote_pawns(&mut board, Color::White);
        assert_eq!(
            board.get(Square::new(4, 0)).piece(),
            Some(Piece::from_code("wpx").unwrap())
        );
    }

    #[test]
    fn forked_pawn_relocates_to_the_central_square() {
        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("wp1", 8, 0)]);
        promote_pawns(&mut board, Color::White);
        assert!(board.get(Square::new(8, 0)).is_empty());
        assert_eq!(
            board.get(Square::new(5, 7)).piece(),
            Some(Piece::from_code("wp2").unwrap())
        );

        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 2, 2), ("bp1", 8, 9)]);
        promote_pawns(&mut board, Color::Black);
        assert!(board.get(Square::new(8, 9)).is_empty());
        assert_eq!(
            board.get(Square::new(5, 2)).piece(),
            Some(Piece::from_code("bp2").unwrap())
        );
    }

    #[test]
    fn forked_pawn_is_executed_when_a_khan_holds_the_central_square() {
        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 5, 7), ("wp1", 8, 0)]);
        promote_pawns(&mut board, Color::White);
        assert!(board.get(Square::new(8, 0)).is_empty(), "the pawn is gone");
        assert_eq!(
            board.get(Square::new(5, 7)).piece(),
            Some(Piece::from_code("bKa").unwrap()),
            "the khan is untouched"
        );
    }

    #[test]
    fn central_pawn_promotes_to_the_adventitious_khan() {
        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("wp2", 6, 0)]);
        promote_pawns(&mut board, Color::White);
        assert_eq!(
            board.get(Square::new(6, 0)).piece(),
            Some(Piece::from_code("wK1").unwrap())
        );
    }

    #[test]
    fn fork_relocates_the_marked_pawn_between_two_targets() {
        let mut board = board_with(&[
            ("wKa", 5, 9),
            ("bKa", 9, 0),
            ("wpx", 0, 9),
            ("bRk", 3, 4),
            ("bTa", 5, 4),
        ]);
        check_pawn_forks(&mut board, Color::White);
        assert!(board.get(Square::new(0, 9)).is_empty());
        assert_eq!(
            board.get(Square::new(4, 5)).piece(),
            Some(Piece::from_code("wp1").unwrap())
        );
    }

    #[test]
    fn fork_square_shifts_away_from_the_edge() {
        // Black's fork column walks toward the interior; at column 0 it
        // stays put.
        let mut board = board_with(&[
            ("bKa", 9, 0),
            ("wKa", 5, 9),
            ("bpx", 10, 0),
            ("wRk", 0, 4),
            ("wTa", 2, 4),
        ]);
        check_pawn_forks(&mut board, Color::Black);
        assert!(board.get(Square::new(10, 0)).is_empty());
        assert_eq!(
            board.get(Square::new(0, 5)).piece(),
            Some(Piece::from_code("bp1").unwrap())
        );
    }

    #[test]
    fn fork_captures_a_non_khan_occupant_but_never_a_khan() {
        let mut board = board_with(&[
            ("wKa", 5, 9),
            ("bKa", 9, 9),
            ("wpx", 0, 9),
            ("bRk", 3, 4),
            ("bTa", 5, 4),
            ("bMo", 4, 5),
        ]);
        check_pawn_forks(&mut board, Color::White);
        assert_eq!(
            board.get(Square::new(4, 5)).piece(),
            Some(Piece::from_code("wp1").unwrap()),
            "the mongol is captured by occupation"
        );

        let mut board = board_with(&[
            ("wKa", 5, 9),
            ("bKa", 4, 5),
            ("wpx", 0, 9),
            ("bRk", 3, 4),
            ("bTa", 5, 4),
        ]);
        let before = board;
        check_pawn_forks(&mut board, Color::White);
        assert_eq!(board, before, "a khan on the fork square cancels the fork");
    }

    #[test]
    fn fork_without_a_marked_pawn_is_a_no_op() {
        let mut board = board_with(&[("wKa", 5, 9), ("bKa", 5, 0), ("bRk", 3, 4), ("bTa", 5, 4)]);
        let before = board;
        check_pawn_forks(&mut board, Color::White);
        assert_eq!(board, before);
    }

    #[test]
    fn fortress_squares_enable_the_draw() {
        for (col, row) in [(0, 0), (0, 1), (0, 2)] {
            let board = board_with(&[("wKa", col, row), ("bKa", 5, 5)]);
            assert!(can_draw(&board, Color::White), "({col}, {row})");
        }
        for (col, row) in [(10, 7), (10, 8), (10, 9)] {
            let board = board_with(&[("bKa", col, row), ("wKa", 5, 5)]);
            assert!(can_draw(&board, Color::Black), "({col}, {row})");
        }

        let board = board_with(&[("wKa", 0, 3), ("bKa", 10, 6)]);
        assert!(!can_draw(&board, Color::White));
        assert!(!can_draw(&board, Color::Black));

        // A promoted khan on a fortress square does not qualify.
        let board = board_with(&[("wK0", 0, 0), ("wKa", 5, 5), ("bKa", 9, 5)]);
        assert!(!can_draw(&board, Color::White));
    }

    #[test]
    fn checkmate_is_a_win_for_the_mover() {
        // Black khan cornered on (0, 0); one rook holds row 1, the other
        // delivers the check along row 0.
        let mut board = board_with(&[
            ("bKa", 0, 0),
            ("wRk", 9, 1),
            ("wRk", 5, 0),
            ("wKa", 10, 9),
        ]);
        assert_eq!(
            victory_state(&mut board, Color::White, false),
            Ok(Some(Outcome::Checkmate {
                winner: Color::White
            }))
        );
    }

    #[test]
    fn no_moves_without_check_is_stalemate() {
        // Black khan on (0, 0) is boxed in by the two rooks but not
        // attacked.
        let mut board = board_with(&[
            ("bKa", 0, 0),
            ("wRk", 9, 1),
            ("wRk", 1, 9),
            ("wKa", 10, 5),
        ]);
        assert_eq!(
            victory_state(&mut board, Color::White, false),
            Ok(Some(Outcome::Stalemate))
        );
    }

    #[test]
    fn game_continues_while_replies_exist() {
        let mut board = Board::new();
        assert_eq!(victory_state(&mut board, Color::White, false), Ok(None));
    }

    #[test]
    fn position_hash_tracks_side_to_move() {
        let board = Board::new();
        assert_ne!(
            position_hash(&board, Color::White),
            position_hash(&board, Color::Black)
        );
        assert_eq!(
            position_hash(&board, Color::White),
            position_hash(&Board::new(), Color::White)
        );
    }
}
