use std::fmt;

use crate::moves::Turn;
use crate::piece::{Color, Piece};
use crate::square::Square;

/// The three starting arrangements. They differ only in the placement of
/// the pieces near the center files; movement rules are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Masculine,
    Feminine,
    Third,
}

/// What a board lookup yields: a piece, an empty cell, or the
/// distinguished out-of-range value. `Invalid` is never equal to a piece
/// and never empty, so movement code can probe beyond the edge without
/// pre-checking bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Invalid,
    Empty,
    Occupied(Piece),
}

impl Cell {
    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Occupied(piece) => Some(piece),
            _ => None,
        }
    }

    pub fn color(self) -> Option<Color> {
        self.piece().map(|piece| piece.color)
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

const MASCULINE_LAYOUT: [[&str; 11]; 10] = [
    ["bEl", "---", "bCa", "---", "bWe", "---", "bWe", "---", "bCa", "---", "bEl"],
    ["bRk", "bMo", "bTa", "bGi", "bVi", "bKa", "bAd", "bGi", "bTa", "bMo", "bRk"],
    ["bpR", "bpM", "bpT", "bpG", "bpV", "bpK", "bpA", "bpE", "bpC", "bpW", "bp0"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["wp0", "wpW", "wpC", "wpE", "wpA", "wpK", "wpV", "wpG", "wpT", "wpM", "wpR"],
    ["wRk", "wMo", "wTa", "wGi", "wAd", "wKa", "wVi", "wGi", "wTa", "wMo", "wRk"],
    ["wEl", "---", "wCa", "---", "wWe", "---", "wWe", "---", "wCa", "---", "wEl"],
];

const FEMININE_LAYOUT: [[&str; 11]; 10] = [
    ["bEl", "---", "bCa", "---", "bVi", "bKa", "bAd", "---", "bCa", "---", "bEl"],
    ["bRk", "bMo", "bTa", "bGi", "bWe", "bpK", "bWe", "bGi", "bTa", "bMo", "bRk"],
    ["bpR", "bpM", "bpT", "bpG", "bpV", "---", "bpA", "bpE", "bpC", "bpW", "bp0"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["wp0", "wpW", "wpC", "wpE", "wpA", "---", "wpV", "wpG", "wpT", "wpM", "wpR"],
    ["wRk", "wMo", "wTa", "wGi", "wWe", "wpK", "wWe", "wGi", "wTa", "wMo", "wRk"],
    ["wEl", "---", "wCa", "---", "wAd", "wKa", "wVi", "---", "wCa", "---", "wEl"],
];

const THIRD_LAYOUT: [[&str; 11]; 10] = [
    ["bEl", "---", "bCa", "---", "bVi", "bKa", "bAd", "---", "bCa", "---", "bEl"],
    ["bRk", "bMo", "bWe", "bTa", "bGi", "bpK", "bGi", "bTa", "bWe", "bMo", "bRk"],
    ["bpR", "bpM", "bpT", "bpG", "bpV", "---", "bpA", "bpE", "bpC", "bpW", "bp0"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["---", "---", "---", "---", "---", "---", "---", "---", "---", "---", "---"],
    ["wp0", "wpW", "wpC", "wpE", "wpA", "---", "wpV", "wpG", "wpT", "wpM", "wpR"],
    ["wRk", "wMo", "wWe", "wTa", "wGi", "wpK", "wGi", "wTa", "wWe", "wMo", "wRk"],
    ["wEl", "---", "wCa", "---", "wAd", "wKa", "wVi", "---", "wCa", "---", "wEl"],
];

/// The 10x11 board. A plain value type: snapshots are copies, and the
/// make/undo pair used by legality filtering and search relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; Board::COLS]; Board::ROWS],
}

impl Board {
    pub const ROWS: usize = 10;
    pub const COLS: usize = 11;

    /// The masculine (primary) starting arrangement.
    pub fn new() -> Self {
        Self::from_layout(Layout::Masculine)
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; Board::COLS]; Board::ROWS],
        }
    }

    pub fn from_layout(layout: Layout) -> Self {
        let mut board = Self::empty();
        board.reset(layout);
        board
    }

    pub fn reset(&mut self, layout: Layout) {
        let rows = match layout {
            Layout::Masculine => &MASCULINE_LAYOUT,
            Layout::Feminine => &FEMININE_LAYOUT,
            Layout::Third => &THIRD_LAYOUT,
        };
        for (row, codes) in rows.iter().enumerate() {
            for (col, code) in codes.iter().enumerate() {
                self.cells[row][col] = Piece::from_code(code);
            }
        }
    }

    pub fn is_valid(&self, square: Square) -> bool {
        square.col >= 0
            && square.col < Board::COLS as i32
            && square.row >= 0
            && square.row < Board::ROWS as i32
    }

    pub fn get(&self, square: Square) -> Cell {
        if !self.is_valid(square) {
            return Cell::Invalid;
        }
        match self.cells[square.row as usize][square.col as usize] {
            Some(piece) => Cell::Occupied(piece),
            None => Cell::Empty,
        }
    }

    /// Writes a cell; out-of-range squares are ignored.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if self.is_valid(square) {
            self.cells[square.row as usize][square.col as usize] = piece;
        }
    }

    /// All occupied squares in row-major order (row 0 first). Scan order is
    /// part of the rules: the check test and the fork scan take the first
    /// match.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..Board::ROWS as i32).flat_map(move |row| {
            (0..Board::COLS as i32).filter_map(move |col| {
                let square = Square::new(col, row);
                self.get(square).piece().map(|piece| (square, piece))
            })
        })
    }

    /// Plays `turn` on the board: the destination takes the moved piece and
    /// the origin is vacated.
    pub fn apply(&mut self, turn: &Turn) {
        self.set(turn.to, Some(turn.piece));
        self.set(turn.from, None);
    }

    /// Exact inverse of [`Board::apply`]: the origin takes the moved piece
    /// back and the destination reverts to its prior occupant.
    pub fn undo(&mut self, turn: &Turn) {
        self.set(turn.from, Some(turn.piece));
        self.set(turn.to, turn.captured);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                match cell {
                    Some(piece) => write!(f, "{}", piece.code())?,
                    None => write!(f, "---")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
