use std::collections::HashMap;

use thiserror::Error;

use crate::board::{Board, Layout};
use crate::movegen;
use crate::moves::Turn;
use crate::piece::{Color, Piece};
use crate::rules::{self, Outcome, RulesError};
use crate::square::Square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,
    #[error("no {player} piece at {square}")]
    NoPiece { player: Color, square: Square },
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },
    #[error("{0} may not claim a fortress draw now")]
    DrawNotAvailable(Color),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// One game of Tamerlane Chess: the board plus its bookkeeping. Turn
/// counter, move history, the draw-possible flag, and repetition counts
/// all live here rather than in any shared state. Rule application
/// happens through [`Game::commit`] only; search operates on board copies
/// and never touches this state.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    alt: bool,
    turns: u32,
    history: Vec<Turn>,
    hash_stack: Vec<String>,
    repetitions: HashMap<String, u32>,
    draw_possible: bool,
    outcome: Option<Outcome>,
}

impl Game {
    pub fn new(layout: Layout, alt: bool) -> Self {
        Self::from_board(Board::from_layout(layout), alt, 1)
    }

    /// Resumes from an arbitrary position, e.g. one reloaded by the
    /// persistence collaborator. `turns` is the next turn number; white
    /// moves on odd turns.
    pub fn from_board(board: Board, alt: bool, turns: u32) -> Self {
        let mut game = Self {
            board,
            alt,
            turns,
            history: Vec::new(),
            hash_stack: Vec::new(),
            repetitions: HashMap::new(),
            draw_possible: false,
            outcome: None,
        };
        game.record_position();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn alt(&self) -> bool {
        self.alt
    }

    pub fn turn_number(&self) -> u32 {
        self.turns
    }

    pub fn side_to_move(&self) -> Color {
        if self.turns % 2 == 1 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn draw_possible(&self) -> bool {
        self.draw_possible
    }

    /// Whether `player`'s khan is currently attacked.
    pub fn is_khan_in_check(&self, player: Color) -> Result<bool, RulesError> {
        rules::is_khan_in_check(&self.board, player, self.alt)
    }

    /// Every legal turn for `player` in the current position.
    pub fn legal_moves(&mut self, player: Color) -> Result<Vec<Turn>, RulesError> {
        rules::legal_turns(&mut self.board, player, self.turns, self.alt)
    }

    /// Legal destinations of the piece on `from`, for move highlighting
    /// and input validation. Empty when the square holds no piece of the
    /// side to move.
    pub fn legal_moves_from(&mut self, from: Square) -> Result<Vec<Square>, RulesError> {
        let player = self.side_to_move();
        let Some(piece) = self.board.get(from).piece().filter(|p| p.color == player) else {
            return Ok(Vec::new());
        };
        let candidates = movegen::moves_for(&self.board, from, piece.kind, player, self.alt);
        rules::filter_legal(&mut self.board, &candidates, from, piece, player, self.alt)
    }

    /// Plays the side to move's piece from `from` to `to`, then runs the
    /// committed-move rules in order: the mover's promotions, the
    /// opponent's fork scan, the opponent's fortress-draw predicate, and
    /// terminal detection. Returns the captured piece, if any.
    pub fn commit(&mut self, from: Square, to: Square) -> Result<Option<Piece>, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        let player = self.side_to_move();
        let piece = self
            .board
            .get(from)
            .piece()
            .filter(|p| p.color == player)
            .ok_or(GameError::NoPiece {
                player,
                square: from,
            })?;

        let candidates = movegen::moves_for(&self.board, from, piece.kind, player, self.alt);
        let legal =
            rules::filter_legal(&mut self.board, &candidates, from, piece, player, self.alt)?;
        if !legal.contains(&to) {
            return Err(GameError::IllegalMove { from, to });
        }

        let captured = self.board.get(to).piece();
        let turn = Turn::new(self.turns, player, from, to, piece, captured);
        self.board.apply(&turn);
        self.history.push(turn);
        self.turns += 1;

        let enemy = player.opponent();
        rules::promote_pawns(&mut self.board, player);
        rules::check_pawn_forks(&mut self.board, enemy);
        self.draw_possible = rules::can_draw(&self.board, enemy);
        self.record_position();
        self.outcome = rules::victory_state(&mut self.board, player, self.alt)?;

        Ok(captured)
    }

    /// Reverts the last committed turn by swapping its two cells back and
    /// rewinding the bookkeeping. Promotion and fork relocations that
    /// followed the move are not unwound; they happened on other squares.
    pub fn undo_last_move(&mut self) -> Option<Turn> {
        let turn = self.history.pop()?;
        self.board.undo(&turn);
        self.turns -= 1;
        self.outcome = None;
        if let Some(hash) = self.hash_stack.pop() {
            if let Some(count) = self.repetitions.get_mut(&hash) {
                *count = count.saturating_sub(1);
            }
        }
        Some(turn)
    }

    /// Ends the game as a draw for a khan leaving the board through its
    /// fortress edge. Valid only while the khan stands on a fortress
    /// square; the sentinel-square click itself belongs to the input
    /// collaborator.
    pub fn claim_fortress_draw(&mut self, player: Color) -> Result<(), GameError> {
        if self.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        if !rules::can_draw(&self.board, player) {
            return Err(GameError::DrawNotAvailable(player));
        }
        self.outcome = Some(Outcome::Draw);
        Ok(())
    }

    /// True once the current position has occurred three times with the
    /// same side to move.
    pub fn is_threefold_repetition(&self) -> bool {
        let hash = rules::position_hash(&self.board, self.side_to_move());
        self.repetitions.get(&hash).copied().unwrap_or(0) >= 3
    }

    fn record_position(&mut self) {
        let hash = rules::position_hash(&self.board, self.side_to_move());
        *self.repetitions.entry(hash.clone()).or_insert(0) += 1;
        self.hash_stack.push(hash);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Layout::Masculine, false)
    }
}
