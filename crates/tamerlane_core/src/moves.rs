use crate::piece::{Color, Piece};
use crate::square::Square;

/// One half-move as recorded in the game history and produced by search.
///
/// `captured` holds the destination's occupant before the move so the turn
/// can be undone exactly. `score` is only populated on turns returned by
/// the engine; it is 0 everywhere else.
#[derive(Debug, Clone, Copy)]
pub struct Turn {
    pub number: u32,
    pub player: Color,
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub score: f32,
}

impl Turn {
    pub fn new(
        number: u32,
        player: Color,
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
    ) -> Self {
        Self {
            number,
            player,
            from,
            to,
            piece,
            captured,
            score: 0.0,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl PartialEq for Turn {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && self.player == other.player
            && self.from == other.from
            && self.to == other.to
            && self.piece == other.piece
            && self.captured == other.captured
    }
}
