use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward pawn step. White pawns advance toward row 0.
    pub fn pawn_direction(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// The eleven piece kinds of Tamerlane Chess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Talia,
    Elephant,
    Vizier,
    Khan,
    WarEngine,
    Admin,
    Mongol,
    Camel,
    Giraffe,
}

/// Auxiliary tag on a piece.
///
/// Only pawns and promotion-made khans carry a meaningful variant. A pawn's
/// variant records which piece it promotes to, or its stage in the
/// pawn-of-pawns chain: `OfPawns` parks on the far rank as `Marked`
/// (untargetable), the fork places it back as `Forked`, reaching the far
/// rank again relocates it to the central square as `Central`, and its
/// final promotion yields an `AdventitiousKhan`. Movement never looks at
/// the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    None,
    PawnOf(PieceKind),
    OfPawns,
    Marked,
    Forked,
    Central,
    PromotedKhan,
    AdventitiousKhan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub variant: Variant,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            color,
            kind,
            variant: Variant::None,
        }
    }

    pub const fn with_variant(color: Color, kind: PieceKind, variant: Variant) -> Self {
        Self {
            color,
            kind,
            variant,
        }
    }

    /// An ordinary pawn promoting to `target`.
    pub const fn pawn_of(color: Color, target: PieceKind) -> Self {
        Self {
            color,
            kind: PieceKind::Pawn,
            variant: Variant::PawnOf(target),
        }
    }

    /// Parses the two-or-three letter notation used for layouts, hashes and
    /// board printing: a color letter (`w`/`b`) followed by a piece code
    /// such as `Rk`, `Ka`, `pC` or `px`.
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let color = match chars.next()? {
            'w' => Color::White,
            'b' => Color::Black,
            _ => return None,
        };
        let kind_ch = chars.next()?;
        let variant_ch = chars.next()?;

        if kind_ch == 'p' {
            let variant = match variant_ch {
                '0' => Variant::OfPawns,
                'x' => Variant::Marked,
                '1' => Variant::Forked,
                '2' => Variant::Central,
                letter => Variant::PawnOf(kind_from_letter(letter)?),
            };
            return Some(Self::with_variant(color, PieceKind::Pawn, variant));
        }

        let kind = kind_from_letter(kind_ch)?;
        let variant = match (kind, variant_ch) {
            (PieceKind::Khan, '0') => Variant::PromotedKhan,
            (PieceKind::Khan, '1') => Variant::AdventitiousKhan,
            _ => Variant::None,
        };
        Some(Self::with_variant(color, kind, variant))
    }

    /// The notation this piece parses from.
    pub fn code(&self) -> String {
        let color = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let body = match (self.kind, self.variant) {
            (PieceKind::Pawn, Variant::PawnOf(target)) => {
                return format!("{}p{}", color, kind_letter(target));
            }
            (PieceKind::Pawn, Variant::Marked) => "px",
            (PieceKind::Pawn, Variant::Forked) => "p1",
            (PieceKind::Pawn, Variant::Central) => "p2",
            (PieceKind::Pawn, _) => "p0",
            (PieceKind::Khan, Variant::PromotedKhan) => "K0",
            (PieceKind::Khan, Variant::AdventitiousKhan) => "K1",
            (PieceKind::Khan, _) => "Ka",
            (PieceKind::Rook, _) => "Rk",
            (PieceKind::Talia, _) => "Ta",
            (PieceKind::Elephant, _) => "El",
            (PieceKind::Vizier, _) => "Vi",
            (PieceKind::WarEngine, _) => "We",
            (PieceKind::Admin, _) => "Ad",
            (PieceKind::Mongol, _) => "Mo",
            (PieceKind::Camel, _) => "Ca",
            (PieceKind::Giraffe, _) => "Gi",
        };
        format!("{color}{body}")
    }
}

fn kind_from_letter(letter: char) -> Option<PieceKind> {
    match letter {
        'R' => Some(PieceKind::Rook),
        'T' => Some(PieceKind::Talia),
        'E' => Some(PieceKind::Elephant),
        'V' => Some(PieceKind::Vizier),
        'K' => Some(PieceKind::Khan),
        'W' => Some(PieceKind::WarEngine),
        'A' => Some(PieceKind::Admin),
        'M' => Some(PieceKind::Mongol),
        'C' => Some(PieceKind::Camel),
        'G' => Some(PieceKind::Giraffe),
        _ => None,
    }
}

fn kind_letter(kind: PieceKind) -> char {
    match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Rook => 'R',
        PieceKind::Talia => 'T',
        PieceKind::Elephant => 'E',
        PieceKind::Vizier => 'V',
        PieceKind::Khan => 'K',
        PieceKind::WarEngine => 'W',
        PieceKind::Admin => 'A',
        PieceKind::Mongol => 'M',
        PieceKind::Camel => 'C',
        PieceKind::Giraffe => 'G',
    }
}
