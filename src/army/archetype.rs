//! Piece archetypes and their combat attributes.
//!
//! The table is fixed at compile time: eight archetypes, indexed 0..7,
//! each with float attack, defense and speed, a derived kill rate and a
//! ranged flag.

/// Number of piece archetypes.
pub const PIECE_TYPE_COUNT: usize = 8;

/// Returned when a piece-type identifier is outside 0..8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid piece archetype id: {0}")]
pub struct InvalidArchetype(pub usize);

/// Identifier of one of the eight piece archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceType {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
}

/// All archetypes in index order.
pub const ALL_PIECE_TYPES: [PieceType; PIECE_TYPE_COUNT] = [
    PieceType::P1,
    PieceType::P2,
    PieceType::P3,
    PieceType::P4,
    PieceType::P5,
    PieceType::P6,
    PieceType::P7,
    PieceType::P8,
];

impl PieceType {
    /// Returns the zero-based table index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parses a piece type from its zero-based table index.
    pub fn from_index(idx: usize) -> Result<PieceType, InvalidArchetype> {
        ALL_PIECE_TYPES
            .get(idx)
            .copied()
            .ok_or(InvalidArchetype(idx))
    }

    /// Returns the one-based digit used in salvo notation ('1'..'8').
    pub const fn digit(self) -> char {
        (b'1' + self as u8) as char
    }

    /// Parses a piece type from its one-based salvo digit.
    pub fn from_digit(c: char) -> Option<PieceType> {
        let d = c.to_digit(10)? as usize;
        if d == 0 {
            return None;
        }
        PieceType::from_index(d - 1).ok()
    }

    /// Human-readable label, e.g. "P3".
    pub const fn label(self) -> &'static str {
        match self {
            PieceType::P1 => "P1",
            PieceType::P2 => "P2",
            PieceType::P3 => "P3",
            PieceType::P4 => "P4",
            PieceType::P5 => "P5",
            PieceType::P6 => "P6",
            PieceType::P7 => "P7",
            PieceType::P8 => "P8",
        }
    }

    /// Returns the combat attributes for this piece type.
    pub fn archetype(self) -> &'static PieceArchetype {
        &ARCHETYPES[self.index()]
    }
}

/// Immutable combat attributes of a piece archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceArchetype {
    pub piece_type: PieceType,
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub is_ranged: bool,
}

impl PieceArchetype {
    const fn new(piece_type: PieceType, attack: f64, defense: f64, speed: f64, is_ranged: bool) -> Self {
        PieceArchetype {
            piece_type,
            attack,
            defense,
            speed,
            is_ranged,
        }
    }

    /// Expected units of an even-strength enemy destroyed per unit per phase.
    pub fn kill_rate(&self) -> f64 {
        self.attack / self.defense
    }
}

/// The archetype table, indexed by `PieceType as usize`.
pub static ARCHETYPES: [PieceArchetype; PIECE_TYPE_COUNT] = [
    PieceArchetype::new(PieceType::P1, 4.0, 7.0, 85.0, false),
    PieceArchetype::new(PieceType::P2, 3.0, 5.0, 86.0, true),
    PieceArchetype::new(PieceType::P3, 5.0, 9.0, 95.0, false),
    PieceArchetype::new(PieceType::P4, 5.0, 7.0, 84.0, true),
    PieceArchetype::new(PieceType::P5, 18.0, 8.0, 80.0, false),
    PieceArchetype::new(PieceType::P6, 10.0, 7.0, 98.0, true),
    PieceArchetype::new(PieceType::P7, 24.0, 16.0, 88.0, false),
    PieceArchetype::new(PieceType::P8, 19.0, 13.0, 90.0, true),
];

/// Looks up an archetype by zero-based type id.
pub fn archetype_of(type_id: usize) -> Result<&'static PieceArchetype, InvalidArchetype> {
    ARCHETYPES.get(type_id).ok_or(InvalidArchetype(type_id))
}
