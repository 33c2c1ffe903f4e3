use std::{fmt, str::FromStr};

use crate::{
    error::ParseStateError,
    moves::{Axis, Move, Permutation, Turn},
};

/// The six faces of the puzzle. Slots are laid out four per face in the
/// order U F R D L B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    U,
    D,
    F,
    B,
    R,
    L,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::D, Face::F, Face::B, Face::R, Face::L];

    /// Mask of the four U slots, the frame the pattern database is built in.
    pub const CANONICAL_MASK: u32 = 0b1111;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::F => Face::B,
            Face::B => Face::F,
            Face::R => Face::L,
            Face::L => Face::R,
        }
    }

    fn first_slot(self) -> usize {
        match self {
            Face::U => 0,
            Face::F => 4,
            Face::R => 8,
            Face::D => 12,
            Face::L => 16,
            Face::B => 20,
        }
    }

    pub fn slots(self) -> [usize; 4] {
        let first = self.first_slot();
        [first, first + 1, first + 2, first + 3]
    }

    pub fn mask(self) -> u32 {
        Face::CANONICAL_MASK << self.first_slot()
    }

    /// The rotation that carries this face's slots onto U.
    fn canonical_rotation(self) -> Option<Move> {
        match self {
            Face::U => None,
            Face::D => Some(Move::Rotation(Axis::X, Turn::Half)),
            Face::F => Some(Move::Rotation(Axis::X, Turn::Clockwise)),
            Face::B => Some(Move::Rotation(Axis::X, Turn::CounterClockwise)),
            Face::R => Some(Move::Rotation(Axis::Z, Turn::CounterClockwise)),
            Face::L => Some(Move::Rotation(Axis::Z, Turn::Clockwise)),
        }
    }

    /// Maps masks seen with this face as the target into the U frame used by
    /// the pattern database.
    pub fn transform(self) -> Permutation {
        self.canonical_rotation()
            .map_or(Permutation::IDENTITY, |mv| *mv.permutation())
    }

    /// Rotation prepended to setup sequences so playback shows this face in
    /// its display pose.
    pub fn anchor(self) -> Option<Move> {
        match self {
            Face::U => None,
            Face::D => Some(Move::Rotation(Axis::X, Turn::Half)),
            Face::F => Some(Move::Rotation(Axis::X, Turn::CounterClockwise)),
            Face::B => Some(Move::Rotation(Axis::X, Turn::Clockwise)),
            Face::R => Some(Move::Rotation(Axis::Z, Turn::Clockwise)),
            Face::L => Some(Move::Rotation(Axis::Z, Turn::CounterClockwise)),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
            Face::R => 'R',
            Face::L => 'L',
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Face {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Face::ALL
            .into_iter()
            .find(|face| upper.len() == 1 && upper.starts_with(face.letter()))
            .ok_or_else(|| ParseStateError::UnknownFace(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_carry_face_onto_u() {
        for face in Face::ALL {
            assert_eq!(
                face.transform().apply_mask(face.mask()),
                Face::CANONICAL_MASK,
                "{face}"
            );
        }
    }

    #[test]
    fn opposite_faces_pair_up() {
        for face in Face::ALL {
            assert_ne!(face, face.opposite());
            assert_eq!(face.opposite().opposite(), face);
            assert_eq!(face.mask() & face.opposite().mask(), 0);
        }
        let all = Face::ALL.iter().fold(0, |acc, face| acc | face.mask());
        assert_eq!(all, (1 << 24) - 1);
    }

    #[test]
    fn parses_letters() {
        assert_eq!("r".parse::<Face>(), Ok(Face::R));
        assert_eq!(" D ".parse::<Face>(), Ok(Face::D));
        assert!("UF".parse::<Face>().is_err());
    }
}
