use rand::Rng;
use std::{fmt, str::FromStr};

use crate::{
    error::{InputError, ParseStateError},
    face::Face,
    moves::{Move, SLOTS},
};

/// An opaque colour mark. The first six ids have palette letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(pub u8);

impl Color {
    pub const WHITE: Color = Color(0);
    pub const YELLOW: Color = Color(1);
    pub const GREEN: Color = Color(2);
    pub const BLUE: Color = Color(3);
    pub const RED: Color = Color(4);
    pub const ORANGE: Color = Color(5);

    const LETTERS: [char; 6] = ['W', 'Y', 'G', 'B', 'R', 'O'];

    pub fn letter(self) -> Option<char> {
        Color::LETTERS.get(self.0 as usize).copied()
    }

    pub fn from_letter(letter: char) -> Option<Color> {
        let upper = letter.to_ascii_uppercase();
        Color::LETTERS
            .iter()
            .position(|&l| l == upper)
            .map(|id| Color(id as u8))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.letter() {
            Some(letter) => write!(f, "{letter}"),
            None => write!(f, "#{}", self.0),
        }
    }
}

/// Colour assignment of the 24 center slots; `None` is an unpainted slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    facelets: [Option<Color>; SLOTS],
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleState {
    pub fn new() -> Self {
        Self {
            facelets: [None; SLOTS],
        }
    }

    pub fn from_facelets(facelets: [Option<Color>; SLOTS]) -> Self {
        Self { facelets }
    }

    /// `target_color` fills `target`, `opposite_color` fills the opposite
    /// face and every other slot is unset.
    pub fn solved(target: Face, target_color: Color, opposite_color: Color) -> Self {
        let mut state = Self::new();
        for slot in target.slots() {
            state.facelets[slot] = Some(target_color);
        }
        for slot in target.opposite().slots() {
            state.facelets[slot] = Some(opposite_color);
        }
        state
    }

    pub fn get(&self, slot: usize) -> Option<Color> {
        self.facelets[slot]
    }

    pub fn set(&mut self, slot: usize, color: Option<Color>) {
        self.facelets[slot] = color;
    }

    pub fn apply_move(&mut self, mv: Move) {
        self.facelets = mv.permutation().apply(&self.facelets);
    }

    pub fn apply_moves(&mut self, moves: &[Move]) {
        for &mv in moves {
            self.apply_move(mv);
        }
    }

    /// Applies `len` uniformly random layer moves and returns them.
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R, len: usize) -> Vec<Move> {
        let layer_moves: Vec<Move> = Move::layer_moves().collect();
        let scramble: Vec<Move> = (0..len)
            .map(|_| layer_moves[rng.gen_range(0..layer_moves.len())])
            .collect();
        self.apply_moves(&scramble);
        scramble
    }

    /// Bit `i` is set when slot `i` holds `color`.
    pub fn mask(&self, color: Color) -> u32 {
        self.facelets
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == Some(color))
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    pub fn count(&self, color: Color) -> usize {
        self.facelets.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Facelet counts indexed by colour id, covering at least the palette.
    pub fn color_counts(&self) -> Vec<usize> {
        let len = self
            .facelets
            .iter()
            .flatten()
            .map(|c| c.0 as usize + 1)
            .max()
            .unwrap_or(0)
            .max(Color::LETTERS.len());
        let mut counts = vec![0; len];
        for color in self.facelets.iter().flatten() {
            counts[color.0 as usize] += 1;
        }
        counts
    }

    /// Picks the two colours to solve: white and yellow if both are complete,
    /// otherwise the only two colours that have exactly four facelets.
    pub fn detect_color_pair(&self) -> Result<(Color, Color), InputError> {
        let counts = self.color_counts();
        if counts[Color::WHITE.0 as usize] == 4 && counts[Color::YELLOW.0 as usize] == 4 {
            return Ok((Color::WHITE, Color::YELLOW));
        }
        let complete: Vec<Color> = counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == 4)
            .map(|(id, _)| Color(id as u8))
            .collect();
        match complete[..] {
            [target, opposite] => Ok((target, opposite)),
            _ => Err(InputError::NoColorPair(counts)),
        }
    }

    pub fn is_solved(&self, target: Face, (target_color, opposite_color): (Color, Color)) -> bool {
        target
            .slots()
            .iter()
            .all(|&slot| self.facelets[slot] == Some(target_color))
            && target
                .opposite()
                .slots()
                .iter()
                .all(|&slot| self.facelets[slot] == Some(opposite_color))
    }
}

/// Reads 24 palette letters (`.` for unset) in slot order; whitespace is
/// ignored.
impl FromStr for PuzzleState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if letters.len() != SLOTS {
            return Err(ParseStateError::WrongLength(letters.len()));
        }
        let mut state = Self::new();
        for (slot, &letter) in letters.iter().enumerate() {
            state.facelets[slot] = match letter {
                '.' => None,
                _ => Color::from_letter(letter)
                    .map(Some)
                    .ok_or(ParseStateError::UnknownColor(letter))?,
            };
        }
        Ok(state)
    }
}

const DISPLAY_ORDER: [Face; 6] = [Face::U, Face::F, Face::R, Face::D, Face::L, Face::B];

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = |slot: usize| {
            self.facelets[slot]
                .map_or_else(|| ".".to_owned(), |color| color.to_string())
        };
        for row in 0..2 {
            for face in DISPLAY_ORDER {
                let slots = face.slots();
                let label = if row == 0 { face.letter() } else { ' ' };
                write!(
                    f,
                    "{} {:>2} {:>2}   ",
                    label,
                    cell(slots[row * 2]),
                    cell(slots[row * 2 + 1])
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
