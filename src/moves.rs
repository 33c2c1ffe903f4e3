use std::{fmt, str::FromStr, sync::LazyLock};

use crate::error::ParseMoveError;

/// Number of trackable center facelets on a 4x4x4.
pub const SLOTS: usize = 24;

/// A permutation of the 24 center slots. Applying it to a state yields
/// `next[i] = state[perm[i]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permutation([u8; SLOTS]);

impl Permutation {
    pub const IDENTITY: Permutation = {
        let mut arr = [0; SLOTS];
        let mut i = 0;
        while i < SLOTS {
            arr[i] = i as u8;
            i += 1;
        }
        Permutation(arr)
    };

    /// Moves the facelet in `a` to `b`, `b` to `c`, `c` to `d` and `d` to `a`.
    fn cycle(&mut self, [a, b, c, d]: [usize; 4]) {
        let tmp = self.0[d];
        self.0[d] = self.0[c];
        self.0[c] = self.0[b];
        self.0[b] = self.0[a];
        self.0[a] = tmp;
    }

    /// The permutation equivalent to applying `self` and then `next`.
    #[must_use]
    pub fn then(&self, next: &Permutation) -> Permutation {
        let mut arr = [0; SLOTS];
        for (i, slot) in arr.iter_mut().enumerate() {
            *slot = self.0[next.0[i] as usize];
        }
        Permutation(arr)
    }

    #[must_use]
    pub fn power(&self, n: u8) -> Permutation {
        (0..n).fold(Permutation::IDENTITY, |acc, _| acc.then(self))
    }

    #[must_use]
    pub fn inverse(&self) -> Permutation {
        let mut arr = [0; SLOTS];
        for (i, &src) in self.0.iter().enumerate() {
            arr[src as usize] = i as u8;
        }
        Permutation(arr)
    }

    pub fn apply<T: Copy>(&self, slots: &[T; SLOTS]) -> [T; SLOTS] {
        std::array::from_fn(|i| slots[self.0[i] as usize])
    }

    /// Moves the set bits of a 24-bit slot mask the same way `apply` moves
    /// facelets.
    pub fn apply_mask(&self, mask: u32) -> u32 {
        let mut ret = 0;
        for (i, &src) in self.0.iter().enumerate() {
            ret |= ((mask >> src) & 1) << i;
        }
        ret
    }
}

/// The twelve layer bases, grouped by axis so that `index() / 4` is the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    Rw,
    Lw,
    R,
    L,
    Uw,
    Dw,
    U,
    D,
    Fw,
    Bw,
    F,
    B,
}

impl Base {
    pub const ALL: [Base; 12] = [
        Base::Rw,
        Base::Lw,
        Base::R,
        Base::L,
        Base::Uw,
        Base::Dw,
        Base::U,
        Base::D,
        Base::Fw,
        Base::Bw,
        Base::F,
        Base::B,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn axis(self) -> Axis {
        Axis::ALL[self.index() / 4]
    }

    pub fn name(self) -> &'static str {
        match self {
            Base::Rw => "Rw",
            Base::Lw => "Lw",
            Base::R => "R",
            Base::L => "L",
            Base::Uw => "Uw",
            Base::Dw => "Dw",
            Base::U => "U",
            Base::D => "D",
            Base::Fw => "Fw",
            Base::Bw => "Bw",
            Base::F => "F",
            Base::B => "B",
        }
    }

    fn from_name(name: &str) -> Option<Base> {
        Base::ALL.into_iter().find(|base| base.name() == name)
    }

    /// Facelets turned on the outer face plus, for wide moves, the two
    /// cycles carried along by the inner slice.
    fn cycles(self) -> &'static [[usize; 4]] {
        match self {
            Base::R => &[[8, 9, 11, 10]],
            Base::L => &[[16, 17, 19, 18]],
            Base::U => &[[0, 1, 3, 2]],
            Base::D => &[[12, 13, 15, 14]],
            Base::F => &[[4, 5, 7, 6]],
            Base::B => &[[20, 21, 23, 22]],
            Base::Rw => &[[8, 9, 11, 10], [5, 1, 22, 13], [7, 3, 20, 15]],
            Base::Lw => &[[16, 17, 19, 18], [0, 4, 12, 23], [2, 6, 14, 21]],
            Base::Uw => &[[0, 1, 3, 2], [4, 16, 20, 8], [5, 17, 21, 9]],
            Base::Dw => &[[12, 13, 15, 14], [6, 10, 22, 18], [7, 11, 23, 19]],
            Base::Fw => &[[4, 5, 7, 6], [2, 8, 13, 19], [3, 10, 12, 17]],
            Base::Bw => &[[20, 21, 23, 22], [1, 16, 14, 11], [0, 18, 15, 9]],
        }
    }

    /// The 90° permutation of this base.
    pub fn quarter_turn(self) -> Permutation {
        let mut perm = Permutation::IDENTITY;
        for &cycle in self.cycles() {
            perm.cycle(cycle);
        }
        perm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// The wide move that defines this rotation and its opposite wide move.
    fn wide_pair(self) -> (Base, Base) {
        match self {
            Axis::X => (Base::Rw, Base::Lw),
            Axis::Y => (Base::Uw, Base::Dw),
            Axis::Z => (Base::Fw, Base::Bw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Turn {
    Clockwise,
    Half,
    CounterClockwise,
}

impl Turn {
    pub const ALL: [Turn; 3] = [Turn::Clockwise, Turn::Half, Turn::CounterClockwise];

    /// Clockwise quarter turns, in `1..=3`.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Turn::Clockwise => 1,
            Turn::Half => 2,
            Turn::CounterClockwise => 3,
        }
    }

    /// `None` when the quarter turns cancel out.
    pub fn from_quarter_turns(n: i32) -> Option<Turn> {
        match n.rem_euclid(4) {
            1 => Some(Turn::Clockwise),
            2 => Some(Turn::Half),
            3 => Some(Turn::CounterClockwise),
            _ => None,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::Half => Turn::Half,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Half => "2",
            Turn::CounterClockwise => "'",
        }
    }
}

/// One token of move notation: a layer move or a whole-puzzle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    Layer(Base, Turn),
    Rotation(Axis, Turn),
}

impl Move {
    pub const LAYER_COUNT: usize = 36;
    pub const GENERATOR_COUNT: usize = 42;

    pub fn turn(self) -> Turn {
        match self {
            Move::Layer(_, turn) | Move::Rotation(_, turn) => turn,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Move::Layer(base, _) => base.axis(),
            Move::Rotation(axis, _) => axis,
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, Move::Rotation(..))
    }

    #[must_use]
    pub fn inverse(self) -> Move {
        match self {
            Move::Layer(base, turn) => Move::Layer(base, turn.inverse()),
            Move::Rotation(axis, turn) => Move::Rotation(axis, turn.inverse()),
        }
    }

    #[must_use]
    pub fn with_turn(self, turn: Turn) -> Move {
        match self {
            Move::Layer(base, _) => Move::Layer(base, turn),
            Move::Rotation(axis, _) => Move::Rotation(axis, turn),
        }
    }

    /// The two opposite wide moves a rotation is made of, `None` for layer
    /// moves.
    pub fn wide_moves(self) -> Option<[Move; 2]> {
        match self {
            Move::Layer(..) => None,
            Move::Rotation(axis, turn) => {
                let (wide, opposite) = axis.wide_pair();
                Some([
                    Move::Layer(wide, turn),
                    Move::Layer(opposite, turn.inverse()),
                ])
            }
        }
    }

    /// Whether the notation of this token starts with one of `prefixes`.
    pub fn starts_with_any(self, prefixes: &[String]) -> bool {
        let name = self.to_string();
        prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// A move is banned when it or its inverse matches, since inverted
    /// sequences are emitted alongside forward ones.
    pub fn is_banned(self, banned_prefixes: &[String]) -> bool {
        self.starts_with_any(banned_prefixes) || self.inverse().starts_with_any(banned_prefixes)
    }

    /// Dense index among the 42 generators: the 36 layer moves in base order
    /// followed by x x' y y' z z'. Half-turn rotations are not generators.
    pub fn generator_index(self) -> Option<usize> {
        match self {
            Move::Layer(base, turn) => Some(base.index() * 3 + turn.quarter_turns() as usize - 1),
            Move::Rotation(_, Turn::Half) => None,
            Move::Rotation(axis, Turn::Clockwise) => Some(Move::LAYER_COUNT + axis.index() * 2),
            Move::Rotation(axis, Turn::CounterClockwise) => {
                Some(Move::LAYER_COUNT + axis.index() * 2 + 1)
            }
        }
    }

    /// All 36 layer moves, in generator order.
    pub fn layer_moves() -> impl Iterator<Item = Move> {
        Base::ALL
            .into_iter()
            .flat_map(|base| Turn::ALL.map(|turn| Move::Layer(base, turn)))
    }

    /// All 42 generators, in generator order.
    pub fn generators() -> impl Iterator<Item = Move> {
        let rotations = Axis::ALL.into_iter().flat_map(|axis| {
            [
                Move::Rotation(axis, Turn::Clockwise),
                Move::Rotation(axis, Turn::CounterClockwise),
            ]
        });
        Move::layer_moves().chain(rotations)
    }

    pub fn permutation(self) -> &'static Permutation {
        MoveModel::get().permutation(self)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Move::Layer(base, _) => base.name(),
            Move::Rotation(axis, _) => axis.name(),
        };
        write!(f, "{}{}", name, self.turn().suffix())
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseMoveError::Empty);
        }
        let (name, turn) = if let Some(name) = s.strip_suffix('\'') {
            (name, Turn::CounterClockwise)
        } else if let Some(name) = s.strip_suffix('2') {
            (name, Turn::Half)
        } else {
            (s, Turn::Clockwise)
        };
        if let Some(axis) = Axis::ALL.into_iter().find(|axis| axis.name() == name) {
            return Ok(Move::Rotation(axis, turn));
        }
        Base::from_name(name)
            .map(|base| Move::Layer(base, turn))
            .ok_or_else(|| ParseMoveError::UnknownMove(s.to_owned()))
    }
}

/// Parses a whitespace separated move sequence such as `"x Rw2 U'"`.
pub fn parse_moves(s: &str) -> Result<Vec<Move>, ParseMoveError> {
    s.split_whitespace().map(str::parse).collect()
}

/// The permutation of a whole move sequence.
pub fn sequence_permutation(moves: &[Move]) -> Permutation {
    moves
        .iter()
        .fold(Permutation::IDENTITY, |acc, mv| acc.then(mv.permutation()))
}

/// Permutation tables for every layer move and rotation, built once.
pub struct MoveModel {
    layers: [[Permutation; 3]; 12],
    rotations: [[Permutation; 3]; 3],
}

static MOVE_MODEL: LazyLock<MoveModel> = LazyLock::new(MoveModel::build);

impl MoveModel {
    pub fn get() -> &'static MoveModel {
        &MOVE_MODEL
    }

    fn build() -> MoveModel {
        let layers = Base::ALL.map(|base| {
            let quarter = base.quarter_turn();
            [1, 2, 3].map(|n| quarter.power(n))
        });
        let rotations = Axis::ALL.map(|axis| {
            let (wide, opposite) = axis.wide_pair();
            let quarter = layers[wide.index()][0].then(&layers[opposite.index()][2]);
            [1, 2, 3].map(|n| quarter.power(n))
        });
        MoveModel { layers, rotations }
    }

    pub fn permutation(&self, mv: Move) -> &Permutation {
        match mv {
            Move::Layer(base, turn) => {
                &self.layers[base.index()][turn.quarter_turns() as usize - 1]
            }
            Move::Rotation(axis, turn) => {
                &self.rotations[axis.index()][turn.quarter_turns() as usize - 1]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_powers_close() {
        for base in Base::ALL {
            let quarter = base.quarter_turn();
            assert_eq!(quarter.power(4), Permutation::IDENTITY, "{base:?}");
            assert_eq!(
                quarter.then(&quarter),
                *Move::Layer(base, Turn::Half).permutation()
            );
            assert_eq!(
                quarter.inverse(),
                *Move::Layer(base, Turn::CounterClockwise).permutation()
            );
            assert_ne!(quarter, Permutation::IDENTITY);
        }
    }

    #[test]
    fn rotations_are_opposite_wide_moves() {
        let x = sequence_permutation(&parse_moves("Rw Lw'").unwrap());
        assert_eq!(x, *Move::Rotation(Axis::X, Turn::Clockwise).permutation());
        let y_prime = sequence_permutation(&parse_moves("Uw' Dw").unwrap());
        let y_prime_move: Move = "y'".parse().unwrap();
        assert_eq!(y_prime, *y_prime_move.permutation());
        for axis in Axis::ALL {
            let rotation = Move::Rotation(axis, Turn::Clockwise);
            let cw = rotation.permutation();
            let back = rotation.inverse().permutation();
            assert_eq!(cw.then(back), Permutation::IDENTITY);
            assert_eq!(cw.power(4), Permutation::IDENTITY);
        }
    }

    #[test]
    fn generators_are_distinct() {
        let generators: Vec<_> = Move::generators().collect();
        assert_eq!(generators.len(), Move::GENERATOR_COUNT);
        for (i, mv) in generators.iter().enumerate() {
            assert_eq!(mv.generator_index(), Some(i));
        }
        let perms: std::collections::HashSet<_> =
            generators.iter().map(|mv| *mv.permutation()).collect();
        assert_eq!(perms.len(), Move::GENERATOR_COUNT);
    }

    #[test]
    fn different_axes_do_not_commute() {
        let rw = Move::Layer(Base::Rw, Turn::Clockwise).permutation();
        let uw = Move::Layer(Base::Uw, Turn::Clockwise).permutation();
        assert_ne!(rw.then(uw), uw.then(rw));

        let lw = Move::Layer(Base::Lw, Turn::Clockwise).permutation();
        assert_eq!(rw.then(lw), lw.then(rw));
    }

    #[test]
    fn mask_follows_facelets() {
        let mv = Move::Layer(Base::Fw, Turn::Clockwise).permutation();
        let mut slots = [false; SLOTS];
        slots[..4].fill(true);
        let moved = mv.apply(&slots);
        let expected = moved
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &set)| acc | (u32::from(set) << i));
        assert_eq!(mv.apply_mask(0b1111), expected);
        assert_eq!(expected.count_ones(), 4);
    }

    #[test]
    fn rotations_spell_out_as_wide_moves() {
        for axis in Axis::ALL {
            for turn in Turn::ALL {
                let rotation = Move::Rotation(axis, turn);
                let wide = rotation.wide_moves().unwrap();
                assert_eq!(
                    sequence_permutation(&wide),
                    *rotation.permutation(),
                    "{rotation}"
                );
            }
        }
        assert_eq!(
            "x'".parse::<Move>().unwrap().wide_moves(),
            Some([
                Move::Layer(Base::Rw, Turn::CounterClockwise),
                Move::Layer(Base::Lw, Turn::Clockwise),
            ])
        );
        assert_eq!(Move::Layer(Base::U, Turn::Half).wide_moves(), None);
    }

    #[test]
    fn bans_cover_inverses() {
        let banned = vec!["Rw'".to_owned()];
        let rw = Move::Layer(Base::Rw, Turn::Clockwise);
        assert!(!rw.starts_with_any(&banned));
        assert!(rw.is_banned(&banned));
        assert!(rw.inverse().is_banned(&banned));
        assert!(!Move::Layer(Base::Rw, Turn::Half).is_banned(&banned));
        let r_prime = Move::Layer(Base::R, Turn::CounterClockwise);
        assert!(!r_prime.is_banned(&banned));
    }

    #[test]
    fn notation_round_trips() {
        let half_turns = [
            Move::Rotation(Axis::X, Turn::Half),
            Move::Rotation(Axis::Z, Turn::Half),
        ];
        for mv in Move::generators().chain(half_turns) {
            assert_eq!(mv.to_string().parse::<Move>(), Ok(mv));
        }
        assert_eq!(
            "Rw'".parse::<Move>(),
            Ok(Move::Layer(Base::Rw, Turn::CounterClockwise))
        );
        assert_eq!(
            "Q2".parse::<Move>(),
            Err(ParseMoveError::UnknownMove("Q2".to_owned()))
        );
        assert_eq!("".parse::<Move>(), Err(ParseMoveError::Empty));
    }
}
