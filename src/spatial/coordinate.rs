//! Integer grid coordinates and the four axis-aligned directions
//!
//! The same coordinate type addresses cells inside a chunk (origin at the chunk
//! center) and chunks on the unbounded chunk grid.

use std::fmt;
use std::ops::{Add, Sub};

/// Integer 2D vector used for chunk-local cells and chunk-grid positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coordinate {
    /// Horizontal component (increases to the right)
    pub x: i32,
    /// Vertical component (increases upward)
    pub y: i32,
}

impl Coordinate {
    /// The origin
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a coordinate from its components
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring coordinate one unit step in `direction`
    pub const fn offset(self, direction: Direction) -> Self {
        let step = direction.vector();
        Self {
            x: self.x + step.x,
            y: self.y + step.y,
        }
    }

    /// The four 4-connected neighbors in canonical direction order
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        Direction::ALL.into_iter().map(move |d| self.offset(d))
    }

    /// Whether `other` is exactly one axis-aligned unit step away
    pub const fn is_adjacent(self, other: Self) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Direction> for Coordinate {
    type Output = Self;

    fn add(self, rhs: Direction) -> Self {
        self.offset(rhs)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four axis-aligned unit directions, also naming a chunk edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// +y
    Up,
    /// -y
    Down,
    /// -x
    Left,
    /// +x
    Right,
}

impl Direction {
    /// Canonical enumeration order, shared by path steps and side queries
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit vector of this direction
    pub const fn vector(self) -> Coordinate {
        match self {
            Self::Up => Coordinate::new(0, 1),
            Self::Down => Coordinate::new(0, -1),
            Self::Left => Coordinate::new(-1, 0),
            Self::Right => Coordinate::new(1, 0),
        }
    }

    /// The direction pointing the other way
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the direction moves along the x axis
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Up => 0b0001,
            Self::Down => 0b0010,
            Self::Left => 0b0100,
            Self::Right => 0b1000,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Small set of directions, iterated in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// The empty set
    pub const EMPTY: Self = Self(0);

    /// All four directions
    pub const ALL: Self = Self(0b1111);

    /// Whether `direction` is a member
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Add `direction`, returning whether it was absent
    pub const fn insert(&mut self, direction: Direction) -> bool {
        let absent = !self.contains(direction);
        self.0 |= direction.bit();
        absent
    }

    /// Remove `direction`, returning whether it was present
    pub const fn remove(&mut self, direction: Direction) -> bool {
        let present = self.contains(direction);
        self.0 &= !direction.bit();
        present
    }

    /// Set with `direction` removed
    pub const fn without(mut self, direction: Direction) -> Self {
        self.remove(direction);
        self
    }

    /// Number of members
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no members
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in canonical order
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

impl fmt::Display for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, direction) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{direction}")?;
        }
        f.write_str("}")
    }
}
