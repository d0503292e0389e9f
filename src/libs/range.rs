use std::fmt;
use std::str::FromStr;

use crate::libs::error::RangeError;

/// Coordinate type shared by both axes.
pub type Position = i64;

/// A gap-free piece of an alignment: `length` positions starting at
/// `first_from` on the first sequence are aligned to `length` positions
/// starting at `second_from` on the second sequence.
///
/// Coordinates are 0-based, half-open `[from, to_open)`.
/// When the range is reversed, the first position of the first axis maps to
/// the last position of the second axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlignRange {
    first_from: Position,
    second_from: Position,
    length: Position,
    reversed: bool,
}

impl Default for AlignRange {
    fn default() -> Self {
        Self::empty()
    }
}

impl AlignRange {
    pub const EMPTY_FROM: Position = Position::MAX;
    pub const EMPTY_TO_OPEN: Position = Position::MAX;
    pub const EMPTY_TO: Position = Self::EMPTY_TO_OPEN - 1;
    pub const EMPTY_LENGTH: Position = 0;

    pub fn new(first_from: Position, second_from: Position, length: Position, direct: bool) -> Self {
        Self {
            first_from,
            second_from,
            length,
            reversed: !direct,
        }
    }

    pub fn direct(first_from: Position, second_from: Position, length: Position) -> Self {
        Self::new(first_from, second_from, length, true)
    }

    pub fn reversed(first_from: Position, second_from: Position, length: Position) -> Self {
        Self::new(first_from, second_from, length, false)
    }

    pub fn empty() -> Self {
        Self::new(Self::EMPTY_FROM, Self::EMPTY_FROM, Self::EMPTY_LENGTH, true)
    }

    pub fn first_from(&self) -> Position {
        self.first_from
    }

    pub fn first_to_open(&self) -> Position {
        self.first_from + self.length
    }

    pub fn first_to(&self) -> Position {
        self.first_to_open() - 1
    }

    pub fn second_from(&self) -> Position {
        self.second_from
    }

    pub fn second_to_open(&self) -> Position {
        self.second_from + self.length
    }

    pub fn second_to(&self) -> Position {
        self.second_to_open() - 1
    }

    pub fn length(&self) -> Position {
        self.length
    }

    pub fn is_direct(&self) -> bool {
        !self.reversed
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_empty(&self) -> bool {
        self.length <= 0
    }

    pub fn set_first_from(&mut self, pos: Position) {
        self.first_from = pos;
    }

    pub fn set_second_from(&mut self, pos: Position) {
        self.second_from = pos;
    }

    pub fn set_length(&mut self, length: Position) {
        self.length = length;
    }

    /// Moves the open end of the first axis, keeping `first_from` fixed.
    pub fn set_first_to_open(&mut self, pos: Position) {
        self.length = pos - self.first_from;
    }

    pub fn set_direct(&mut self, direct: bool) {
        self.reversed = !direct;
    }

    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    pub fn first_range(&self) -> std::ops::Range<Position> {
        self.first_from..self.first_to_open()
    }

    pub fn second_range(&self) -> std::ops::Range<Position> {
        self.second_from..self.second_to_open()
    }

    pub fn first_contains(&self, pos: Position) -> bool {
        pos >= self.first_from && pos < self.first_to_open()
    }

    pub fn second_contains(&self, pos: Position) -> bool {
        pos >= self.second_from && pos < self.second_to_open()
    }

    /// Two ranges abut when they touch on the first axis and continue each
    /// other on the second axis with the same orientation.
    pub fn is_abutting(&self, other: &AlignRange) -> bool {
        if self.is_direct() != other.is_direct() || self.length < 0 || other.length < 0 {
            return false;
        }

        let (left, right) = if self.first_from <= other.first_from {
            (self, other)
        } else {
            (other, self)
        };

        if left.first_to_open() != right.first_from {
            return false;
        }

        if left.is_direct() {
            left.second_to_open() == right.second_from
        } else {
            right.second_to_open() == left.second_from
        }
    }

    /// Extends `self` so that it also covers `other`.
    /// `other` must abut `self`.
    pub fn combine_with_abutting(&mut self, other: &AlignRange) -> &mut Self {
        debug_assert!(self.is_abutting(other), "{} does not abut {}", self, other);

        self.length += other.length;
        if self.first_from <= other.first_from {
            // other extends to the right on the first axis
            if self.is_reversed() {
                self.second_from = other.second_from;
            }
        } else {
            self.first_from = other.first_from;
            if self.is_direct() {
                self.second_from = other.second_from;
            }
        }
        self
    }

    /// Clips `self` to the part overlapping `other` on the first axis.
    /// The result is empty when they do not intersect.
    pub fn intersect_first(&self, other: &AlignRange) -> AlignRange {
        let from = self.first_from.max(other.first_from);
        let to_open = self.first_to_open().min(other.first_to_open());
        if from >= to_open {
            return AlignRange::empty();
        }

        let length = to_open - from;
        let second_from = if self.is_direct() {
            self.second_from + (from - self.first_from)
        } else {
            self.second_from + (self.first_to_open() - to_open)
        };
        AlignRange::new(from, second_from, length, self.is_direct())
    }

    pub fn second_pos_by_first_pos(&self, pos: Position) -> Option<Position> {
        if !self.first_contains(pos) {
            return None;
        }
        let offset = pos - self.first_from;
        if self.is_direct() {
            Some(self.second_from + offset)
        } else {
            Some(self.second_to() - offset)
        }
    }

    pub fn first_pos_by_second_pos(&self, pos: Position) -> Option<Position> {
        if !self.second_contains(pos) {
            return None;
        }
        let offset = if self.is_direct() {
            pos - self.second_from
        } else {
            self.second_to() - pos
        };
        Some(self.first_from + offset)
    }
}

impl fmt::Display for AlignRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.first_from,
            self.second_from,
            self.length,
            if self.is_direct() { '+' } else { '-' }
        )
    }
}

/// Parses `FIRST:SECOND:LENGTH` with an optional `:+` or `:-` suffix.
impl FromStr for AlignRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || RangeError::ParseRange(s.to_string());

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(bad());
        }

        let first_from = parts[0].parse::<Position>().map_err(|_| bad())?;
        let second_from = parts[1].parse::<Position>().map_err(|_| bad())?;
        let length = parts[2].parse::<Position>().map_err(|_| bad())?;
        if length < 0 {
            return Err(bad());
        }

        let direct = match parts.get(3) {
            None | Some(&"+") => true,
            Some(&"-") => false,
            Some(_) => return Err(bad()),
        };

        Ok(AlignRange::new(first_from, second_from, length, direct))
    }
}
