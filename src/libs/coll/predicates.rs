//! Orderings and search keys shared by the collections.
//!
//! The bound predicates follow `slice::partition_point`: they return `true`
//! for every element that lies before the searched position.

use std::cmp::Ordering;

use crate::libs::flags::SearchDirection;
use crate::libs::range::{AlignRange, Position};

pub fn by_first_from_less(a: &AlignRange, b: &AlignRange) -> bool {
    a.first_from() < b.first_from()
}

pub fn cmp_by_first_from(a: &AlignRange, b: &AlignRange) -> Ordering {
    a.first_from().cmp(&b.first_from())
}

/// Sorted position for a new range: after every range starting before it.
pub fn first_from_before(r: &AlignRange, pos: Position) -> bool {
    r.first_from() < pos
}

/// Lower bound by the closed end: ranges lying entirely before `pos`.
pub fn first_to_before(r: &AlignRange, pos: Position) -> bool {
    r.first_to() < pos
}

/// Upper bound: ranges starting at or before `pos`.
pub fn first_from_not_after(r: &AlignRange, pos: Position) -> bool {
    r.first_from() <= pos
}

/// Lower bound on the second axis by the closed end.
pub fn second_to_before(r: &AlignRange, pos: Position) -> bool {
    r.second_to() < pos
}

/// A range that can stand in for `pos` on the second axis when no range
/// contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondCandidate {
    pub distance: Position,
    /// Second-axis position to translate from
    pub boundary: Position,
}

/// Checks whether `r` lies in the requested direction from `pos` on the
/// second axis and how far away its nearest boundary is.
pub fn second_candidate(
    r: &AlignRange,
    pos: Position,
    dir: SearchDirection,
) -> Option<SecondCandidate> {
    let seeks_right = dir.seeks_right_on_second(r.is_direct())?;
    if seeks_right {
        if r.second_from() > pos {
            return Some(SecondCandidate {
                distance: r.second_from() - pos,
                boundary: r.second_from(),
            });
        }
    } else if r.second_to() < pos {
        return Some(SecondCandidate {
            distance: pos - r.second_to(),
            boundary: r.second_to(),
        });
    }
    None
}
