//! Collections of aligned ranges.
//!
//! A collection maps coordinates between two sequences through a set of
//! [`AlignRange`]s kept in first-axis order, and enforces the policies given
//! by its [`Flags`].
//!
//! # Implementations
//!
//! * [`ArrayCollection`] - ranges in a `Vec`. Cheap to append and iterate;
//!   inserting in the middle is O(n). Second-axis lookups scan every range.
//! * [`ListCollection`] - ranges in a linked list over a slot arena, with
//!   ordered indices by first and by second start. O(log n) insert, erase and
//!   lookup on both axes.
//!
//! Both implement [`RangeCollection`].
//!
//! # Life cycle
//!
//! 1. Ranges are added with `insert`/`push_back`. With
//!    [`Flags::KEEP_NORMALIZED`] every insert merges abutting neighbours and
//!    checks the policies, failing with [`RangeError::PolicyViolation`] (the
//!    range stays inserted).
//! 2. `normalize()` sorts, merges abutting ranges and validates.
//! 3. `find`, `second_pos_by_first_pos` and `first_pos_by_second_pos` query
//!    the result.

pub mod array;
pub mod list;
pub mod predicates;
pub mod validate;

pub use array::ArrayCollection;
pub use list::{ListCollection, RangeId};
pub use validate::{check_policy, validate_all, validate_ranges};

use std::fmt;

use crate::libs::error::RangeError;
use crate::libs::flags::{Flags, SearchDirection};
use crate::libs::range::{AlignRange, Position};

/// Common contract of the range collections.
///
/// `Handle` designates a stored range: an index for [`ArrayCollection`], a
/// slot id for [`ListCollection`]. Positional queries return `None` for the
/// end position.
pub trait RangeCollection {
    type Handle: Copy + Eq + fmt::Debug;

    fn flags(&self) -> Flags;

    /// Replaces the policy bits. The collection has to be validated again.
    fn set_policy_flags(&mut self, policy: Flags);

    fn is_set(&self, flags: Flags) -> bool {
        self.flags().contains(flags)
    }

    fn policy_flags(&self) -> Flags {
        self.flags().policy()
    }

    fn state_flags(&self) -> Flags {
        self.flags().state()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ranges in storage order.
    fn iter(&self) -> impl Iterator<Item = &AlignRange> + Clone + '_;

    fn front(&self) -> Option<&AlignRange>;

    fn back(&self) -> Option<&AlignRange>;

    /// The range behind a handle. Panics on a handle that is not live.
    fn range(&self, handle: Self::Handle) -> &AlignRange;

    /// Inserts at the sorted position. Zero-length ranges are ignored and
    /// give `Ok(None)`.
    fn insert(&mut self, range: AlignRange) -> Result<Option<Self::Handle>, RangeError>;

    /// Appends after the last range.
    fn push_back(&mut self, range: AlignRange) -> Result<Option<Self::Handle>, RangeError>;

    fn erase(&mut self, handle: Self::Handle) -> AlignRange;

    /// Removes all ranges and insertions and resets the state bits.
    fn clear(&mut self);

    /// The range containing `pos` on the first axis.
    fn find(&self, pos: Position) -> Option<Self::Handle> {
        match self.find_2(pos) {
            (handle, true) => handle,
            _ => None,
        }
    }

    /// The range containing `pos`, or the one after where it would be,
    /// with a flag telling which.
    fn find_2(&self, pos: Position) -> (Option<Self::Handle>, bool) {
        let handle = self.lower_bound(pos);
        let contains = handle.map_or(false, |h| self.range(h).first_from() <= pos);
        (handle, contains)
    }

    /// First range not lying entirely before `pos`.
    fn lower_bound(&self, pos: Position) -> Option<Self::Handle>;

    /// First range starting after `pos`.
    fn upper_bound(&self, pos: Position) -> Option<Self::Handle>;

    fn sort(&mut self);

    fn combine_abutting(&mut self) -> Result<(), RangeError>;

    /// Recomputes the state bits if the collection changed since the last
    /// validation or was found invalid. Returns the state bits.
    fn validate(&mut self) -> Flags;

    /// Sort, merge abutting ranges, validate.
    ///
    /// Abutting ranges are merged even when `ALLOW_ABUTTING` is set; that
    /// policy only keeps them apart on insert. Merging is skipped when
    /// overlaps are allowed and present. Overlaps that are not allowed make
    /// the merge step fail.
    fn normalize(&mut self) -> Result<Flags, RangeError> {
        self.sort();
        self.validate();

        if !self.is_set(Flags::ALLOW_OVERLAP | Flags::OVERLAP) {
            self.combine_abutting()?;
        }

        let state = self.validate();
        log::debug!("normalized {} ranges, state {}", self.len(), state);
        Ok(state)
    }

    fn second_pos_by_first_pos(&self, pos: Position, dir: SearchDirection) -> Option<Position>;

    fn first_pos_by_second_pos(&self, pos: Position, dir: SearchDirection) -> Option<Position>;

    fn insertions(&self) -> &[AlignRange];

    /// Records unaligned material on the second sequence. Dropped when
    /// insertions are ignored or the range is empty.
    fn add_insertion(&mut self, range: &AlignRange);

    /// Adds several insertions and keeps them sorted.
    fn add_insertions<'a, I>(&mut self, ranges: I)
    where
        I: IntoIterator<Item = &'a AlignRange>;

    fn first_from(&self) -> Position {
        self.front()
            .map_or(AlignRange::EMPTY_FROM, |r| r.first_from())
    }

    fn first_to_open(&self) -> Position {
        self.back()
            .map_or(AlignRange::EMPTY_TO_OPEN, |r| r.first_to_open())
    }

    fn first_to(&self) -> Position {
        self.back().map_or(AlignRange::EMPTY_TO, |r| r.first_to())
    }

    fn first_length(&self) -> Position {
        if self.is_empty() {
            AlignRange::EMPTY_LENGTH
        } else {
            self.first_to_open() - self.first_from()
        }
    }

    fn first_range(&self) -> std::ops::Range<Position> {
        self.first_from()..self.first_to_open()
    }
}

// Insertion bookkeeping shared by both collections.
pub(crate) fn push_insertion(insertions: &mut Vec<AlignRange>, flags: Flags, range: &AlignRange) {
    if flags.contains(Flags::IGNORE_INSERTIONS) || range.is_empty() {
        return;
    }
    let mut ins = *range;
    ins.set_direct(true);
    insertions.push(ins);
}

pub(crate) fn sort_insertions(insertions: &mut [AlignRange]) {
    insertions.sort_by(predicates::cmp_by_first_from);
}

// Turns the policy check after a normalized insert into the insert result.
pub(crate) fn enforce_policy<H>(
    flags: &mut Flags,
    handle: H,
    stored: AlignRange,
) -> Result<Option<H>, RangeError> {
    if check_policy(flags) {
        Ok(Some(handle))
    } else {
        log::warn!("policy violated by {}: {}", stored, flags.state());
        Err(RangeError::PolicyViolation {
            range: stored,
            flags: *flags,
        })
    }
}

/// Flags left after erasing a range.
pub(crate) fn flags_after_erase(flags: &mut Flags, now_empty: bool) {
    if flags.contains(Flags::INVALID) {
        flags.insert(Flags::NOT_VALIDATED);
    }
    if now_empty {
        flags.remove(Flags::STATE_MASK);
    }
}
