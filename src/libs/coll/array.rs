use std::ops::Index;

use crate::libs::coll::list::ListCollection;
use crate::libs::coll::predicates::{
    cmp_by_first_from, first_from_before, first_from_not_after, first_to_before, second_candidate,
};
use crate::libs::coll::validate::{check_policy, validate_all, validate_ranges};
use crate::libs::coll::{
    enforce_policy, flags_after_erase, push_insertion, sort_insertions, RangeCollection,
};
use crate::libs::error::RangeError;
use crate::libs::flags::{Flags, SearchDirection};
use crate::libs::range::{AlignRange, Position};

/// Ranges stored contiguously in first-axis order.
///
/// Handles are indices into the vector; they shift when a range is inserted
/// or erased in front of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCollection {
    ranges: Vec<AlignRange>,
    insertions: Vec<AlignRange>,
    flags: Flags,
}

impl Default for ArrayCollection {
    fn default() -> Self {
        Self::new(Flags::DEFAULT_POLICY)
    }
}

impl ArrayCollection {
    pub fn new(policy: Flags) -> Self {
        Self {
            ranges: Vec::new(),
            insertions: Vec::new(),
            flags: policy.policy(),
        }
    }

    /// Takes over `ranges` as they are. Under `KEEP_NORMALIZED` the result is
    /// normalized right away.
    pub fn from_ranges(ranges: Vec<AlignRange>, policy: Flags) -> Result<Self, RangeError> {
        let mut coll = Self::new(policy);
        coll.ranges = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        coll.flags.insert(Flags::NOT_VALIDATED);
        if coll.is_set(Flags::KEEP_NORMALIZED) {
            coll.normalize()?;
        }
        Ok(coll)
    }

    /// Replaces the content with a copy of `other`: flags, ranges in list
    /// order and insertions.
    pub fn assign(&mut self, other: &ListCollection) {
        self.flags = other.flags();
        self.ranges = other.iter().copied().collect();
        self.insertions = other.insertions().to_vec();
    }

    pub fn as_slice(&self) -> &[AlignRange] {
        &self.ranges
    }

    pub fn get(&self, idx: usize) -> Option<&AlignRange> {
        self.ranges.get(idx)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.ranges.reserve(additional);
    }

    /// Inserts in front of `idx`.
    ///
    /// Without `KEEP_NORMALIZED` the range goes exactly there and the
    /// collection is marked for validation. With it, the range is merged into
    /// an abutting neighbour when possible and the policies are checked.
    pub fn insert_at(
        &mut self,
        idx: usize,
        range: AlignRange,
    ) -> Result<Option<usize>, RangeError> {
        if range.is_empty() {
            return Ok(None);
        }

        if !self.is_set(Flags::KEEP_NORMALIZED) {
            self.ranges.insert(idx, range);
            self.flags.insert(Flags::NOT_VALIDATED);
            return Ok(Some(idx));
        }

        let at = self.insert_merging(idx, range);

        let mut found = Flags::for_direction(range.is_direct());
        if at > 0 {
            found |= validate_ranges(&self.ranges[at - 1], &self.ranges[at]);
        }
        if at + 1 < self.ranges.len() {
            found |= validate_ranges(&self.ranges[at], &self.ranges[at + 1]);
        }
        self.flags |= found;

        enforce_policy(&mut self.flags, at, self.ranges[at])
    }

    // Returns the index holding `range` afterwards, merged or not.
    fn insert_merging(&mut self, idx: usize, range: AlignRange) -> usize {
        if !self.is_set(Flags::ALLOW_ABUTTING) {
            if idx > 0 && self.ranges[idx - 1].is_abutting(&range) {
                let at = idx - 1;
                self.ranges[at].combine_with_abutting(&range);
                log::trace!("merged {} into the left neighbour", range);

                // the new range may close the gap to the right one as well
                if idx < self.ranges.len() && self.ranges[at].is_abutting(&self.ranges[idx]) {
                    let right = self.ranges.remove(idx);
                    self.ranges[at].combine_with_abutting(&right);
                }
                return at;
            }
            if idx < self.ranges.len() && self.ranges[idx].is_abutting(&range) {
                self.ranges[idx].combine_with_abutting(&range);
                log::trace!("merged {} into the right neighbour", range);
                return idx;
            }
        }

        self.ranges.insert(idx, range);
        idx
    }
}

impl RangeCollection for ArrayCollection {
    type Handle = usize;

    fn flags(&self) -> Flags {
        self.flags
    }

    fn set_policy_flags(&mut self, policy: Flags) {
        self.flags.remove(Flags::POLICY_MASK);
        self.flags.insert(policy.policy());
        self.flags.insert(Flags::NOT_VALIDATED);
    }

    fn len(&self) -> usize {
        self.ranges.len()
    }

    fn iter(&self) -> impl Iterator<Item = &AlignRange> + Clone + '_ {
        self.ranges.iter()
    }

    fn front(&self) -> Option<&AlignRange> {
        self.ranges.first()
    }

    fn back(&self) -> Option<&AlignRange> {
        self.ranges.last()
    }

    fn range(&self, handle: usize) -> &AlignRange {
        &self.ranges[handle]
    }

    fn insert(&mut self, range: AlignRange) -> Result<Option<usize>, RangeError> {
        let idx = self
            .ranges
            .partition_point(|r| first_from_before(r, range.first_from()));
        self.insert_at(idx, range)
    }

    fn push_back(&mut self, range: AlignRange) -> Result<Option<usize>, RangeError> {
        self.insert_at(self.ranges.len(), range)
    }

    fn erase(&mut self, handle: usize) -> AlignRange {
        let removed = self.ranges.remove(handle);
        flags_after_erase(&mut self.flags, self.ranges.is_empty());
        removed
    }

    fn clear(&mut self) {
        self.ranges.clear();
        self.insertions.clear();
        self.flags = self.flags.policy();
    }

    fn lower_bound(&self, pos: Position) -> Option<usize> {
        let idx = self.ranges.partition_point(|r| first_to_before(r, pos));
        (idx < self.ranges.len()).then_some(idx)
    }

    fn upper_bound(&self, pos: Position) -> Option<usize> {
        let idx = self
            .ranges
            .partition_point(|r| first_from_not_after(r, pos));
        (idx < self.ranges.len()).then_some(idx)
    }

    fn sort(&mut self) {
        self.ranges.sort_by(cmp_by_first_from);
        sort_insertions(&mut self.insertions);
        self.flags.remove(Flags::UNSORTED);
        self.flags.insert(Flags::NOT_VALIDATED);
    }

    fn combine_abutting(&mut self) -> Result<(), RangeError> {
        if self.flags.intersects(Flags::UNSORTED | Flags::OVERLAP) {
            return Err(RangeError::InvalidOperation {
                op: "combine abutting ranges",
                flags: self.flags,
            });
        }

        let before = self.ranges.len();
        self.ranges.dedup_by(|next, prev| {
            if prev.is_abutting(next) {
                prev.combine_with_abutting(next);
                true
            } else {
                false
            }
        });

        self.flags.remove(Flags::ABUTTING);
        if self.ranges.len() != before {
            self.flags.insert(Flags::NOT_VALIDATED);
        }
        Ok(())
    }

    fn validate(&mut self) -> Flags {
        if self.flags.intersects(Flags::NOT_VALIDATED | Flags::INVALID) {
            self.flags.remove(Flags::DERIVED_MASK | Flags::NOT_VALIDATED);
            self.flags |= validate_all(&self.ranges);
            check_policy(&mut self.flags);
        }
        self.flags.state()
    }

    fn second_pos_by_first_pos(&self, pos: Position, dir: SearchDirection) -> Option<Position> {
        let idx = self.ranges.partition_point(|r| first_to_before(r, pos));
        if let Some(r) = self.ranges.get(idx) {
            if r.first_from() <= pos {
                return r.second_pos_by_first_pos(pos);
            }
        }

        match dir {
            SearchDirection::Forward | SearchDirection::Right => {
                let r = self.ranges.get(idx)?;
                r.second_pos_by_first_pos(r.first_from())
            }
            SearchDirection::Backward | SearchDirection::Left => {
                let r = self.ranges.get(idx.checked_sub(1)?)?;
                r.second_pos_by_first_pos(r.first_to())
            }
            SearchDirection::None => None,
        }
    }

    fn first_pos_by_second_pos(&self, pos: Position, dir: SearchDirection) -> Option<Position> {
        if let Some(found) = self
            .ranges
            .iter()
            .find_map(|r| r.first_pos_by_second_pos(pos))
        {
            return Some(found);
        }

        // equal distances go to the lower second position
        let (candidate, r) = self
            .ranges
            .iter()
            .filter_map(|r| second_candidate(r, pos, dir).map(|c| (c, r)))
            .min_by_key(|(c, _)| (c.distance, c.boundary))?;
        r.first_pos_by_second_pos(candidate.boundary)
    }

    fn insertions(&self) -> &[AlignRange] {
        &self.insertions
    }

    fn add_insertion(&mut self, range: &AlignRange) {
        push_insertion(&mut self.insertions, self.flags, range);
    }

    fn add_insertions<'a, I>(&mut self, ranges: I)
    where
        I: IntoIterator<Item = &'a AlignRange>,
    {
        if self.is_set(Flags::IGNORE_INSERTIONS) {
            return;
        }
        for range in ranges {
            push_insertion(&mut self.insertions, self.flags, range);
        }
        sort_insertions(&mut self.insertions);
    }
}

impl Index<usize> for ArrayCollection {
    type Output = AlignRange;

    fn index(&self, idx: usize) -> &AlignRange {
        &self.ranges[idx]
    }
}

impl From<&ListCollection> for ArrayCollection {
    fn from(other: &ListCollection) -> Self {
        let mut coll = ArrayCollection::new(other.policy_flags());
        coll.assign(other);
        coll
    }
}

impl<'a> IntoIterator for &'a ArrayCollection {
    type Item = &'a AlignRange;
    type IntoIter = std::slice::Iter<'a, AlignRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
