use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};
use std::ops::Index;

use crate::libs::coll::array::ArrayCollection;
use crate::libs::coll::predicates::second_candidate;
use crate::libs::coll::validate::{check_policy, validate_all, validate_ranges};
use crate::libs::coll::{
    enforce_policy, flags_after_erase, push_insertion, sort_insertions, RangeCollection,
};
use crate::libs::error::RangeError;
use crate::libs::flags::{Flags, SearchDirection};
use crate::libs::range::{AlignRange, Position};

/// Handle of a range stored in a [`ListCollection`].
///
/// Stays valid until the range is erased or merged away; a slot may be
/// reused afterwards, so stale handles must not be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeId(u32);

impl RangeId {
    const MIN: RangeId = RangeId(0);
    const MAX: RangeId = RangeId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node {
    range: AlignRange,
    prev: Option<RangeId>,
    next: Option<RangeId>,
    alive: bool,
}

/// Ranges in a doubly linked list with two ordered indices.
///
/// The list keeps the storage order, which is the first-axis order once the
/// collection is sorted. `by_first` and `by_second` hold `(start, id)` pairs
/// for every live range, so lookups on both axes are O(log n) and sorting is
/// a single relinking pass.
#[derive(Debug, Clone)]
pub struct ListCollection {
    /// Node arena, indexed by `RangeId`
    nodes: Vec<Node>,
    /// Free slots for reuse
    free_list: Vec<u32>,
    head: Option<RangeId>,
    tail: Option<RangeId>,
    len: usize,
    n_reversed: usize,

    by_first: BTreeSet<(Position, RangeId)>,
    by_second: BTreeSet<(Position, RangeId)>,

    insertions: Vec<AlignRange>,
    flags: Flags,

    /// Ranges in list order for positional access; built on demand
    flat: OnceCell<Vec<AlignRange>>,
}

impl Default for ListCollection {
    fn default() -> Self {
        Self::new(Flags::DEFAULT_POLICY)
    }
}

impl ListCollection {
    pub fn new(policy: Flags) -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            n_reversed: 0,
            by_first: BTreeSet::new(),
            by_second: BTreeSet::new(),
            insertions: Vec::new(),
            flags: policy.policy(),
            flat: OnceCell::new(),
        }
    }

    /// Takes over `ranges` in the given order. Under `KEEP_NORMALIZED` the
    /// result is normalized right away.
    pub fn from_ranges(ranges: Vec<AlignRange>, policy: Flags) -> Result<Self, RangeError> {
        let mut coll = Self::new(policy);
        for range in ranges.into_iter().filter(|r| !r.is_empty()) {
            coll.x_insert(None, range);
        }
        coll.flags.insert(Flags::NOT_VALIDATED);
        if coll.is_set(Flags::KEEP_NORMALIZED) {
            coll.normalize()?;
        }
        Ok(coll)
    }

    //----------------------------
    // Navigation
    //----------------------------
    pub fn front_id(&self) -> Option<RangeId> {
        self.head
    }

    pub fn back_id(&self) -> Option<RangeId> {
        self.tail
    }

    pub fn next(&self, id: RangeId) -> Option<RangeId> {
        self.node(id).next
    }

    pub fn prev(&self, id: RangeId) -> Option<RangeId> {
        self.node(id).prev
    }

    /// Handles in list order.
    pub fn iter_ids(&self) -> IdIter<'_> {
        IdIter {
            coll: self,
            cur: self.head,
            remaining: self.len,
        }
    }

    /// Ranges in list order as a slice, built on first use.
    pub fn as_slice(&self) -> &[AlignRange] {
        self.flat.get_or_init(|| self.iter().copied().collect())
    }

    /// The `idx`-th range in list order.
    pub fn get(&self, idx: usize) -> Option<&AlignRange> {
        self.as_slice().get(idx)
    }

    /// The range containing `pos` on the second axis.
    pub fn find_by_second(&self, pos: Position) -> Option<RangeId> {
        let &(_, id) = self.by_second.range(..=(pos, RangeId::MAX)).next_back()?;
        self.node(id).range.second_contains(pos).then_some(id)
    }

    /// Inserts in front of `before` (at the end for `None`).
    ///
    /// Same rules as [`ArrayCollection::insert_at`].
    pub fn insert_before(
        &mut self,
        before: Option<RangeId>,
        range: AlignRange,
    ) -> Result<Option<RangeId>, RangeError> {
        if range.is_empty() {
            return Ok(None);
        }

        if !self.is_set(Flags::KEEP_NORMALIZED) {
            let id = self.x_insert(before, range);
            self.flags.insert(Flags::NOT_VALIDATED);
            return Ok(Some(id));
        }

        let at = self.insert_merging(before, range);

        let mut found = Flags::for_direction(range.is_direct());
        if let Some(prev) = self.node(at).prev {
            found |= validate_ranges(&self.node(prev).range, &self.node(at).range);
        }
        if let Some(next) = self.node(at).next {
            found |= validate_ranges(&self.node(at).range, &self.node(next).range);
        }
        self.flags |= found;

        let stored = self.node(at).range;
        enforce_policy(&mut self.flags, at, stored)
    }

    fn insert_merging(&mut self, before: Option<RangeId>, range: AlignRange) -> RangeId {
        if !self.is_set(Flags::ALLOW_ABUTTING) {
            let left = match before {
                Some(id) => self.node(id).prev,
                None => self.tail,
            };

            if let Some(left) = left.filter(|&id| self.node(id).range.is_abutting(&range)) {
                self.update_range(left, |r| {
                    r.combine_with_abutting(&range);
                });
                log::trace!("merged {} into the left neighbour", range);

                if let Some(right) =
                    before.filter(|&id| self.node(left).range.is_abutting(&self.node(id).range))
                {
                    let dead = self.x_erase(right);
                    self.update_range(left, |r| {
                        r.combine_with_abutting(&dead);
                    });
                }
                return left;
            }

            if let Some(right) = before.filter(|&id| self.node(id).range.is_abutting(&range)) {
                self.update_range(right, |r| {
                    r.combine_with_abutting(&range);
                });
                log::trace!("merged {} into the right neighbour", range);
                return right;
            }
        }

        self.x_insert(before, range)
    }

    //----------------------------
    // Arena and indices
    //----------------------------
    fn node(&self, id: RangeId) -> &Node {
        let node = &self.nodes[id.index()];
        debug_assert!(node.alive, "dead range handle {:?}", id);
        node
    }

    fn node_mut(&mut self, id: RangeId) -> &mut Node {
        let node = &mut self.nodes[id.index()];
        debug_assert!(node.alive, "dead range handle {:?}", id);
        node
    }

    fn alloc(&mut self, range: AlignRange) -> RangeId {
        let node = Node {
            range,
            prev: None,
            next: None,
            alive: true,
        };
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = node;
            RangeId(idx)
        } else {
            let idx = self.nodes.len() as u32;
            self.nodes.push(node);
            RangeId(idx)
        }
    }

    fn free(&mut self, id: RangeId) {
        self.nodes[id.index()].alive = false;
        self.free_list.push(id.0);
    }

    fn index_node(&mut self, id: RangeId) {
        let range = self.node(id).range;
        self.by_first.insert((range.first_from(), id));
        self.by_second.insert((range.second_from(), id));
    }

    fn unindex_node(&mut self, id: RangeId) {
        let range = self.node(id).range;
        let in_first = self.by_first.remove(&(range.first_from(), id));
        let in_second = self.by_second.remove(&(range.second_from(), id));
        debug_assert!(in_first && in_second, "range {:?} was not indexed", id);
    }

    fn check_indices(&self) {
        debug_assert_eq!(self.by_first.len(), self.len);
        debug_assert_eq!(self.by_second.len(), self.len);
    }

    // Links a new node in front of `before`, indexes it and keeps the flat
    // cache when appending.
    fn x_insert(&mut self, before: Option<RangeId>, range: AlignRange) -> RangeId {
        let id = self.alloc(range);

        let prev = match before {
            Some(b) => self.node(b).prev,
            None => self.tail,
        };
        {
            let node = self.node_mut(id);
            node.prev = prev;
            node.next = before;
        }
        match prev {
            Some(p) => self.node_mut(p).next = Some(id),
            None => self.head = Some(id),
        }
        match before {
            Some(b) => self.node_mut(b).prev = Some(id),
            None => self.tail = Some(id),
        }

        self.index_node(id);
        self.len += 1;
        if range.is_reversed() {
            self.n_reversed += 1;
        }

        match (before, self.flat.get_mut()) {
            (None, Some(flat)) => flat.push(range),
            _ => {
                self.flat.take();
            }
        }

        self.check_indices();
        id
    }

    fn x_erase(&mut self, id: RangeId) -> AlignRange {
        self.unindex_node(id);

        let (prev, next, range) = {
            let node = self.node(id);
            (node.prev, node.next, node.range)
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }

        self.free(id);
        self.len -= 1;
        if range.is_reversed() {
            self.n_reversed -= 1;
        }
        self.flat.take();

        self.check_indices();
        range
    }

    // Mutates a stored range; its keys may change, so it is re-indexed.
    fn update_range<F>(&mut self, id: RangeId, f: F)
    where
        F: FnOnce(&mut AlignRange),
    {
        self.unindex_node(id);
        let was_reversed = self.node(id).range.is_reversed();
        f(&mut self.node_mut(id).range);
        let is_reversed = self.node(id).range.is_reversed();
        if was_reversed != is_reversed {
            if is_reversed {
                self.n_reversed += 1;
            } else {
                self.n_reversed -= 1;
            }
        }
        self.index_node(id);
        self.flat.take();
        self.check_indices();
    }
}

impl RangeCollection for ListCollection {
    type Handle = RangeId;

    fn flags(&self) -> Flags {
        self.flags
    }

    fn set_policy_flags(&mut self, policy: Flags) {
        self.flags.remove(Flags::POLICY_MASK);
        self.flags.insert(policy.policy());
        self.flags.insert(Flags::NOT_VALIDATED);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> impl Iterator<Item = &AlignRange> + Clone + '_ {
        Iter {
            coll: self,
            cur: self.head,
            remaining: self.len,
        }
    }

    fn front(&self) -> Option<&AlignRange> {
        self.head.map(|id| &self.node(id).range)
    }

    fn back(&self) -> Option<&AlignRange> {
        self.tail.map(|id| &self.node(id).range)
    }

    fn range(&self, handle: RangeId) -> &AlignRange {
        &self.node(handle).range
    }

    fn insert(&mut self, range: AlignRange) -> Result<Option<RangeId>, RangeError> {
        let before = self
            .by_first
            .range((range.first_from(), RangeId::MIN)..)
            .next()
            .map(|&(_, id)| id);
        self.insert_before(before, range)
    }

    fn push_back(&mut self, range: AlignRange) -> Result<Option<RangeId>, RangeError> {
        self.insert_before(None, range)
    }

    fn erase(&mut self, handle: RangeId) -> AlignRange {
        let removed = self.x_erase(handle);
        flags_after_erase(&mut self.flags, self.len == 0);
        removed
    }

    fn clear(&mut self) {
        let policy = self.flags.policy();
        *self = ListCollection::new(policy);
    }

    fn lower_bound(&self, pos: Position) -> Option<RangeId> {
        if let Some(&(_, id)) = self.by_first.range(..=(pos, RangeId::MAX)).next_back() {
            if self.node(id).range.first_to() >= pos {
                return Some(id);
            }
        }
        self.upper_bound(pos)
    }

    fn upper_bound(&self, pos: Position) -> Option<RangeId> {
        self.by_first
            .range((Excluded((pos, RangeId::MAX)), Unbounded))
            .next()
            .map(|&(_, id)| id)
    }

    /// Relinks the list in index order; the index is always sorted, so this
    /// is a single pass.
    fn sort(&mut self) {
        let nodes = &mut self.nodes;
        let mut prev: Option<RangeId> = None;
        for &(_, id) in self.by_first.iter() {
            nodes[id.index()].prev = prev;
            if let Some(p) = prev {
                nodes[p.index()].next = Some(id);
            }
            prev = Some(id);
        }
        if let Some(last) = prev {
            nodes[last.index()].next = None;
        }
        self.head = self.by_first.first().map(|&(_, id)| id);
        self.tail = prev;
        self.flat.take();

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

        let mut merged = false;
        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(next) = self.node(id).next else {
                break;
            };
            if self.node(id).range.is_abutting(&self.node(next).range) {
                let dead = self.x_erase(next);
                self.update_range(id, |r| {
                    r.combine_with_abutting(&dead);
                });
                merged = true;
            } else {
                cur = Some(next);
            }
        }

        self.flags.remove(Flags::ABUTTING);
        if merged {
            self.flags.insert(Flags::NOT_VALIDATED);
        }
        Ok(())
    }

    fn validate(&mut self) -> Flags {
        if self.flags.intersects(Flags::NOT_VALIDATED | Flags::INVALID) {
            let found = validate_all(self.iter());
            self.flags.remove(Flags::DERIVED_MASK | Flags::NOT_VALIDATED);
            self.flags |= found;
            check_policy(&mut self.flags);
        }
        self.flags.state()
    }

    fn second_pos_by_first_pos(&self, pos: Position, dir: SearchDirection) -> Option<Position> {
        let (found, contains) = self.find_2(pos);
        if contains {
            return found.and_then(|id| self.node(id).range.second_pos_by_first_pos(pos));
        }

        match dir {
            SearchDirection::Forward | SearchDirection::Right => {
                let r = &self.node(found?).range;
                r.second_pos_by_first_pos(r.first_from())
            }
            SearchDirection::Backward | SearchDirection::Left => {
                let &(_, id) = match found {
                    Some(id) => {
                        let key = (self.node(id).range.first_from(), id);
                        self.by_first.range(..key).next_back()?
                    }
                    None => self.by_first.last()?,
                };
                let r = &self.node(id).range;
                r.second_pos_by_first_pos(r.first_to())
            }
            SearchDirection::None => None,
        }
    }

    /// Uses the second-axis index: the range starting closest before `pos`
    /// is the only one that can contain it, and the nearest candidate on
    /// each side is found by walking outwards from there.
    ///
    /// Assumes the second-axis footprints do not overlap.
    fn first_pos_by_second_pos(&self, pos: Position, dir: SearchDirection) -> Option<Position> {
        let below = self.by_second.range(..=(pos, RangeId::MAX));
        let above = self.by_second.range((Excluded((pos, RangeId::MAX)), Unbounded));

        if let Some(&(_, id)) = below.clone().next_back() {
            if let Some(found) = self.node(id).range.first_pos_by_second_pos(pos) {
                return Some(found);
            }
        }

        // ranges of which orientation are looked for on each side
        let n_direct = self.len - self.n_reversed;
        let mut seek_right = 0;
        let mut seek_left = 0;
        for (direct, count) in [(true, n_direct), (false, self.n_reversed)] {
            match dir.seeks_right_on_second(direct) {
                Some(true) => seek_right += count,
                Some(false) => seek_left += count,
                None => return None,
            }
        }

        let candidate = |&(_, id): &(Position, RangeId)| {
            let r = &self.node(id).range;
            second_candidate(r, pos, dir).map(|c| (c, r))
        };

        let right = if seek_right > 0 {
            above.filter_map(candidate).next()
        } else {
            None
        };
        let left = if seek_left > 0 {
            below.rev().filter_map(candidate).next()
        } else {
            None
        };

        let (c, r) = match (left, right) {
            (Some(l), Some(r)) => {
                if r.0.distance < l.0.distance {
                    r
                } else {
                    l
                }
            }
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => return None,
        };
        r.first_pos_by_second_pos(c.boundary)
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

impl Index<usize> for ListCollection {
    type Output = AlignRange;

    fn index(&self, idx: usize) -> &AlignRange {
        &self.as_slice()[idx]
    }
}

impl From<&ArrayCollection> for ListCollection {
    fn from(other: &ArrayCollection) -> Self {
        let mut coll = ListCollection::new(other.policy_flags());
        for &range in other.iter() {
            coll.x_insert(None, range);
        }
        coll.flags = other.flags();
        coll.insertions = other.insertions().to_vec();
        coll
    }
}

/// Ranges of a [`ListCollection`] in list order.
#[derive(Clone)]
pub struct Iter<'a> {
    coll: &'a ListCollection,
    cur: Option<RangeId>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a AlignRange;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        let node = self.coll.node(id);
        self.cur = node.next;
        self.remaining -= 1;
        Some(&node.range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Handles of a [`ListCollection`] in list order.
#[derive(Clone)]
pub struct IdIter<'a> {
    coll: &'a ListCollection,
    cur: Option<RangeId>,
    remaining: usize,
}

impl Iterator for IdIter<'_> {
    type Item = RangeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        self.cur = self.coll.node(id).next;
        self.remaining -= 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IdIter<'_> {}

impl<'a> IntoIterator for &'a ListCollection {
    type Item = &'a AlignRange;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            coll: self,
            cur: self.head,
            remaining: self.len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(first: Position, second: Position, len: Position) -> AlignRange {
        AlignRange::direct(first, second, len)
    }

    fn r(first: Position, second: Position, len: Position) -> AlignRange {
        AlignRange::reversed(first, second, len)
    }

    fn ranges(coll: &ListCollection) -> Vec<AlignRange> {
        coll.iter().copied().collect()
    }

    #[test]
    fn test_insert_merges_abutting() {
        let mut coll = ListCollection::default();
        coll.insert(d(0, 100, 10)).unwrap();
        coll.insert(d(20, 120, 10)).unwrap();
        coll.insert(d(10, 110, 10)).unwrap();

        assert_eq!(ranges(&coll), vec![d(0, 100, 30)]);
        assert_eq!(coll.len(), 1);
        assert!(!coll.is_set(Flags::INVALID));
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut coll = ListCollection::default();
        for first in [40, 0, 20, 60] {
            coll.insert(d(first, first * 2, 5)).unwrap();
        }
        let starts: Vec<Position> = coll.iter().map(|r| r.first_from()).collect();
        assert_eq!(starts, vec![0, 20, 40, 60]);
        assert_eq!(coll.first_range(), 0..65);
    }

    #[test]
    fn test_insert_overlap_violates_policy() {
        let mut coll = ListCollection::default();
        coll.insert(d(0, 100, 10)).unwrap();
        let err = coll.insert(d(5, 200, 10)).unwrap_err();
        assert!(matches!(err, RangeError::PolicyViolation { .. }));
        assert_eq!(coll.len(), 2);
        assert!(coll.state_flags().contains(Flags::OVERLAP | Flags::INVALID));
    }

    #[test]
    fn test_sort_relinks() {
        let mut coll = ListCollection::new(Flags::empty());
        for first in [30, 10, 20, 0] {
            coll.push_back(d(first, first + 1000, 5)).unwrap();
        }
        let starts: Vec<Position> = coll.iter().map(|r| r.first_from()).collect();
        assert_eq!(starts, vec![30, 10, 20, 0]);
        assert!(coll.validate().contains(Flags::UNSORTED));

        coll.sort();
        let starts: Vec<Position> = coll.iter().map(|r| r.first_from()).collect();
        assert_eq!(starts, vec![0, 10, 20, 30]);
        assert_eq!(coll.validate(), Flags::DIRECT);

        let back: Vec<Position> = {
            let mut v = vec![];
            let mut cur = coll.back_id();
            while let Some(id) = cur {
                v.push(coll.range(id).first_from());
                cur = coll.prev(id);
            }
            v
        };
        assert_eq!(back, vec![30, 20, 10, 0]);
    }

    #[test]
    fn test_normalize() {
        let mut coll = ListCollection::new(Flags::empty());
        coll.push_back(r(10, 100, 10)).unwrap();
        coll.push_back(r(0, 110, 10)).unwrap();
        coll.push_back(r(40, 0, 5)).unwrap();

        let state = coll.normalize().unwrap();
        assert_eq!(state, Flags::REVERSED);
        assert_eq!(ranges(&coll), vec![r(0, 100, 20), r(40, 0, 5)]);
        assert_eq!(coll.find_by_second(105), coll.front_id());
    }

    #[test]
    fn test_combine_requires_sorted() {
        let mut coll = ListCollection::new(Flags::empty());
        coll.push_back(d(30, 130, 10)).unwrap();
        coll.push_back(d(0, 100, 10)).unwrap();
        coll.validate();

        let err = coll.combine_abutting().unwrap_err();
        assert!(matches!(err, RangeError::InvalidOperation { .. }));

        coll.sort();
        coll.combine_abutting().unwrap();
        assert_eq!(ranges(&coll), vec![d(0, 100, 10), d(30, 130, 10)]);
    }

    #[test]
    fn test_combine_refuses_overlap() {
        let mut coll = ListCollection::new(Flags::DEFAULT_POLICY | Flags::ALLOW_OVERLAP);
        coll.insert(d(0, 100, 10)).unwrap();
        coll.insert(d(5, 200, 10)).unwrap();
        assert!(coll.is_set(Flags::OVERLAP));

        let err = coll.combine_abutting().unwrap_err();
        assert!(matches!(err, RangeError::InvalidOperation { .. }));
        assert_eq!(coll.len(), 2);
    }

    #[test]
    fn test_combine_abutting_is_idempotent() {
        let mut coll = ListCollection::new(Flags::ALLOW_ABUTTING);
        for i in 0..4 {
            coll.insert(d(i * 10, i * 10, 10)).unwrap();
        }
        coll.combine_abutting().unwrap();
        let once = ranges(&coll);
        coll.combine_abutting().unwrap();
        assert_eq!(ranges(&coll), once);
        assert_eq!(once, vec![d(0, 0, 40)]);
    }

    #[test]
    fn test_find() {
        let mut coll = ListCollection::default();
        let a = coll.insert(d(0, 100, 10)).unwrap();
        let b = coll.insert(d(20, 150, 10)).unwrap();

        assert_eq!(coll.find(5), a);
        assert_eq!(coll.find(25), b);
        assert_eq!(coll.find(15), None);
        assert_eq!(coll.find_2(15), (b, false));
        assert_eq!(coll.find_2(40), (None, false));
        assert_eq!(coll.lower_bound(9), a);
        assert_eq!(coll.upper_bound(9), b);
        assert_eq!(coll.upper_bound(20), None);

        assert_eq!(coll.find_by_second(155), b);
        assert_eq!(coll.find_by_second(115), None);
        assert_eq!(coll.find_by_second(50), None);
    }

    #[test]
    fn test_erase_and_reuse_slot() {
        let mut coll = ListCollection::default();
        let a = coll.insert(d(0, 100, 10)).unwrap().unwrap();
        let b = coll.insert(d(20, 150, 10)).unwrap().unwrap();

        assert_eq!(coll.erase(a), d(0, 100, 10));
        assert_eq!(coll.front_id(), Some(b));
        assert_eq!(coll.find(5), None);

        let c = coll.insert(d(40, 200, 10)).unwrap().unwrap();
        assert_eq!(c, a);
        assert_eq!(coll.next(b), Some(c));
        assert_eq!(coll.iter_ids().collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(ranges(&coll), vec![d(20, 150, 10), d(40, 200, 10)]);

        coll.erase(b);
        coll.erase(c);
        assert!(coll.is_empty());
        assert!(coll.state_flags().is_empty());
    }

    #[test]
    fn test_flat_cache() {
        let mut coll = ListCollection::default();
        coll.push_back(d(0, 0, 10)).unwrap();
        coll.push_back(d(20, 20, 10)).unwrap();
        assert_eq!(coll[1], d(20, 20, 10));

        // appending keeps the cache
        coll.push_back(d(40, 40, 10)).unwrap();
        assert!(coll.flat.get().is_some());
        assert_eq!(coll.get(2), Some(&d(40, 40, 10)));

        // inserting in the middle drops it
        coll.insert(d(32, 32, 3)).unwrap();
        assert!(coll.flat.get().is_none());
        assert_eq!(coll[2], d(32, 32, 3));
        assert_eq!(coll.as_slice().len(), 4);
    }

    #[test]
    fn test_second_pos_by_first_pos() {
        let mut coll = ListCollection::default();
        coll.insert(d(0, 100, 10)).unwrap();
        coll.insert(d(20, 150, 10)).unwrap();

        assert_eq!(coll.second_pos_by_first_pos(5, SearchDirection::None), Some(105));
        assert_eq!(coll.second_pos_by_first_pos(15, SearchDirection::None), None);
        assert_eq!(coll.second_pos_by_first_pos(15, SearchDirection::Forward), Some(150));
        assert_eq!(coll.second_pos_by_first_pos(15, SearchDirection::Left), Some(109));
        assert_eq!(coll.second_pos_by_first_pos(-5, SearchDirection::Backward), None);
        assert_eq!(coll.second_pos_by_first_pos(50, SearchDirection::Backward), Some(159));
    }

    #[test]
    fn test_first_pos_by_second_pos() {
        let mut coll = ListCollection::default();
        coll.insert(r(0, 120, 10)).unwrap();
        coll.insert(r(20, 100, 10)).unwrap();

        assert_eq!(coll.first_pos_by_second_pos(129, SearchDirection::None), Some(0));
        assert_eq!(coll.first_pos_by_second_pos(115, SearchDirection::None), None);
        assert_eq!(coll.first_pos_by_second_pos(115, SearchDirection::Backward), Some(9));
        assert_eq!(coll.first_pos_by_second_pos(115, SearchDirection::Forward), Some(20));
        assert_eq!(coll.first_pos_by_second_pos(115, SearchDirection::Right), Some(9));
        assert_eq!(coll.first_pos_by_second_pos(115, SearchDirection::Left), Some(20));
        assert_eq!(coll.first_pos_by_second_pos(200, SearchDirection::Backward), None);
        assert_eq!(coll.first_pos_by_second_pos(50, SearchDirection::Backward), Some(29));
    }

    #[test]
    fn test_first_pos_by_second_pos_tie() {
        let mut coll = ListCollection::new(Flags::DEFAULT_POLICY | Flags::ALLOW_MIXED_DIR);
        coll.insert(d(0, 121, 10)).unwrap();
        coll.insert(r(20, 100, 10)).unwrap();

        assert_eq!(coll.first_pos_by_second_pos(115, SearchDirection::Forward), Some(20));
    }

    #[test]
    fn test_conversion() {
        let mut list = ListCollection::new(Flags::DEFAULT_POLICY | Flags::ALLOW_MIXED_DIR);
        list.insert(d(0, 100, 10)).unwrap();
        list.insert(r(20, 0, 10)).unwrap();
        list.add_insertion(&d(10, 110, 3));

        let array = ArrayCollection::from(&list);
        assert_eq!(array.flags(), list.flags());
        assert_eq!(array.as_slice(), list.as_slice());
        assert_eq!(array.insertions(), list.insertions());

        let mut assigned = ArrayCollection::default();
        assigned.assign(&list);
        assert_eq!(assigned, array);

        let back = ListCollection::from(&array);
        assert_eq!(ranges(&back), ranges(&list));
        assert_eq!(back.flags(), list.flags());
        assert_eq!(back.find_by_second(5), back.back_id());
    }
}
