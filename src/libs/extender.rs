//! Second-axis index over a finished collection.
//!
//! The index is built on first use and borrows the collection, so the
//! collection cannot change while an extender is bound to it.

use std::cell::OnceCell;

use crate::libs::coll::predicates::second_to_before;
use crate::libs::coll::RangeCollection;
use crate::libs::range::{AlignRange, Position};

#[derive(Debug, Clone)]
struct SecondIndex<'a> {
    by_second: Vec<(Position, &'a AlignRange)>,
    from: Position,
    to_open: Position,
}

/// Read-only view of a collection ordered by the second axis.
///
/// ```ignore
/// let mut ext = RangeExtender::new();
/// ext.init(&coll);
/// let hit = ext.find_on_second(1050);
/// ```
#[derive(Debug)]
pub struct RangeExtender<'a, C: RangeCollection> {
    coll: Option<&'a C>,
    index: OnceCell<SecondIndex<'a>>,
}

impl<'a, C: RangeCollection> Default for RangeExtender<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C: RangeCollection> RangeExtender<'a, C> {
    pub fn new() -> Self {
        Self {
            coll: None,
            index: OnceCell::new(),
        }
    }

    /// Binds to `coll`, dropping any previous index.
    pub fn init(&mut self, coll: &'a C) {
        self.coll = Some(coll);
        self.index = OnceCell::new();
    }

    /// Unbinds the collection.
    pub fn clear(&mut self) {
        self.coll = None;
        self.index = OnceCell::new();
    }

    pub fn collection(&self) -> Option<&'a C> {
        self.coll
    }

    /// Builds the index if needed.
    pub fn update_index(&self) {
        self.index();
    }

    fn index(&self) -> &SecondIndex<'a> {
        self.index.get_or_init(|| {
            let mut by_second: Vec<(Position, &'a AlignRange)> = match self.coll {
                Some(coll) => coll.iter().map(|r| (r.second_from(), r)).collect(),
                None => Vec::new(),
            };
            by_second.sort_by_key(|&(from, _)| from);

            let from = by_second
                .iter()
                .map(|(_, r)| r.second_from())
                .min()
                .unwrap_or(AlignRange::EMPTY_FROM);
            let to_open = by_second
                .iter()
                .map(|(_, r)| r.second_to_open())
                .max()
                .unwrap_or(AlignRange::EMPTY_TO_OPEN);

            SecondIndex {
                by_second,
                from,
                to_open,
            }
        })
    }

    pub fn len(&self) -> usize {
        self.coll.map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn second_from(&self) -> Position {
        self.index().from
    }

    pub fn second_to_open(&self) -> Position {
        self.index().to_open
    }

    pub fn second_to(&self) -> Position {
        if self.is_empty() {
            AlignRange::EMPTY_TO
        } else {
            self.second_to_open() - 1
        }
    }

    pub fn second_length(&self) -> Position {
        if self.is_empty() {
            AlignRange::EMPTY_LENGTH
        } else {
            self.second_to_open() - self.second_from()
        }
    }

    pub fn second_range(&self) -> std::ops::Range<Position> {
        self.second_from()..self.second_to_open()
    }

    /// The range containing `pos` on the second axis.
    pub fn find_on_second(&self, pos: Position) -> Option<&'a AlignRange> {
        let by_second = &self.index().by_second;
        let idx = by_second.partition_point(|(_, r)| second_to_before(r, pos));
        by_second
            .get(idx)
            .map(|&(_, r)| r)
            .filter(|r| r.second_contains(pos))
    }

    /// Ranges by second-axis start.
    pub fn iter_on_second(&self) -> impl Iterator<Item = &'a AlignRange> + '_ {
        self.index().by_second.iter().map(|&(_, r)| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::coll::{ArrayCollection, ListCollection};
    use crate::libs::flags::Flags;

    fn sample<C: RangeCollection + Default>() -> C {
        let mut coll = C::default();
        coll.set_policy_flags(Flags::DEFAULT_POLICY | Flags::ALLOW_MIXED_DIR);
        coll.insert(AlignRange::direct(0, 1000, 10)).unwrap();
        coll.insert(AlignRange::reversed(20, 500, 10)).unwrap();
        coll.insert(AlignRange::direct(40, 1020, 5)).unwrap();
        coll
    }

    fn check_extender<C: RangeCollection + Default>() {
        let coll: C = sample();
        let mut ext = RangeExtender::new();
        assert!(ext.is_empty());
        assert_eq!(ext.second_from(), AlignRange::EMPTY_FROM);
        assert_eq!(ext.second_length(), AlignRange::EMPTY_LENGTH);

        ext.init(&coll);
        ext.update_index();
        assert_eq!(ext.len(), 3);
        assert_eq!(ext.second_range(), 500..1025);
        assert_eq!(ext.second_to(), 1024);
        assert_eq!(ext.second_length(), 525);

        let starts: Vec<Position> = ext.iter_on_second().map(|r| r.second_from()).collect();
        assert_eq!(starts, vec![500, 1000, 1020]);

        assert_eq!(ext.find_on_second(505), Some(&AlignRange::reversed(20, 500, 10)));
        assert_eq!(ext.find_on_second(1009), Some(&AlignRange::direct(0, 1000, 10)));
        assert_eq!(ext.find_on_second(1010), None);
        assert_eq!(ext.find_on_second(1024), Some(&AlignRange::direct(40, 1020, 5)));
        assert_eq!(ext.find_on_second(2000), None);
        assert_eq!(ext.find_on_second(0), None);

        ext.clear();
        assert_eq!(ext.find_on_second(505), None);
        assert!(ext.collection().is_none());
    }

    #[test]
    fn test_extender_array() {
        check_extender::<ArrayCollection>();
    }

    #[test]
    fn test_extender_list() {
        check_extender::<ListCollection>();
    }
}
