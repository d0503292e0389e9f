use itertools::Itertools;

use crate::libs::flags::Flags;
use crate::libs::range::AlignRange;

/// Conflicts between two neighbouring ranges, `r_1` being the one stored
/// first.
pub fn validate_ranges(r_1: &AlignRange, r_2: &AlignRange) -> Flags {
    let mut flags = Flags::empty();

    if r_1.is_direct() != r_2.is_direct() {
        flags |= Flags::MIXED_DIR;
    }
    if r_1.first_from() > r_2.first_from() {
        flags |= Flags::UNSORTED;
    }

    let overlap =
        r_1.first_from() < r_2.first_to_open() && r_2.first_from() < r_1.first_to_open();
    if overlap {
        flags |= Flags::OVERLAP;
    } else if r_1.is_abutting(r_2) {
        flags |= Flags::ABUTTING;
    }

    flags
}

/// Full scan over ranges in storage order.
///
/// Returns the direction and conflict bits found; stops early once every
/// kind of conflict has been seen.
pub fn validate_all<'a, I>(ranges: I) -> Flags
where
    I: IntoIterator<Item = &'a AlignRange>,
    I::IntoIter: Clone,
{
    let ranges = ranges.into_iter();
    let mut flags = Flags::empty();

    if let Some(first) = ranges.clone().next() {
        flags |= Flags::for_direction(first.is_direct());
    }

    for (r_1, r_2) in ranges.tuple_windows() {
        flags |= Flags::for_direction(r_2.is_direct());
        flags |= validate_ranges(r_1, r_2);
        if flags.contains(Flags::DERIVED_MASK) {
            break;
        }
    }

    flags
}

/// Sets or clears `INVALID` according to the policy bits in `flags`.
/// Returns whether the state is allowed.
pub fn check_policy(flags: &mut Flags) -> bool {
    let mut invalid = false;
    if !flags.contains(Flags::ALLOW_MIXED_DIR) && flags.contains(Flags::MIXED_DIR) {
        invalid = true;
    }
    if !flags.contains(Flags::ALLOW_OVERLAP) && flags.contains(Flags::OVERLAP) {
        invalid = true;
    }
    if !flags.contains(Flags::ALLOW_ABUTTING) && flags.contains(Flags::ABUTTING) {
        invalid = true;
    }

    flags.set(Flags::INVALID, invalid);
    !invalid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ranges() {
        let a = AlignRange::direct(0, 100, 10);
        let b = AlignRange::direct(10, 110, 10);
        let c = AlignRange::direct(5, 200, 10);
        let d = AlignRange::reversed(30, 0, 10);

        assert_eq!(validate_ranges(&a, &b), Flags::ABUTTING);
        assert_eq!(validate_ranges(&a, &c), Flags::OVERLAP);
        // overlap dominates and the pair is out of order
        assert_eq!(validate_ranges(&b, &c), Flags::OVERLAP | Flags::UNSORTED);
        assert_eq!(validate_ranges(&b, &d), Flags::MIXED_DIR);
        assert_eq!(validate_ranges(&d, &a), Flags::MIXED_DIR | Flags::UNSORTED);
    }

    #[test]
    fn test_validate_all() {
        let ranges = vec![
            AlignRange::direct(0, 100, 10),
            AlignRange::direct(20, 120, 10),
            AlignRange::direct(30, 130, 10),
        ];
        assert_eq!(validate_all(&ranges), Flags::DIRECT | Flags::ABUTTING);

        let single = vec![AlignRange::reversed(0, 0, 1)];
        assert_eq!(validate_all(&single), Flags::REVERSED);

        let empty: Vec<AlignRange> = vec![];
        assert!(validate_all(&empty).is_empty());
    }

    #[test]
    fn test_validate_all_stops_when_everything_seen() {
        let ranges = vec![
            AlignRange::direct(10, 100, 10),
            AlignRange::reversed(0, 0, 15),
            AlignRange::reversed(15, 200, 10),
            AlignRange::direct(25, 110, 10),
            AlignRange::direct(35, 120, 10),
        ];
        let flags = validate_all(&ranges);
        assert!(flags.contains(Flags::DERIVED_MASK));
    }

    #[test]
    fn test_check_policy() {
        let mut flags = Flags::DEFAULT_POLICY | Flags::ABUTTING;
        assert!(!check_policy(&mut flags));
        assert!(flags.contains(Flags::INVALID));

        let mut flags = Flags::DEFAULT_POLICY | Flags::ALLOW_ABUTTING | Flags::ABUTTING;
        assert!(check_policy(&mut flags));

        let mut flags = Flags::DEFAULT_POLICY | Flags::DIRECT | Flags::INVALID;
        assert!(check_policy(&mut flags));
        assert!(!flags.contains(Flags::INVALID));

        let mut flags = Flags::DEFAULT_POLICY | Flags::MIXED_DIR;
        assert!(!check_policy(&mut flags));
        flags.insert(Flags::ALLOW_MIXED_DIR);
        assert!(check_policy(&mut flags));
    }
}
