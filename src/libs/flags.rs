use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use crate::libs::error::RangeError;

/// Policy and state bits of a range collection.
///
/// The low bits are policies chosen by the caller, the high bits describe
/// what the algorithms found the last time they looked at the ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    // Policies
    /// Enforce all policies after every modification.
    pub const KEEP_NORMALIZED: Flags = Flags(0x0001);
    /// Ranges of both orientations may coexist.
    pub const ALLOW_MIXED_DIR: Flags = Flags(0x0002);
    /// Ranges may overlap on the first axis.
    pub const ALLOW_OVERLAP: Flags = Flags(0x0004);
    /// Abutting ranges are kept apart instead of being merged.
    pub const ALLOW_ABUTTING: Flags = Flags(0x0008);
    /// Insertions are dropped.
    pub const IGNORE_INSERTIONS: Flags = Flags(0x0010);

    pub const POLICY_MASK: Flags = Flags(0x001f);
    pub const DEFAULT_POLICY: Flags = Self::KEEP_NORMALIZED;

    // State
    pub const NOT_VALIDATED: Flags = Flags(0x0001_0000);
    pub const INVALID: Flags = Flags(0x0002_0000);
    pub const UNSORTED: Flags = Flags(0x0004_0000);
    pub const DIRECT: Flags = Flags(0x0008_0000);
    pub const REVERSED: Flags = Flags(0x0010_0000);
    pub const MIXED_DIR: Flags = Flags(Self::DIRECT.0 | Self::REVERSED.0);
    pub const OVERLAP: Flags = Flags(0x0020_0000);
    pub const ABUTTING: Flags = Flags(0x0040_0000);

    pub const STATE_MASK: Flags = Flags(0x007f_0000);
    /// Bits recomputed from scratch by a full validation.
    pub const DERIVED_MASK: Flags = Flags(
        Self::UNSORTED.0 | Self::MIXED_DIR.0 | Self::OVERLAP.0 | Self::ABUTTING.0,
    );

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Flags(bits)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any bit of `other` is set.
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    /// True if every bit of `other` is set.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: Flags, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    pub const fn policy(self) -> Flags {
        Flags(self.0 & Self::POLICY_MASK.0)
    }

    pub const fn state(self) -> Flags {
        Flags(self.0 & Self::STATE_MASK.0)
    }

    /// Direction bit for a single range.
    pub const fn for_direction(direct: bool) -> Flags {
        if direct {
            Self::DIRECT
        } else {
            Self::REVERSED
        }
    }

    const NAMES: [(Flags, &'static str); 12] = [
        (Self::KEEP_NORMALIZED, "KeepNormalized"),
        (Self::ALLOW_MIXED_DIR, "AllowMixedDir"),
        (Self::ALLOW_OVERLAP, "AllowOverlap"),
        (Self::ALLOW_ABUTTING, "AllowAbutting"),
        (Self::IGNORE_INSERTIONS, "IgnoreInsertions"),
        (Self::NOT_VALIDATED, "NotValidated"),
        (Self::INVALID, "Invalid"),
        (Self::UNSORTED, "Unsorted"),
        (Self::DIRECT, "Direct"),
        (Self::REVERSED, "Reversed"),
        (Self::OVERLAP, "Overlap"),
        (Self::ABUTTING, "Abutting"),
    ];
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl BitAndAssign for Flags {
    fn bitand_assign(&mut self, rhs: Flags) {
        self.0 &= rhs.0;
    }
}

impl Not for Flags {
    type Output = Flags;

    fn not(self) -> Flags {
        Flags(!self.0)
    }
}

/// Names joined by `|`, e.g. `KeepNormalized|Direct`; `-` when empty.
impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// Where to look when a position falls outside every range.
///
/// `Left`/`Right` are absolute on the axis being searched.
/// `Forward`/`Backward` follow the first axis, so on the second axis they
/// depend on the orientation of each candidate range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchDirection {
    #[default]
    None,
    Forward,
    Backward,
    Left,
    Right,
}

impl SearchDirection {
    /// Whether a range with the given orientation should be looked for at
    /// larger second-axis coordinates.
    pub fn seeks_right_on_second(self, direct: bool) -> Option<bool> {
        match self {
            SearchDirection::None => None,
            SearchDirection::Right => Some(true),
            SearchDirection::Left => Some(false),
            SearchDirection::Forward => Some(direct),
            SearchDirection::Backward => Some(!direct),
        }
    }
}

impl std::str::FromStr for SearchDirection {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SearchDirection::None),
            "forward" => Ok(SearchDirection::Forward),
            "backward" => Ok(SearchDirection::Backward),
            "left" => Ok(SearchDirection::Left),
            "right" => Ok(SearchDirection::Right),
            _ => Err(RangeError::ParseDirection(s.to_string())),
        }
    }
}
