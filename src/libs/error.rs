use std::fmt;

use crate::libs::flags::Flags;
use crate::libs::range::AlignRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A modification left the collection in a state its policy forbids.
    ///
    /// The modification has been applied; the collection is flagged
    /// `INVALID` and can still be inspected or relaxed.
    PolicyViolation {
        /// The range as stored after any merge with its neighbours
        range: AlignRange,
        /// Flags of the collection after the check
        flags: Flags,
    },
    /// The operation cannot run in the current state (e.g. merging unsorted ranges)
    InvalidOperation {
        op: &'static str,
        flags: Flags,
    },
    /// A range token that is not `FIRST:SECOND:LENGTH[:+|-]`
    ParseRange(String),
    /// A search direction other than none, forward, backward, left or right
    ParseDirection(String),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::PolicyViolation { range, flags } => {
                write!(
                    f,
                    "Policy violation after inserting {}: state {}",
                    range,
                    flags.state()
                )
            }
            RangeError::InvalidOperation { op, flags } => {
                write!(f, "Cannot {} in state {}", op, flags.state())
            }
            RangeError::ParseRange(s) => {
                write!(f, "Invalid range \"{}\", expected FIRST:SECOND:LENGTH[:+|-]", s)
            }
            RangeError::ParseDirection(s) => write!(f, "Unknown search direction: {}", s),
        }
    }
}

impl std::error::Error for RangeError {}
