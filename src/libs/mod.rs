pub mod coll;
pub mod error;
pub mod extender;
pub mod flags;
pub mod range;

pub use coll::{ArrayCollection, ListCollection, RangeCollection, RangeId};
pub use error::RangeError;
pub use extender::RangeExtender;
pub use flags::{Flags, SearchDirection};
pub use range::{AlignRange, Position};
